use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crate::api::{DeviceKind, PACommand, PAResponse, Percent, VolumeDelta};
use crate::error::PulseError;
use crate::mainloop::PulseAudioLoop;

macro_rules! expect {
    ($recv:expr, $pattern:pat => $out:expr) => {
        match $recv? {
            $pattern => Ok($out),
            PAResponse::OpError(e) => Err(PulseError::Operation(e)),
            other => Err(PulseError::Protocol(format!(
                "expected {}, received {:?}",
                stringify!($pattern),
                other
            ))),
        }
    };
}

/// Blocking request/response facade over the PulseAudio loop.
///
/// Each method sends one command and waits for its reply; the loop keeps the
/// asynchronous callback chains on its own thread. Dropping the client asks
/// the loop to disconnect and waits briefly for it to wind down.
pub struct Client {
    tx: Sender<PACommand>,
    rx: Receiver<PAResponse>,
}

impl Client {
    pub fn connect(app_name: impl AsRef<str> + Send + 'static) -> Client {
        let (tx, rx) = PulseAudioLoop::start(app_name);
        Client { tx, rx }
    }

    /// Average channel volume of the default device, as a percentage.
    pub fn volume(&self, kind: DeviceKind) -> Result<Percent, PulseError> {
        self.send(PACommand::GetVolume(kind))?;
        expect!(self.recv(), PAResponse::Volume(pct) => pct)
    }

    /// Sets every channel of the default device to `pct`; echoes it back.
    pub fn set_volume(&self, kind: DeviceKind, pct: Percent) -> Result<Percent, PulseError> {
        self.send(PACommand::SetVolume(kind, pct))?;
        expect!(self.recv(), PAResponse::Volume(pct) => pct)
    }

    /// Shifts every channel of the default device by `delta`, clamped to the
    /// volume scale; returns the resulting average percentage.
    pub fn adjust_volume(&self, kind: DeviceKind, delta: VolumeDelta) -> Result<Percent, PulseError> {
        self.send(PACommand::AdjustVolume(kind, delta))?;
        expect!(self.recv(), PAResponse::Volume(pct) => pct)
    }

    /// Mute flag of the default device.
    pub fn mute(&self, kind: DeviceKind) -> Result<bool, PulseError> {
        self.send(PACommand::GetMute(kind))?;
        expect!(self.recv(), PAResponse::Mute(mute) => mute)
    }

    /// Sets the mute flag of the default device. Returns the muted sentinel
    /// percentage when muting, else the device's current average.
    pub fn set_mute(&self, kind: DeviceKind, mute: bool) -> Result<Percent, PulseError> {
        self.send(PACommand::SetMute(kind, mute))?;
        expect!(self.recv(), PAResponse::Volume(pct) => pct)
    }

    /// Flips the mute flag of the default device; reports as
    /// [`Client::set_mute`] does.
    pub fn toggle_mute(&self, kind: DeviceKind) -> Result<Percent, PulseError> {
        self.send(PACommand::ToggleMute(kind))?;
        expect!(self.recv(), PAResponse::Volume(pct) => pct)
    }

    fn send(&self, cmd: PACommand) -> Result<(), PulseError> {
        self.tx.send(cmd).map_err(|_| self.disconnect_cause())
    }

    fn recv(&self) -> Result<PAResponse, PulseError> {
        self.rx.recv().map_err(|_| PulseError::Disconnected)
    }

    /// A failed send means the loop is gone; it reports why on the response
    /// channel before exiting, so surface that instead of a bare disconnect.
    fn disconnect_cause(&self) -> PulseError {
        match self.rx.recv_timeout(Duration::from_secs(1)) {
            Ok(PAResponse::OpError(e)) => PulseError::Operation(e),
            _ => PulseError::Disconnected,
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.tx.send(PACommand::Disconnect).is_ok() {
            // wait for the loop to acknowledge the disconnect, but don't hang
            // process exit on a stuck server
            let _ = self.rx.recv_timeout(Duration::from_secs(3));
        }
    }
}
