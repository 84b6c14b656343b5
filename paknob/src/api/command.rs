use super::{DeviceKind, Percent, VolumeDelta};

/// Requests served by the PulseAudio loop.
///
/// Each device command runs a short callback chain on the loop thread: one
/// get-info request against the default device of the given kind, followed by
/// at most one mutation request, followed by exactly one [`PAResponse`].
#[derive(Debug, Clone, Copy)]
pub enum PACommand {
    /// Report the device's average channel volume.
    GetVolume(DeviceKind),
    /// Set every channel to the given level, then echo it back.
    SetVolume(DeviceKind, Percent),
    /// Shift every channel by the given delta, clamped to the volume scale,
    /// then report the resulting average.
    AdjustVolume(DeviceKind, VolumeDelta),
    /// Report the device's mute flag.
    GetMute(DeviceKind),
    /// Set the mute flag. Reports the muted sentinel when muting, else the
    /// device's current average volume; stored channel volumes are untouched
    /// server-side either way.
    SetMute(DeviceKind, bool),
    /// [`PACommand::SetMute`] with the negation of the current flag.
    ToggleMute(DeviceKind),

    /// Disconnect from the server and stop the loop.
    Disconnect,
}

/// Replies sent back from the PulseAudio loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PAResponse {
    /// A volume percentage: the current average for gets, the applied or
    /// sentinel value for mutations.
    Volume(Percent),
    /// `PACommand::GetMute` response.
    Mute(bool),

    /// Returned in place of a result when the server or the client library
    /// reported a failure. Terminal for the command; nothing is retried.
    OpError(String),

    /// `PACommand::Disconnect` response. Once this is received no further
    /// commands will be served.
    Disconnected,
}
