use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use libpulse_binding::callbacks::ListResult;
use libpulse_binding::context::{Context, FlagSet, State};
use libpulse_binding::mainloop::threaded::Mainloop;
use libpulse_binding::proplist::{properties, Proplist};
use libpulse_binding::volume::ChannelVolumes;

use crate::api::{DeviceKind, DeviceSnapshot, PACommand, PAResponse, Percent, VolumeDelta};
use crate::error::{describe, PulseError};
use crate::util::{adjusted_channel_volumes, mute_report_volume, uniform_channel_volumes};

type Ctx = Rc<RefCell<Context>>;

#[derive(Debug, Clone, Copy)]
pub enum StopReason {
    CommandSenderDropped,
    ExplicitDisconnect,
}

/// Owns the PulseAudio threaded mainloop and context, and serves
/// [`PACommand`]s against the default devices.
///
/// PulseAudio's API is callback-driven: every introspection request is
/// asynchronous and its reply arrives on the loop thread. Mutating commands
/// chain two requests, with the follow-up issued from inside the get-info
/// callback, so per command at most one get-info and one mutation are ever in
/// flight.
pub struct PulseAudioLoop {
    rx: Receiver<PACommand>,
    tx: Sender<PAResponse>,
    ctx: Ctx,
    mainloop: Rc<RefCell<Mainloop>>,
}

impl PulseAudioLoop {
    /// Connects to PulseAudio on a background thread and returns the channel
    /// pair for issuing commands and receiving responses.
    ///
    /// Connection problems are reported through the response channel as
    /// [`PAResponse::OpError`]; in every case the final response on the
    /// channel is [`PAResponse::Disconnected`].
    pub fn start(
        app_name: impl AsRef<str> + Send + 'static,
    ) -> (Sender<PACommand>, Receiver<PAResponse>) {
        let (response_tx, response_rx) = mpsc::channel();
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            match PulseAudioLoop::init(app_name.as_ref(), response_tx.clone(), cmd_rx) {
                Ok(pa) => {
                    if let Err(e) = pa.run() {
                        let _ = response_tx.send(PAResponse::OpError(e.to_string()));
                    }
                }
                Err(e) => {
                    let _ = response_tx.send(PAResponse::OpError(e.to_string()));
                }
            }

            // signal that we're done
            let _ = response_tx.send(PAResponse::Disconnected);
        });

        (cmd_tx, response_rx)
    }

    // https://freedesktop.org/software/pulseaudio/doxygen/threaded_mainloop.html
    // https://docs.rs/libpulse-binding/2.27.1/libpulse_binding/mainloop/threaded/index.html#example
    fn init(
        app_name: &str,
        tx: Sender<PAResponse>,
        rx: Receiver<PACommand>,
    ) -> Result<PulseAudioLoop, PulseError> {
        let mut proplist = Proplist::new()
            .ok_or_else(|| PulseError::Init("failed to create proplist".into()))?;
        proplist
            .set_str(properties::APPLICATION_NAME, app_name)
            .map_err(|_| PulseError::Init("failed to set application name".into()))?;

        let mainloop: Rc<RefCell<Mainloop>> = Rc::new(RefCell::new(
            Mainloop::new().ok_or_else(|| PulseError::Init("failed to create mainloop".into()))?,
        ));
        let ctx = Rc::new(RefCell::new(
            Context::new_with_proplist(
                mainloop.borrow_mut().deref(),
                &format!("{}Context", app_name),
                &proplist,
            )
            .ok_or_else(|| PulseError::Init("failed to create context".into()))?,
        ));

        // wake the waiting thread below on any terminal state transition
        {
            let mainloop_ref = mainloop.clone();
            let context_ref = ctx.clone();
            ctx.borrow_mut().set_state_callback(Some(Box::new(move || {
                let state = unsafe { (*context_ref.as_ptr()).get_state() };
                if matches!(state, State::Ready | State::Failed | State::Terminated) {
                    unsafe { (*mainloop_ref.as_ptr()).signal(false) };
                }
            })));
        }

        // connect to the default server
        ctx.borrow_mut()
            .connect(None, FlagSet::NOFLAGS, None)
            .map_err(PulseError::connection)?;

        mainloop.borrow_mut().lock();
        mainloop
            .borrow_mut()
            .start()
            .map_err(PulseError::connection)?;

        // wait for the context to be ready; the establishing states
        // (connecting, authorizing, setting-name) just keep us waiting
        loop {
            match ctx.borrow_mut().get_state() {
                State::Ready => break,
                State::Failed | State::Terminated => {
                    mainloop.borrow_mut().unlock();
                    mainloop.borrow_mut().stop();
                    return Err(PulseError::Connection(
                        "context never reached ready state".into(),
                    ));
                }
                _ => mainloop.borrow_mut().wait(),
            }
        }

        // context is ready now, so remove the state callback
        ctx.borrow_mut().set_state_callback(None);

        // release lock to allow the loop to continue
        mainloop.borrow_mut().unlock();

        Ok(PulseAudioLoop {
            tx,
            rx,
            ctx,
            mainloop,
        })
    }

    /// Serves commands until disconnected. Callbacks run on the mainloop's own
    /// thread, so the loop is locked around every dispatch.
    pub fn run(&self) -> Result<StopReason, PulseError> {
        loop {
            let cmd = match self.rx.recv() {
                Ok(cmd) => cmd,
                Err(_) => {
                    self.mainloop.borrow_mut().stop();
                    return Ok(StopReason::CommandSenderDropped);
                }
            };

            // lock and pause the mainloop
            self.mainloop.borrow_mut().lock();

            // verify connection state
            match self.ctx.borrow_mut().get_state() {
                State::Ready => {}
                _ => {
                    self.mainloop.borrow_mut().unlock();
                    return Err(PulseError::Connection(
                        "disconnected while working, shutting down".into(),
                    ));
                }
            }

            match cmd {
                PACommand::GetVolume(kind) => self.get_volume(kind),
                PACommand::SetVolume(kind, pct) => self.set_volume(kind, pct),
                PACommand::AdjustVolume(kind, delta) => self.adjust_volume(kind, delta),
                PACommand::GetMute(kind) => self.get_mute(kind),
                PACommand::SetMute(kind, mute) => self.set_mute(kind, mute),
                PACommand::ToggleMute(kind) => self.toggle_mute(kind),

                PACommand::Disconnect => {
                    self.ctx.borrow_mut().disconnect();
                    self.mainloop.borrow_mut().unlock();
                    self.mainloop.borrow_mut().stop();
                    return Ok(StopReason::ExplicitDisconnect);
                }
            }

            // resume the mainloop
            self.mainloop.borrow_mut().unlock();
        }
    }

    /*
     * Command chains
     */

    fn get_volume(&self, kind: DeviceKind) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |_, info| {
            let _ = tx.send(PAResponse::Volume(Percent::from_volume(info.volume.avg())));
        });
    }

    fn get_mute(&self, kind: DeviceKind) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |_, info| {
            let _ = tx.send(PAResponse::Mute(info.mute));
        });
    }

    fn set_volume(&self, kind: DeviceKind, pct: Percent) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |ctx, info| {
            let cv = uniform_channel_volumes(info.channels, pct.to_volume());
            Self::apply_volume(&ctx, kind, &cv, tx.clone(), Percent::from_volume(pct.to_volume()));
        });
    }

    fn adjust_volume(&self, kind: DeviceKind, delta: VolumeDelta) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |ctx, info| {
            let cv = adjusted_channel_volumes(&info.volume, delta);
            Self::apply_volume(&ctx, kind, &cv, tx.clone(), Percent::from_volume(cv.avg()));
        });
    }

    fn set_mute(&self, kind: DeviceKind, mute: bool) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |ctx, info| {
            let report = Percent::from_volume(mute_report_volume(mute, &info.volume));
            Self::apply_mute(&ctx, kind, mute, tx.clone(), report);
        });
    }

    fn toggle_mute(&self, kind: DeviceKind) {
        let tx = self.tx.clone();
        self.with_device_info(kind, move |ctx, info| {
            let mute = !info.mute;
            let report = Percent::from_volume(mute_report_volume(mute, &info.volume));
            Self::apply_mute(&ctx, kind, mute, tx.clone(), report);
        });
    }

    /*
     * Introspection plumbing
     */

    /// Issues a get-info request for the default device of `kind` and invokes
    /// `f` with an owned snapshot of the reply.
    ///
    /// The info callback fires once per matching device and then once more
    /// with an end-of-list marker; the default-device name matches exactly one
    /// device, and the end marker is a no-op. An errored list result is
    /// reported and ends the chain.
    fn with_device_info<F>(&self, kind: DeviceKind, mut f: F)
    where
        F: FnMut(Ctx, DeviceSnapshot) + 'static,
    {
        let ctx = self.ctx.clone();
        let tx = self.tx.clone();
        let introspector = self.ctx.borrow_mut().introspect();

        macro_rules! on_info {
            () => {
                move |result| match result {
                    ListResult::Item(info) => f(ctx.clone(), DeviceSnapshot::from(info)),
                    // end of list; the item callback already handled the device
                    ListResult::End => {}
                    ListResult::Error => Self::handle_error(&ctx, &tx),
                }
            };
        }

        match kind {
            DeviceKind::Sink => {
                introspector.get_sink_info_by_name(kind.default_name(), on_info!());
            }
            DeviceKind::Source => {
                introspector.get_source_info_by_name(kind.default_name(), on_info!());
            }
        }
    }

    fn apply_volume(
        ctx: &Ctx,
        kind: DeviceKind,
        cv: &ChannelVolumes,
        tx: Sender<PAResponse>,
        report: Percent,
    ) {
        let mut introspector = ctx.borrow_mut().introspect();
        let name = kind.default_name();
        let done = Self::report_cb(ctx.clone(), tx, report);
        match kind {
            DeviceKind::Sink => introspector.set_sink_volume_by_name(name, cv, Some(done)),
            DeviceKind::Source => introspector.set_source_volume_by_name(name, cv, Some(done)),
        };
    }

    fn apply_mute(
        ctx: &Ctx,
        kind: DeviceKind,
        mute: bool,
        tx: Sender<PAResponse>,
        report: Percent,
    ) {
        let mut introspector = ctx.borrow_mut().introspect();
        let name = kind.default_name();
        let done = Self::report_cb(ctx.clone(), tx, report);
        match kind {
            DeviceKind::Sink => introspector.set_sink_mute_by_name(name, mute, Some(done)),
            DeviceKind::Source => introspector.set_source_mute_by_name(name, mute, Some(done)),
        };
    }

    /// Success callback for a mutation request: report the precomputed value,
    /// or the server's error if the mutation failed.
    fn report_cb(ctx: Ctx, tx: Sender<PAResponse>, report: Percent) -> Box<impl FnMut(bool)> {
        Box::new(move |success: bool| {
            if success {
                let _ = tx.send(PAResponse::Volume(report));
            } else {
                Self::handle_error(&ctx, &tx);
            }
        })
    }

    fn handle_error(ctx: &Ctx, tx: &Sender<PAResponse>) {
        let err = ctx.borrow_mut().errno();
        let _ = tx.send(PAResponse::OpError(describe(err)));
    }
}
