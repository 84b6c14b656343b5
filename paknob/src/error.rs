use libpulse_binding::error::PAErr;

/// Errors that can occur while talking to PulseAudio.
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// Failed to create one of the client-side resources (proplist, mainloop,
    /// context) before any connection was attempted.
    #[error("failed to initialize PulseAudio client: {0}")]
    Init(String),

    /// The connection to the server could not be established or was lost.
    #[error("PulseAudio connection failed: {0}")]
    Connection(String),

    /// The server reported a failure for a request.
    #[error("PulseAudio operation failed: {0}")]
    Operation(String),

    /// The loop answered with a response that doesn't match the request.
    #[error("unexpected PulseAudio response: {0}")]
    Protocol(String),

    /// The loop thread is gone; no further requests can be served.
    #[error("disconnected from PulseAudio")]
    Disconnected,
}

impl PulseError {
    pub(crate) fn connection(e: PAErr) -> PulseError {
        PulseError::Connection(describe(e))
    }
}

pub(crate) fn describe(e: PAErr) -> String {
    format!("{e}")
}
