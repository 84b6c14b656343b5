//! Client for querying and adjusting the volume and mute state of the default
//! PulseAudio sink and source.
//!
//! PulseAudio exposes a loop-based asynchronous API; [`mainloop::PulseAudioLoop`]
//! runs that loop on a dedicated thread and serves [`api::PACommand`]s sent over
//! a channel. [`client::Client`] is a blocking request/response facade on top.

pub mod api;
pub mod client;
pub mod error;
pub mod mainloop;
pub mod util;

pub use api::{DeviceKind, PACommand, PAResponse, Percent, SignedPercent, VolumeDelta};
pub use client::Client;
pub use error::PulseError;
