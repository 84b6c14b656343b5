//! Owned copies of the introspection data this crate needs. The structs
//! libpulse_binding hands to info callbacks borrow from the callback
//! invocation and are only valid for its duration, so the relevant fields are
//! copied out before any further request is issued.

use libpulse_binding::context::introspect::{SinkInfo, SourceInfo};
use libpulse_binding::volume::ChannelVolumes;

/// Point-in-time state of a device, captured from one get-info reply.
#[derive(Debug, Clone, Copy)]
pub struct DeviceSnapshot {
    /// Per-channel volumes at the time of the reply.
    pub volume: ChannelVolumes,
    /// Number of channels in the device's channel map.
    pub channels: u8,
    /// Mute flag.
    pub mute: bool,
}

impl From<&SinkInfo<'_>> for DeviceSnapshot {
    fn from(info: &SinkInfo) -> Self {
        DeviceSnapshot {
            volume: info.volume,
            channels: info.channel_map.len(),
            mute: info.mute,
        }
    }
}

impl From<&SourceInfo<'_>> for DeviceSnapshot {
    fn from(info: &SourceInfo) -> Self {
        DeviceSnapshot {
            volume: info.volume,
            channels: info.channel_map.len(),
            mute: info.mute,
        }
    }
}
