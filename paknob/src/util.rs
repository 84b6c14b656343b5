//! Pure channel-volume arithmetic, kept free of the mainloop so it can be
//! exercised without a running server.

use libpulse_binding::volume::{ChannelVolumes, Volume};
use libpulse_sys::pa_cvolume;

use crate::api::VolumeDelta;

/// Builds a `ChannelVolumes` from an explicit per-channel list.
pub fn new_channel_volumes(volumes: Vec<Volume>) -> ChannelVolumes {
    let mut inner = pa_cvolume::default();
    inner.channels = volumes.len() as u8;
    for (i, vol) in volumes.into_iter().enumerate() {
        inner.values[i] = vol.0;
    }
    inner.into()
}

/// Builds a `ChannelVolumes` with every one of `channels` channels at `vol`.
pub fn uniform_channel_volumes(channels: u8, vol: Volume) -> ChannelVolumes {
    let mut cv = ChannelVolumes::default();
    cv.set(channels, vol);
    cv
}

/// Applies `delta` to every channel, clamping each channel independently to
/// `[Volume::MUTED, Volume::MAX]` so repeated shifts never wrap.
pub fn adjusted_channel_volumes(current: &ChannelVolumes, delta: VolumeDelta) -> ChannelVolumes {
    let volumes = current
        .get()
        .iter()
        .map(|vol| {
            if delta.negative {
                Volume(vol.0 - vol.0.min(delta.step.0))
            } else {
                Volume(vol.0.saturating_add(delta.step.0).min(Volume::MAX.0))
            }
        })
        .collect();
    new_channel_volumes(volumes)
}

/// The volume reported after a mute mutation: the muted sentinel when muting,
/// otherwise the device's current average. Muting does not alter the stored
/// channel volumes server-side, so this is a report value, not a measurement.
pub fn mute_report_volume(mute: bool, current: &ChannelVolumes) -> Volume {
    if mute {
        Volume::MUTED
    } else {
        current.avg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Percent, SignedPercent};

    fn delta(s: &str) -> VolumeDelta {
        s.parse::<SignedPercent>().unwrap().as_increment()
    }

    fn pct(s: &str) -> Volume {
        s.parse::<Percent>().unwrap().to_volume()
    }

    #[test]
    fn uniform_sets_every_channel() {
        let cv = uniform_channel_volumes(2, pct("40"));
        assert_eq!(cv.len(), 2);
        assert!(cv.get().iter().all(|v| *v == pct("40")));
    }

    #[test]
    fn explicit_channel_list_is_preserved() {
        let cv = new_channel_volumes(vec![pct("30"), pct("60")]);
        assert_eq!(cv.len(), 2);
        assert_eq!(cv.get()[0], pct("30"));
        assert_eq!(cv.get()[1], pct("60"));
    }

    #[test]
    fn increment_clamps_at_scale_max() {
        // a whole-scale step overshoots the ceiling from any starting volume
        let cv = uniform_channel_volumes(2, pct("90"));
        let whole_scale = VolumeDelta {
            negative: false,
            step: Volume::MAX,
        };
        let adjusted = adjusted_channel_volumes(&cv, whole_scale);
        assert!(adjusted.get().iter().all(|v| *v == Volume::MAX));
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let cv = uniform_channel_volumes(2, pct("5"));
        let adjusted = adjusted_channel_volumes(&cv, delta("-1000"));
        assert!(adjusted.get().iter().all(|v| *v == Volume::MUTED));
    }

    #[test]
    fn increment_then_decrement_restores_unclamped_channels() {
        let cv = new_channel_volumes(vec![pct("30"), pct("60")]);
        let up = adjusted_channel_volumes(&cv, delta("25"));
        let back = adjusted_channel_volumes(&up, delta("-25"));
        assert_eq!(back.get(), cv.get());
    }

    #[test]
    fn adjustment_shifts_the_average() {
        let cv = new_channel_volumes(vec![pct("30"), pct("60")]);
        let up = adjusted_channel_volumes(&cv, delta("10"));
        assert_eq!(Percent::from_volume(up.avg()).value(), 55);
    }

    #[test]
    fn mute_report_is_sentinel_or_current_average() {
        let cv = uniform_channel_volumes(2, pct("70"));
        assert_eq!(mute_report_volume(true, &cv), Volume::MUTED);
        assert_eq!(mute_report_volume(false, &cv), pct("70"));
    }
}
