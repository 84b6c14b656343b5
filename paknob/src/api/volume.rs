use std::fmt;
use std::str::FromStr;

use libpulse_binding::volume::Volume;

/// An integer volume percentage, as accepted and printed on the CLI.
///
/// `Volume::NORMAL` is 100%; conversion back from the server's raw scale
/// rounds to the nearest percent: `(raw * 100 + NORMAL / 2) / NORMAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(u32);

impl Percent {
    /// Converts a raw server volume to the nearest integer percentage.
    pub fn from_volume(vol: Volume) -> Percent {
        let norm = u64::from(Volume::NORMAL.0);
        Percent(((u64::from(vol.0) * 100 + norm / 2) / norm) as u32)
    }

    /// The raw server volume this percentage maps to.
    pub fn to_volume(self) -> Volume {
        Volume((u64::from(self.0) * u64::from(Volume::NORMAL.0) / 100) as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Percent {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pct = s.trim().parse::<u32>()?;
        let raw = u64::from(pct) * u64::from(Volume::NORMAL.0) / 100;
        if raw > u64::from(Volume::MAX.0) {
            return Err(VolumeError::OutOfRange(pct));
        }
        Ok(Percent(pct))
    }
}

/// A percentage that may carry a leading `-`, as given to the
/// increment/decrement subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedPercent {
    negative: bool,
    magnitude: Percent,
}

impl SignedPercent {
    /// The delta an increment subcommand applies: sign taken as written.
    pub fn as_increment(self) -> VolumeDelta {
        VolumeDelta {
            negative: self.negative,
            step: self.magnitude.to_volume(),
        }
    }

    /// The delta a decrement subcommand applies: the written sign flipped, so
    /// `decrement 5` lowers and `decrement -5` raises.
    pub fn as_decrement(self) -> VolumeDelta {
        VolumeDelta {
            negative: !self.negative,
            step: self.magnitude.to_volume(),
        }
    }
}

impl FromStr for SignedPercent {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Ok(SignedPercent {
            negative,
            magnitude: digits.parse()?,
        })
    }
}

/// A directed shift on the raw volume scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeDelta {
    /// Whether the shift lowers the volume.
    pub negative: bool,
    /// Magnitude of the shift.
    pub step: Volume,
}

/// Volume argument parse errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VolumeError {
    #[error("not an integer percentage: {0}")]
    Parse(#[from] std::num::ParseIntError),
    #[error("{0}% is outside the server's volume scale")]
    OutOfRange(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_boundaries() {
        assert_eq!(Percent::from_volume(Volume::MUTED).value(), 0);
        assert_eq!(Percent::from_volume(Volume::NORMAL).value(), 100);
        // half of the scale rounds to an exact half
        assert_eq!(Percent::from_volume(Volume(Volume::NORMAL.0 / 2)).value(), 50);
        // one step below normal still rounds up to 100
        assert_eq!(Percent::from_volume(Volume(Volume::NORMAL.0 - 1)).value(), 100);
    }

    #[test]
    fn percent_roundtrips_through_raw_scale() {
        // The raw scale is not divisible by 100, but the rounding in
        // `from_volume` absorbs the truncation of `to_volume` for every
        // integer percentage.
        for pct in 0..=150 {
            let p: Percent = pct.to_string().parse().unwrap();
            assert_eq!(Percent::from_volume(p.to_volume()), p);
        }
    }

    #[test]
    fn percent_rejects_garbage() {
        assert!(matches!("abc".parse::<Percent>(), Err(VolumeError::Parse(_))));
        assert!(matches!("".parse::<Percent>(), Err(VolumeError::Parse(_))));
        assert!(matches!("1.5".parse::<Percent>(), Err(VolumeError::Parse(_))));
        // plain percentages are unsigned
        assert!(matches!("-1".parse::<Percent>(), Err(VolumeError::Parse(_))));
    }

    #[test]
    fn percent_rejects_values_off_the_scale() {
        // PA_VOLUME_MAX is half the u32 range, so ~3276800% overflows it
        assert!(matches!(
            "4000000".parse::<Percent>(),
            Err(VolumeError::OutOfRange(4000000))
        ));
        // but values well above 100% are still valid raw volumes
        assert!("1000".parse::<Percent>().is_ok());
    }

    #[test]
    fn signed_percent_direction_is_sign_xor_polarity() {
        let plus: SignedPercent = "5".parse().unwrap();
        let minus: SignedPercent = "-5".parse().unwrap();

        assert!(!plus.as_increment().negative);
        assert!(minus.as_increment().negative);
        assert!(plus.as_decrement().negative);
        assert!(!minus.as_decrement().negative);

        assert_eq!(plus.as_increment().step, Percent(5).to_volume());
    }

    #[test]
    fn signed_percent_rejects_garbage() {
        assert!("--5".parse::<SignedPercent>().is_err());
        assert!("five".parse::<SignedPercent>().is_err());
        assert!("-".parse::<SignedPercent>().is_err());
    }
}
