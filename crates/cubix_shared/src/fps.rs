//! # FPS Limit Methods
//!
//! The closed set of frame pacing strategies. The value stored in game state
//! is always one of these variants, so an invalid method can only be
//! rejected at the parsing boundary.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strategy used to limit frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum FpsLimitMethod {
    /// Pacing is left to the presentation mechanism.
    #[serde(rename = "LimitVSync")]
    VSync = 0,
    /// 30 frames per second.
    #[serde(rename = "Limit30FPS")]
    Fps30 = 1,
    /// 60 frames per second.
    #[default]
    #[serde(rename = "Limit60FPS")]
    Fps60 = 2,
    /// 120 frames per second.
    #[serde(rename = "Limit120FPS")]
    Fps120 = 3,
    /// 144 frames per second.
    #[serde(rename = "Limit144FPS")]
    Fps144 = 4,
    /// No pacing at all.
    #[serde(rename = "LimitNone")]
    Unlimited = 5,
}

/// Returned when a name or index does not denote an FPS limit method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown fps limit method: {0}")]
pub struct ParseFpsLimitError(pub String);

impl FpsLimitMethod {
    /// Every method, in index order.
    pub const ALL: [Self; 6] = [
        Self::VSync,
        Self::Fps30,
        Self::Fps60,
        Self::Fps120,
        Self::Fps144,
        Self::Unlimited,
    ];

    /// Display names, indexed by method.
    pub const NAMES: [&'static str; 6] = [
        "LimitVSync",
        "Limit30FPS",
        "Limit60FPS",
        "Limit120FPS",
        "Limit144FPS",
        "LimitNone",
    ];

    /// Returns the display name of this method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Returns the numeric frame rate target, if this method has one.
    #[must_use]
    pub const fn target_fps(self) -> Option<u32> {
        match self {
            Self::Fps30 => Some(30),
            Self::Fps60 => Some(60),
            Self::Fps120 => Some(120),
            Self::Fps144 => Some(144),
            Self::VSync | Self::Unlimited => None,
        }
    }

    /// Minimum time between frame starts for numeric strategies.
    #[must_use]
    pub fn min_frame_time(self) -> Option<Duration> {
        self.target_fps()
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
    }

    /// Returns true if pacing is delegated to vsync.
    #[inline]
    #[must_use]
    pub const fn uses_vsync(self) -> bool {
        matches!(self, Self::VSync)
    }
}

impl TryFrom<u8> for FpsLimitMethod {
    type Error = ParseFpsLimitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| ParseFpsLimitError(value.to_string()))
    }
}

impl FromStr for FpsLimitMethod {
    type Err = ParseFpsLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(s))
            .map(|i| Self::ALL[i])
            .ok_or_else(|| ParseFpsLimitError(s.to_owned()))
    }
}

impl fmt::Display for FpsLimitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_indices() {
        for (i, method) in FpsLimitMethod::ALL.iter().enumerate() {
            assert_eq!(*method as usize, i);
            assert_eq!(method.name().parse::<FpsLimitMethod>(), Ok(*method));
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!(FpsLimitMethod::try_from(6).is_err());
        assert!("Limit90FPS".parse::<FpsLimitMethod>().is_err());
    }

    #[test]
    fn test_min_frame_time() {
        assert_eq!(FpsLimitMethod::VSync.min_frame_time(), None);
        assert_eq!(FpsLimitMethod::Unlimited.min_frame_time(), None);
        let t = FpsLimitMethod::Fps60.min_frame_time().unwrap_or_default();
        assert!((t.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_uses_display_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            fps: FpsLimitMethod,
        }
        let parsed: Wrapper = toml::from_str("fps = \"Limit144FPS\"").unwrap();
        assert_eq!(parsed.fps, FpsLimitMethod::Fps144);
    }
}
