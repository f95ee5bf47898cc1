use serde::{Deserialize, Serialize};

use crate::hsv::{Hsv, HUE_MAX, SAT_MAX, VAL_MAX};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    /// Inclusive upper bound of the channel domain.
    pub fn max(self) -> u8 {
        match self {
            Channel::Hue => HUE_MAX,
            Channel::Saturation => SAT_MAX,
            Channel::Value => VAL_MAX,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Hue => 0,
            Channel::Saturation => 1,
            Channel::Value => 2,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Value => "value",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`ColorRange::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorRangeError {
    #[error("{channel} lower bound {lower} exceeds upper bound {upper}")]
    InvertedBounds { channel: Channel, lower: u8, upper: u8 },
    #[error("{channel} bound {value} is outside [0, {max}]")]
    OutOfDomain { channel: Channel, value: u8, max: u8 },
}

/// Inclusive, non-wrapping HSV acceptance box.
///
/// A logical range that wraps around the hue seam is represented as two
/// `ColorRange`s (see [`ColorRange::wrapping`]) whose masks are unioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorRange {
    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// Split a logical range into non-wrapping pieces.
    ///
    /// When `lower.h > upper.h` the hue interval is taken to wrap through
    /// 179/0 and two ranges are returned: `[lower.h, 179]` and
    /// `[0, upper.h]`, both with the same saturation/value bounds.
    pub fn wrapping(lower: Hsv, upper: Hsv) -> Vec<ColorRange> {
        if lower.h <= upper.h {
            return vec![ColorRange::new(lower, upper)];
        }
        vec![
            ColorRange::new(lower, Hsv::new(HUE_MAX, upper.s, upper.v)),
            ColorRange::new(Hsv::new(0, lower.s, lower.v), upper),
        ]
    }

    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        px.h >= self.lower.h
            && px.h <= self.upper.h
            && px.s >= self.lower.s
            && px.s <= self.upper.s
            && px.v >= self.lower.v
            && px.v <= self.upper.v
    }

    pub fn validate(&self) -> Result<(), ColorRangeError> {
        let lower = self.lower.channels();
        let upper = self.upper.channels();
        for channel in Channel::ALL {
            let (lo, hi) = (lower[channel.index()], upper[channel.index()]);
            let max = channel.max();
            for value in [lo, hi] {
                if value > max {
                    return Err(ColorRangeError::OutOfDomain {
                        channel,
                        value,
                        max,
                    });
                }
            }
            if lo > hi {
                return Err(ColorRangeError::InvertedBounds {
                    channel,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(())
    }
}
