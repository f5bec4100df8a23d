//! Runtime knobs for the layout engine and the virtual display.
//!
//! Geometry policy (padding, divider thickness, tuck sliver) is fixed in
//! `constants`; the values here are the ones a host may reasonably tune.

use std::str::FromStr;

use crate::constants::{FLING_VELOCITY_THRESHOLD, MIN_DRAG_DISTANCE, SNAP_EDGE_INSET};
use crate::error::ConfigError;
use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Multiplier applied to every animation duration. `0.0` makes all
    /// animations complete on the next tick.
    pub animation_scale: f64,
    pub min_drag_distance: i32,
    pub fling_velocity_threshold: f32,
    pub snap_edge_inset: i32,
    /// Offer the 1/3 and 2/3 divider positions when both windows fit.
    pub third_ratios: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            animation_scale: 1.0,
            min_drag_distance: MIN_DRAG_DISTANCE,
            fling_velocity_threshold: FLING_VELOCITY_THRESHOLD,
            snap_edge_inset: SNAP_EDGE_INSET,
            third_ratios: true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=10.0).contains(&self.animation_scale) {
            return Err(ConfigError::AnimationScale(self.animation_scale));
        }
        if self.min_drag_distance < 0 {
            return Err(ConfigError::Negative {
                name: "min_drag_distance",
                value: self.min_drag_distance as f64,
            });
        }
        if self.fling_velocity_threshold < 0.0 {
            return Err(ConfigError::Negative {
                name: "fling_velocity_threshold",
                value: self.fling_velocity_threshold as f64,
            });
        }
        if self.snap_edge_inset < 0 {
            return Err(ConfigError::Negative {
                name: "snap_edge_inset",
                value: self.snap_edge_inset as f64,
            });
        }
        Ok(())
    }
}

/// Size of the virtual display and the space reserved by the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySpec {
    pub size: Size,
    pub shelf_height: i32,
}

impl DisplaySpec {
    pub const MIN_SIDE: i32 = 200;

    pub fn new(width: i32, height: i32, shelf_height: i32) -> Result<Self, ConfigError> {
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(ConfigError::DisplayTooSmall {
                width,
                height,
                min: Self::MIN_SIDE,
            });
        }
        if shelf_height < 0 || shelf_height >= height / 2 {
            return Err(ConfigError::ShelfTooTall {
                shelf: shelf_height,
                height,
            });
        }
        Ok(Self {
            size: Size::new(width, height),
            shelf_height,
        })
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.size.width, self.size.height)
    }
}

impl Default for DisplaySpec {
    fn default() -> Self {
        Self {
            size: Size::new(1600, 1000),
            shelf_height: 48,
        }
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `1600x1000`.
impl FromStr for Size {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::DisplaySize(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<i32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<i32>().map_err(|_| invalid())?;
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        Ok(Size::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_animation_scale() {
        let config = LayoutConfig {
            animation_scale: 12.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AnimationScale(12.0)));
    }

    #[test]
    fn parses_display_size() {
        assert_eq!("1600x1000".parse::<Size>(), Ok(Size::new(1600, 1000)));
        assert_eq!(" 800X600 ".parse::<Size>(), Ok(Size::new(800, 600)));
        assert!("1600".parse::<Size>().is_err());
        assert!("ax10".parse::<Size>().is_err());
        assert!("0x10".parse::<Size>().is_err());
    }

    #[test]
    fn display_spec_validates_shelf() {
        assert!(DisplaySpec::new(1600, 1000, 48).is_ok());
        assert_eq!(
            DisplaySpec::new(1600, 1000, 600),
            Err(ConfigError::ShelfTooTall {
                shelf: 600,
                height: 1000
            })
        );
        assert!(matches!(
            DisplaySpec::new(100, 1000, 0),
            Err(ConfigError::DisplayTooSmall { .. })
        ));
    }
}
