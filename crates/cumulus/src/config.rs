//! Configuration types for Cumulus diagram rendering.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and styled. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining layout and style settings.
//! - [`LayoutConfig`] - Controls the [`LayoutDirection`] the layout engine ranks nodes in.
//! - [`StyleConfig`] - Controls visual styling options such as background color.
//!
//! # Example
//!
//! ```
//! # use cumulus::config::{AppConfig, LayoutDirection};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().direction(), LayoutDirection::LeftRight);
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Layout configuration for the external layout engine.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Direction the engine ranks nodes in.
    #[serde(default)]
    direction: LayoutDirection,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] with the specified direction.
    pub fn new(direction: LayoutDirection) -> Self {
        Self { direction }
    }

    /// Returns the configured [`LayoutDirection`].
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to layout engine defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color for the whole diagram, passed through to the
    /// engine verbatim (color name or `#rrggbb`).
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`] with the given background color.
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the configured background color, if any.
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }
}

/// Direction the layout engine ranks nodes in.
///
/// Maps to the engine's `rankdir` attribute. The names match external
/// configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Left to right (default), `rankdir=LR`.
    #[default]
    LeftRight,
    /// Top to bottom, `rankdir=TB`.
    TopBottom,
    /// Right to left, `rankdir=RL`.
    RightLeft,
    /// Bottom to top, `rankdir=BT`.
    BottomTop,
}

impl LayoutDirection {
    /// The engine's `rankdir` value for this direction.
    pub fn as_rankdir(self) -> &'static str {
        match self {
            LayoutDirection::LeftRight => "LR",
            LayoutDirection::TopBottom => "TB",
            LayoutDirection::RightLeft => "RL",
            LayoutDirection::BottomTop => "BT",
        }
    }
}

impl FromStr for LayoutDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left_right" => Ok(Self::LeftRight),
            "top_bottom" => Ok(Self::TopBottom),
            "right_left" => Ok(Self::RightLeft),
            "bottom_top" => Ok(Self::BottomTop),
            _ => Err("Unsupported layout direction"),
        }
    }
}

impl From<LayoutDirection> for &'static str {
    fn from(val: LayoutDirection) -> Self {
        match val {
            LayoutDirection::LeftRight => "left_right",
            LayoutDirection::TopBottom => "top_bottom",
            LayoutDirection::RightLeft => "right_left",
            LayoutDirection::BottomTop => "bottom_top",
        }
    }
}

impl Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_round_trips_through_its_name() {
        for direction in [
            LayoutDirection::LeftRight,
            LayoutDirection::TopBottom,
            LayoutDirection::RightLeft,
            LayoutDirection::BottomTop,
        ] {
            let name: &'static str = direction.into();
            assert_eq!(name.parse::<LayoutDirection>(), Ok(direction));
            assert_eq!(direction.to_string(), name);
        }
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert!("diagonal".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn default_config_uses_left_right_and_no_background() {
        let config = AppConfig::default();
        assert_eq!(config.layout().direction(), LayoutDirection::LeftRight);
        assert_eq!(config.style().background_color(), None);
    }

    #[test]
    fn rankdir_values_match_the_engine_vocabulary() {
        assert_eq!(LayoutDirection::LeftRight.as_rankdir(), "LR");
        assert_eq!(LayoutDirection::TopBottom.as_rankdir(), "TB");
        assert_eq!(LayoutDirection::RightLeft.as_rankdir(), "RL");
        assert_eq!(LayoutDirection::BottomTop.as_rankdir(), "BT");
    }
}
