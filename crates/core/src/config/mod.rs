use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CursorError, InteractivePredicate, Result};

/// Fraction of the remaining distance closed on every frame.
pub const DEFAULT_DAMPING: f64 = 0.15;

/// Edge length of the overlay in CSS pixels.
pub const DEFAULT_SIZE_PX: f64 = 24.0;

/// Top-level configuration for a pointer follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    pub damping: f64,
    pub size_px: f64,
    pub scales: VisualScales,
    pub timestep: Timestep,
    pub interactive: InteractivePredicate,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            size_px: DEFAULT_SIZE_PX,
            scales: VisualScales::default(),
            timestep: Timestep::default(),
            interactive: InteractivePredicate::default(),
        }
    }
}

impl FollowerConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(CursorError::InvalidConfig(
                "damping must lie strictly between 0 and 1",
            ));
        }
        if !(self.size_px.is_finite() && self.size_px > 0.0) {
            return Err(CursorError::InvalidConfig("size_px must be positive"));
        }
        self.scales.validate()?;
        if self.interactive.is_empty() {
            return Err(CursorError::InvalidConfig(
                "interactive predicate must match at least one tag or attribute",
            ));
        }
        Ok(())
    }
}

/// Scale applied to the overlay in each visual state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualScales {
    pub neutral: f64,
    pub expanded: f64,
    pub contracted: f64,
}

impl Default for VisualScales {
    fn default() -> Self {
        Self {
            neutral: 1.0,
            expanded: 1.5,
            contracted: 0.5,
        }
    }
}

impl VisualScales {
    fn validate(&self) -> Result<()> {
        let all_positive = [self.neutral, self.expanded, self.contracted]
            .iter()
            .all(|scale| scale.is_finite() && *scale > 0.0);
        if all_positive {
            Ok(())
        } else {
            Err(CursorError::InvalidConfig("visual scales must be positive"))
        }
    }
}

/// How the damping factor relates to frame timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timestep {
    /// Apply the damping factor once per frame callback, whatever the
    /// refresh rate.
    #[default]
    Fixed,
    /// Scale the factor by `min(1, elapsed_ms / 16.67)` so that high refresh
    /// displays do not speed up the follow.
    Normalized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FollowerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.damping, 0.15);
        assert_eq!(config.timestep, Timestep::Fixed);
    }

    #[test]
    fn rejects_damping_outside_open_interval() {
        for damping in [0.0, 1.0, -0.2, 1.5, f64::NAN] {
            let config = FollowerConfig {
                damping,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CursorError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn rejects_non_positive_scale() {
        let config = FollowerConfig {
            scales: VisualScales {
                contracted: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: FollowerConfig =
            serde_json::from_str(r#"{ "damping": 0.3, "timestep": "normalized" }"#).unwrap();
        assert_eq!(config.damping, 0.3);
        assert_eq!(config.timestep, Timestep::Normalized);
        assert_eq!(config.size_px, DEFAULT_SIZE_PX);
        assert_eq!(config.scales, VisualScales::default());
    }
}
