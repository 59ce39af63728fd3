//! Render pass configuration.

use glint_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::bucket::DEFAULT_BUCKET_SIZE;
use crate::primitive::Color;
use crate::scene_buffer::DEFAULT_CAPACITY;
use crate::tracer::{TraceSettings, MAX_BOUNCES, SKY_COLOR};

/// Errors reported when a render configuration is rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image resolution must be positive, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Bucket size must be at least 1")]
    ZeroBucketSize,

    #[error("Bounce limit must be at least 1")]
    ZeroBounces,

    #[error("Scene capacity must be at least 1 record")]
    ZeroCapacity,

    #[error("Camera resolution {camera:?} does not match configured {config:?}")]
    ResolutionMismatch {
        camera: (u32, u32),
        config: (u32, u32),
    },
}

/// Settings for one render pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Edge length of the square tiles rendered in parallel
    #[serde(default = "default_bucket_size")]
    pub bucket_size: u32,
    /// Maximum loop iterations per camera ray
    #[serde(default = "default_max_bounces")]
    pub max_bounces: u32,
    /// Color added when a ray leaves the scene
    #[serde(default = "default_sky_color")]
    pub sky_color: Vec3,
    /// Record capacity used when packing the scene
    #[serde(default = "default_scene_capacity")]
    pub scene_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            bucket_size: default_bucket_size(),
            max_bounces: default_max_bounces(),
            sky_color: default_sky_color(),
            scene_capacity: default_scene_capacity(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::ZeroBucketSize);
        }
        if self.max_bounces == 0 {
            return Err(ConfigError::ZeroBounces);
        }
        if self.scene_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Tracer settings derived from this configuration.
    pub fn trace_settings(&self) -> TraceSettings {
        TraceSettings {
            max_bounces: self.max_bounces,
            sky_color: self.sky_color,
        }
    }
}

const fn default_bucket_size() -> u32 {
    DEFAULT_BUCKET_SIZE
}

const fn default_max_bounces() -> u32 {
    MAX_BOUNCES
}

const fn default_sky_color() -> Color {
    SKY_COLOR
}

const fn default_scene_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = RenderConfig::from_json(r#"{"width": 320, "height": 240}"#).unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 240);
        assert_eq!(config.bucket_size, 64);
        assert_eq!(config.max_bounces, 4);
        assert_eq!(config.sky_color, Vec3::ONE);
        assert_eq!(config.scene_capacity, 1024);
        assert_eq!(config.trace_settings(), TraceSettings::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let config = RenderConfig::from_json(
            r#"{"width": 8, "height": 8, "maxBounces": 2, "skyColor": [0.8, 0.8, 0.8], "sceneCapacity": 2048}"#,
        )
        .unwrap();

        assert_eq!(config.max_bounces, 2);
        assert_eq!(config.sky_color, Vec3::splat(0.8));
        assert_eq!(config.scene_capacity, 2048);
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let err = RenderConfig::from_json(r#"{"width": 0, "height": 8}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidResolution {
                width: 0,
                height: 8
            }
        ));
    }

    #[test]
    fn test_rejects_zero_bounces() {
        let err =
            RenderConfig::from_json(r#"{"width": 8, "height": 8, "maxBounces": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroBounces));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = RenderConfig::from_json(r#"{"width": 8"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_default_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }
}
