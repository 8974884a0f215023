//! Engine configuration.
//!
//! Every tunable threshold the engine uses lives in [`EngineConfig`]. The
//! defaults match the module-level constants, so free functions called with
//! those constants behave exactly like a default-configured [`Session`].
//!
//! [`Session`]: crate::session::Session

use crate::binding::{BINDING_GAP, BINDING_THRESHOLD, TEXT_BINDING_GAP};
use crate::clipboard::DUPLICATE_OFFSET;
use crate::container::{ANIMATION_DURATION_MS, CONTAINER_PADDING, OVERLAP_THRESHOLD};
use crate::geometry::DEFAULT_BEZIER_SAMPLES;
use crate::hit_test::HIT_TOLERANCE;
use crate::history::MAX_HISTORY;
use crate::transform::handles::{HANDLE_MARGIN, HANDLE_RADIUS, ROTATE_HANDLE_DISTANCE};
use crate::transform::rotation::{MAGNET_TOLERANCE_DEG, SNAP_INCREMENT_DEG};
use crate::transform::MIN_ELEMENT_SIZE;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

/// Tunable engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Proximity within which a shape becomes a bind target.
    pub binding_threshold: f64,
    /// Clearance between a bound arrow end and the shape surface.
    pub binding_gap: f64,
    /// Clearance between bound text and the shape box.
    pub text_binding_gap: f64,
    /// Share of a child's area that must overlap a container to attach.
    pub overlap_threshold: f64,
    /// Padding kept around children by auto-resize.
    pub container_padding: f64,
    /// Distance within which a line or arrow counts as hit.
    pub hit_tolerance: f64,
    /// Segments used to approximate curved arrows.
    pub bezier_samples: usize,
    /// Smallest width or height a resize may produce.
    pub min_element_size: f64,
    pub rotation_snap_increment_deg: f64,
    pub rotation_magnet_tolerance_deg: f64,
    pub handle_margin: f64,
    pub rotate_handle_distance: f64,
    pub handle_radius: f64,
    /// Snapshots kept by the undo history.
    pub max_history: usize,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: Vec2,
    pub container_animation_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binding_threshold: BINDING_THRESHOLD,
            binding_gap: BINDING_GAP,
            text_binding_gap: TEXT_BINDING_GAP,
            overlap_threshold: OVERLAP_THRESHOLD,
            container_padding: CONTAINER_PADDING,
            hit_tolerance: HIT_TOLERANCE,
            bezier_samples: DEFAULT_BEZIER_SAMPLES,
            min_element_size: MIN_ELEMENT_SIZE,
            rotation_snap_increment_deg: SNAP_INCREMENT_DEG,
            rotation_magnet_tolerance_deg: MAGNET_TOLERANCE_DEG,
            handle_margin: HANDLE_MARGIN,
            rotate_handle_distance: ROTATE_HANDLE_DISTANCE,
            handle_radius: HANDLE_RADIUS,
            max_history: MAX_HISTORY,
            duplicate_offset: DUPLICATE_OFFSET,
            container_animation_ms: ANIMATION_DURATION_MS,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field,
            reason: format!("expected a finite positive number, got {value}"),
        })
    }
}

impl EngineConfig {
    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("Loaded engine configuration: {config:?}");
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("binding_threshold", self.binding_threshold)?;
        positive("binding_gap", self.binding_gap)?;
        positive("text_binding_gap", self.text_binding_gap)?;
        positive("overlap_threshold", self.overlap_threshold)?;
        if self.overlap_threshold > 1.0 {
            return Err(ConfigError::Validation {
                field: "overlap_threshold",
                reason: format!("must be at most 1, got {}", self.overlap_threshold),
            });
        }
        positive("container_padding", self.container_padding)?;
        positive("hit_tolerance", self.hit_tolerance)?;
        positive("min_element_size", self.min_element_size)?;
        positive("rotation_snap_increment_deg", self.rotation_snap_increment_deg)?;
        positive("rotation_magnet_tolerance_deg", self.rotation_magnet_tolerance_deg)?;
        positive("handle_margin", self.handle_margin)?;
        positive("rotate_handle_distance", self.rotate_handle_distance)?;
        positive("handle_radius", self.handle_radius)?;
        if self.bezier_samples == 0 {
            return Err(ConfigError::Validation {
                field: "bezier_samples",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_history == 0 {
            return Err(ConfigError::Validation {
                field: "max_history",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.duplicate_offset.x.is_finite() && self.duplicate_offset.y.is_finite()) {
            return Err(ConfigError::Validation {
                field: "duplicate_offset",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
