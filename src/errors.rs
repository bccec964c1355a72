//! Error types with diagnostic codes using miette
//!
//! One enum per failure domain; the render entry point flattens them
//! into `RenderError`.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Hatching Errors
// ============================================================================

/// Errors raised before any hatch geometry is generated
#[derive(Error, Diagnostic, Debug)]
pub enum HatchError {
    #[error("invalid hatch interval: {value}")]
    #[diagnostic(
        code(hachure::hatch::invalid_interval),
        help("the interval must be a finite value greater than zero")
    )]
    InvalidInterval { value: f64 },

    #[error("invalid bounding box: {xmin},{ymin} .. {xmax},{ymax}")]
    #[diagnostic(code(hachure::hatch::invalid_bounds))]
    InvalidBounds {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },

    #[error("shape is degenerate ({distinct} distinct points)")]
    #[diagnostic(
        code(hachure::hatch::degenerate_shape),
        help("a hatchable shape needs at least two distinct points")
    )]
    DegenerateShape { distinct: usize },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors detected when a configuration schema is constructed or read
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("property {key}: minimum {min} is greater than maximum {max}")]
    #[diagnostic(code(hachure::config::min_over_max))]
    MinOverMax { key: String, min: f64, max: f64 },

    #[error("property {key}: default {default} lies outside [{min}, {max}]")]
    #[diagnostic(code(hachure::config::default_out_of_range))]
    DefaultOutOfRange {
        key: String,
        default: f64,
        min: f64,
        max: f64,
    },

    #[error("property {key}: default choice {default:?} is not one of the declared choices")]
    #[diagnostic(code(hachure::config::unknown_choice))]
    UnknownChoice { key: String, default: String },

    #[error("unknown property: {key}")]
    #[diagnostic(code(hachure::config::unknown_property))]
    UnknownProperty { key: String },

    #[error("property {key} holds a {actual} value, expected {expected}")]
    #[diagnostic(code(hachure::config::type_mismatch))]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

// ============================================================================
// Raster Errors
// ============================================================================

/// Errors wrapping a decoded pixel buffer
#[derive(Error, Diagnostic, Debug)]
pub enum RasterError {
    #[error("pixel buffer holds {actual} bytes but {width}x{height} RGBA needs {expected}")]
    #[diagnostic(code(hachure::raster::buffer_size))]
    BufferSize {
        actual: usize,
        expected: usize,
        width: usize,
        height: usize,
    },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that abort an artwork's render pass
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("segment grid is out of sync with aggregate statistics: {cells} cells vs {samples} samples")]
    #[diagnostic(
        code(hachure::render::grid_mismatch),
        help("the drawing canvas and the source image were segmented at different detail levels")
    )]
    GridMismatch { cells: usize, samples: usize },

    #[error("artwork requires image statistics but none were supplied")]
    #[diagnostic(code(hachure::render::missing_setup))]
    MissingSetup,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Hatch(#[from] HatchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Raster(#[from] RasterError),
}
