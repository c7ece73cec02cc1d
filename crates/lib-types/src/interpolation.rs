//! Interpolation strategy selection.
//!
//! Every time-domain representation owns one interpolator, built from an
//! [`InterpolationKind`]. The kind is a closed sum type so that
//! strategy-specific options are checked at construction time.
//!
//! There is no process-wide default that can be changed at runtime: callers
//! that want something other than [`InterpolationKind::default`] pass a
//! [`SignalConfig`] (or a kind) to the constructor they use. Signals that
//! already own an interpolator are never affected by a later configuration.

use serde::{Deserialize, Serialize};

/// Spline family used by [`InterpolationKind::Spline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    /// Piecewise cubic with continuous second derivative.
    Cubic,
    /// Akima spline: local, resistant to overshoot near outliers.
    #[default]
    Akima,
}

impl SplineKind {
    /// Minimum number of input samples the spline needs to be fitted.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Cubic => 3,
            Self::Akima => 5,
        }
    }
}

/// Boundary condition at both ends of a cubic spline.
///
/// Akima splines ignore this: their end slopes come from the data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplineBoundary {
    /// Second derivative is zero at the end points.
    #[default]
    Natural,
    /// First derivative is fixed at the end points.
    Clamped { left: f64, right: f64 },
}

/// How unevenly-timed samples are moved onto a regular grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterpolationKind {
    /// Piecewise linear, flat beyond the first and last sample.
    #[default]
    Linear,
    /// Lazily fitted spline.
    Spline {
        #[serde(default)]
        kind: SplineKind,
        #[serde(default)]
        boundary: SplineBoundary,
    },
}

impl InterpolationKind {
    /// Cubic spline with natural boundaries.
    pub const fn cubic() -> Self {
        Self::Spline {
            kind: SplineKind::Cubic,
            boundary: SplineBoundary::Natural,
        }
    }

    /// Akima spline.
    pub const fn akima() -> Self {
        Self::Spline {
            kind: SplineKind::Akima,
            boundary: SplineBoundary::Natural,
        }
    }

    /// Minimum number of input samples needed for a meaningful result.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Linear => 1,
            Self::Spline { kind, .. } => kind.min_size(),
        }
    }
}

/// Configuration handed to signal constructors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Interpolation strategy for every time representation the signal builds.
    #[serde(default)]
    pub interpolation: InterpolationKind,
}

impl SignalConfig {
    /// Configuration with a specific interpolation strategy.
    pub fn with_interpolation(interpolation: InterpolationKind) -> Self {
        Self { interpolation }
    }
}

impl From<InterpolationKind> for SignalConfig {
    fn from(interpolation: InterpolationKind) -> Self {
        Self::with_interpolation(interpolation)
    }
}
