//! # lib-types
//!
//! Core type definitions shared by the sigview workspace.
//!
//! This crate holds the plain-data pieces that do not need the transform
//! engine:
//! - Interpolation strategy selection (linear or spline, with options)
//! - Per-signal configuration threaded through representation constructors

pub mod interpolation;

pub use interpolation::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
