//! # lib-dsp
//!
//! Signal representation engine.
//!
//! A [`Signal`] can be held as unevenly sampled data, evenly sampled data or
//! a spectrum, and derives whichever representation is asked for from the
//! one written last:
//!
//! - **Transforms**: real FFTs with per-thread plan caching and a wisdom file
//! - **Interpolation**: linear, cubic and Akima splines over sampled data
//! - **Representations**: [`UnevenSamples`], [`EvenSamples`], [`Spectrum`]
//! - **Derived signals**: Hilbert transform, envelope, correlation,
//!   impulsivity and dedispersion
//! - **Responses**: frequency responses evaluated onto spectra

pub mod angle;
pub mod cache;
pub mod error;
pub mod fft;
pub mod interpolation;
pub mod ops;
pub mod response;
pub mod signal;
pub mod spectrum;
pub mod time;

pub use error::{DspError, DspResult};
pub use interpolation::Interpolator;
pub use response::Response;
pub use signal::Signal;
pub use spectrum::Spectrum;
pub use time::{EvenSamples, SampledSignal, UnevenSamples};
