//! Frequency responses evaluated bin by bin.
//!
//! A [`Response`] maps a frequency to a complex gain. Filling a
//! [`Spectrum`] evaluates the response at every bin frequency `f(i)`.

use crate::angle::TAU;
use crate::spectrum::Spectrum;
use num_complex::Complex64;
use std::sync::Arc;

/// Complex frequency response.
pub trait Response: Send + Sync {
    /// Complex gain at frequency `f`.
    fn h(&self, f: f64) -> Complex64;

    /// `|H(f)|`.
    fn gain(&self, f: f64) -> f64 {
        self.h(f).norm()
    }

    /// `arg H(f)`.
    fn phase(&self, f: f64) -> f64 {
        self.h(f).arg()
    }

    /// Overwrite every bin of `spectrum` with this response.
    fn fill(&self, spectrum: &mut Spectrum) {
        spectrum.fill_with(|f| self.h(f));
    }

    /// Evaluate at many frequencies.
    fn h_many(&self, freqs: &[f64]) -> Vec<Complex64> {
        freqs.iter().map(|&f| self.h(f)).collect()
    }
}

/// `H(f) = 1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitResponse;

impl Response for UnitResponse {
    fn h(&self, _f: f64) -> Complex64 {
        Complex64::new(1.0, 0.0)
    }
}

/// Pure delay `H(f) = exp(-j·2π·f·τ)`.
#[derive(Clone, Copy, Debug)]
pub struct DelayResponse {
    delay: f64,
}

impl DelayResponse {
    /// Delay by `delay` in the caller's time unit.
    pub fn new(delay: f64) -> Self {
        Self { delay }
    }

    /// The delay `τ`.
    pub fn delay(&self) -> f64 {
        self.delay
    }
}

impl Response for DelayResponse {
    fn h(&self, f: f64) -> Complex64 {
        Complex64::from_polar(1.0, -TAU * f * self.delay)
    }
}

/// Product of several responses.
#[derive(Clone, Default)]
pub struct CompositeResponse {
    parts: Vec<Arc<dyn Response>>,
}

impl CompositeResponse {
    /// An empty product, equal to the unit response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factor.
    pub fn with(mut self, response: Arc<dyn Response>) -> Self {
        self.push(response);
        self
    }

    /// Add a factor in place.
    pub fn push(&mut self, response: Arc<dyn Response>) {
        self.parts.push(response);
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether there are no factors.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl std::fmt::Debug for CompositeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeResponse")
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl Response for CompositeResponse {
    fn h(&self, f: f64) -> Complex64 {
        self.parts
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, part| acc * part.h(f))
    }
}

/// Tabulated response, linearly interpolated between bins.
#[derive(Clone, Debug)]
pub struct InterpolatingResponse {
    table: Spectrum,
}

impl InterpolatingResponse {
    pub fn new(table: Spectrum) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Spectrum {
        &self.table
    }
}

impl Response for InterpolatingResponse {
    fn h(&self, f: f64) -> Complex64 {
        self.table.at(f)
    }
}
