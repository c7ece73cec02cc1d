//! Operations built on top of [`Signal`].
//!
//! Everything here goes through the `update_*` accessors, so the derived
//! representations of the signals involved stay consistent.

use crate::error::{DspError, DspResult};
use crate::response::Response;
use crate::signal::Signal;
use crate::spectrum::Spectrum;
use crate::time::{EvenSamples, SampledSignal};
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Rotate every bin by 90° in place: `Y ← (-Im Y, Re Y)`.
pub fn hilbert_in_place(spectrum: &mut Spectrum) {
    for bin in spectrum.bins_mut() {
        *bin = Complex64::new(-bin.im, bin.re);
    }
}

/// Copy of `spectrum` rotated by 90°.
pub fn hilbert_spectrum(spectrum: &Spectrum) -> Spectrum {
    let mut rotated = spectrum.clone();
    hilbert_in_place(&mut rotated);
    rotated
}

/// Circular cross-correlation of `a` against `b`.
///
/// Sample `k` of the result holds `Σ a[m + k]·b[m] / scale`, rotated so zero
/// lag sits in the middle of the buffer. The result's `t0` makes its time
/// axis the lag of `a` relative to `b`, including the difference of their
/// start times. With `npad > 0` the spectrum is zero-padded first, sampling
/// the correlation `1 + npad` times more finely.
pub fn correlation(a: &Signal, b: &Signal, npad: usize, scale: f64) -> DspResult<Signal> {
    let fa = a.spectrum();
    let fb = b.spectrum();
    if fa.nt() != fb.nt() {
        warn!(a = fa.nt(), b = fb.nt(), "correlating signals of different lengths");
        return Err(DspError::LengthMismatch {
            expected: fa.nt(),
            actual: fb.nt(),
        });
    }
    if fa.nt() == 0 {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }

    let factor = (1 + npad) as f64 / scale;
    let bins: Vec<Complex64> = fa
        .bins()
        .iter()
        .zip(fb.bins())
        .map(|(ya, yb)| ya * yb.conj() * factor)
        .collect();

    let mut spectrum = Spectrum::new(fa.nt(), bins, fa.df(), fa.t0());
    if npad > 0 {
        spectrum.pad(npad);
    }

    let offset = fa.t0() - fb.t0();
    let mut out = Signal::from_spectrum(spectrum).with_interpolation(a.interpolation());
    let even = out.update_even();
    let len = even.len();
    even.y_mut().rotate_left(len / 2);
    let t0 = offset - (len / 2) as f64 * even.dt();
    even.set_t0(t0);

    debug!(len, npad, "correlation");
    Ok(out)
}

/// Result of [`impulsivity`].
#[derive(Clone, Debug, PartialEq)]
pub struct Impulsivity {
    /// `2·mean(cdf) - 1`: 1 for a single spike, near 0 for spread power.
    pub measure: f64,
    /// `(distance from the point, fraction of total power within it)`.
    pub distance_cdf: Vec<(f64, f64)>,
}

/// Impulsivity of a signal around `point` (default: the absolute peak).
///
/// Power is accumulated outward from the point one sample at a time on
/// both sides, normalized by the total power, giving a distance CDF.
/// A signal with no power has measure 0 and an empty CDF.
pub fn impulsivity(signal: &Signal, point: Option<usize>, use_envelope: bool) -> Impulsivity {
    let samples: &EvenSamples = if use_envelope { signal.envelope() } else { signal.even() };
    let y = samples.y();
    let n = y.len();
    let total = samples.sum_sq(..);

    if n == 0 || total <= 0.0 {
        return Impulsivity {
            measure: 0.0,
            distance_cdf: Vec::new(),
        };
    }

    let pt = point
        .or_else(|| samples.peak_abs(..).map(|p| p.index))
        .unwrap_or(0)
        .min(n - 1);
    let steps = (pt + 1).max(n - pt + 1);
    let dt = samples.dt();

    let mut power = y[pt] * y[pt];
    let mut cdf = Vec::with_capacity(steps);
    cdf.push((0.0, power / total));
    let mut cdf_sum = power;

    for i in 1..steps {
        if pt + i < n {
            power += y[pt + i] * y[pt + i];
        }
        if i <= pt {
            power += y[pt - i] * y[pt - i];
        }
        cdf.push((i as f64 * dt, power / total));
        cdf_sum += power;
    }

    Impulsivity {
        measure: 2.0 * cdf_sum / (steps as f64 * total) - 1.0,
        distance_cdf: cdf,
    }
}

/// Remove the phase of `response` from `signal`: each bin is multiplied by
/// `|R|/R`. Bins where the response is zero are left unchanged.
pub fn dedisperse(signal: &mut Signal, response: &Spectrum) -> DspResult<()> {
    let nf = signal.spectrum().nf();
    if response.nf() != nf {
        return Err(DspError::LengthMismatch {
            expected: nf,
            actual: response.nf(),
        });
    }

    let spectrum = signal.update_spectrum();
    for (y, r) in spectrum.bins_mut().iter_mut().zip(response.bins()) {
        let mag = r.norm();
        if mag > 0.0 {
            *y *= r.conj() / mag;
        }
    }
    Ok(())
}

/// [`dedisperse`] with a response evaluated on the signal's own bins.
pub fn dedisperse_with(signal: &mut Signal, response: &dyn Response) -> DspResult<()> {
    let spectrum = signal.spectrum();
    let mut sampled = Spectrum::zeros(spectrum.nt(), spectrum.df(), spectrum.t0());
    response.fill(&mut sampled);
    dedisperse(signal, &sampled)
}

/// Envelopes of many independent signals, computed in parallel.
pub fn envelopes_par(signals: &[Signal]) -> Vec<&EvenSamples> {
    signals.par_iter().map(Signal::envelope).collect()
}
