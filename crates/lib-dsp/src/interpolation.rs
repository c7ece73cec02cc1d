//! Interpolation of sampled signals at arbitrary times.
//!
//! An [`Interpolator`] is owned by the time representation whose samples it
//! reads, but it never stores or copies those samples. It is bound to them
//! for the duration of an evaluation, and whatever internal state it keeps
//! (a fitted spline) belongs to the input it was last bound to.
//!
//! [`Interpolator::bind`] takes `&mut self` and discards that state, so an
//! external caller always gets a fit of the samples it passes. Owning
//! representations bind through `&self` instead and call
//! [`Interpolator::invalidate`] from every mutable accessor.
//!
//! Two strategies are available:
//! - Linear: bracket search plus linear interpolation, flat extrapolation.
//! - Spline: cubic or Akima, fitted on first evaluation after binding.
//!   Inputs shorter than the spline's minimum size produce all-zero output.

use crate::cache::LazyCache;
use crate::time::SampleView;
use lib_types::interpolation::{InterpolationKind, SplineBoundary, SplineKind};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Value at `t` by linear interpolation between the bracketing samples.
///
/// `start` is a lower bound on the bracket, as returned by a previous call
/// for a smaller `t`. Returns the value and the bracket index to reuse.
#[inline]
fn linear_at(view: &SampleView<'_>, t: f64, start: usize) -> (f64, usize) {
    let y = view.y();
    let n = y.len();
    if n == 0 {
        return (0.0, 0);
    }

    let k = view.lower_bound(t, start);
    let value = if k == 0 {
        y[0]
    } else if k == n {
        y[n - 1]
    } else if view.t_at(k) == t {
        y[k]
    } else {
        let t_lo = view.t_at(k - 1);
        let t_hi = view.t_at(k);
        y[k - 1] + (t - t_lo) * (y[k] - y[k - 1]) / (t_hi - t_lo)
    };
    (value, k)
}

/// Piecewise-linear interpolation with flat extrapolation.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Evaluate at each of `times`, writing into `out`.
    pub fn evaluate_into(
        &self,
        input: &SampleView<'_>,
        times: &[f64],
        sorted: bool,
        out: &mut [f64],
    ) {
        let mut last = 0;
        for (t, value) in times.iter().zip(out.iter_mut()) {
            let (v, k) = linear_at(input, *t, last);
            *value = v;
            if sorted {
                last = k;
            }
        }
    }
}

/// Polynomial coefficients of a fitted spline.
///
/// On interval `i` the curve is
/// `y[i] + b[i]·dx + c[i]·dx² + d[i]·dx³` with `dx = t - t[i]`.
#[derive(Debug)]
struct SplineFit {
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl SplineFit {
    /// Value on interval `i` at offset `dx` from its left knot.
    #[inline]
    fn eval(&self, y: &[f64], i: usize, dx: f64) -> f64 {
        y[i] + dx * (self.b[i] + dx * (self.c[i] + dx * self.d[i]))
    }
}

/// Remembers the last interval used, to skip the search for nearby times.
///
/// One accelerator lives for a single evaluation call, so concurrent
/// readers never share it.
#[derive(Debug, Default)]
struct Accelerator {
    interval: Option<usize>,
    hits: usize,
    misses: usize,
}

impl Accelerator {
    /// The cached interval `i` if `t[i] <= t < t[i + 1]`.
    #[inline]
    fn lookup(&mut self, view: &SampleView<'_>, t: f64) -> Option<usize> {
        let i = self.interval?;
        if view.t_at(i) <= t && t < view.t_at(i + 1) {
            self.hits += 1;
            Some(i)
        } else {
            None
        }
    }

    fn record(&mut self, i: usize) {
        self.misses += 1;
        self.interval = Some(i);
    }
}

#[derive(Debug)]
enum FitState {
    /// Input too short (or not increasing); output is zero.
    Degenerate,
    Fitted(SplineFit),
}

/// Spline interpolation, fitted lazily and cached until invalidated.
pub struct SplineInterpolator {
    kind: SplineKind,
    boundary: SplineBoundary,
    fit: LazyCache<FitState>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl SplineInterpolator {
    /// Create an unfitted spline interpolator.
    pub fn new(kind: SplineKind, boundary: SplineBoundary) -> Self {
        Self {
            kind,
            boundary,
            fit: LazyCache::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Spline family.
    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    /// Whether a fit is currently cached.
    pub fn is_fitted(&self) -> bool {
        matches!(self.fit.get(), Some(FitState::Fitted(_)))
    }

    /// Lookups served by the cached interval, and lookups that searched,
    /// since the last invalidation.
    pub fn accelerator_stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Discard any fitted state.
    pub fn invalidate(&mut self) {
        self.fit.invalidate();
        *self.hits.get_mut() = 0;
        *self.misses.get_mut() = 0;
    }

    fn compute_fit(&self, view: &SampleView<'_>) -> FitState {
        let n = view.len();
        let min = self.kind.min_size();
        if n < min {
            tracing::warn!(
                len = n,
                min,
                kind = ?self.kind,
                "Input smaller than minimum size for spline, output will be zero"
            );
            return FitState::Degenerate;
        }

        let x: Vec<f64> = (0..n).map(|i| view.t_at(i)).collect();
        if x.windows(2).any(|w| w[1] <= w[0]) {
            tracing::warn!(
                len = n,
                "Spline input times not strictly increasing, output will be zero"
            );
            return FitState::Degenerate;
        }

        tracing::trace!(len = n, kind = ?self.kind, "Fitting spline");
        FitState::Fitted(match self.kind {
            SplineKind::Cubic => fit_cubic(&x, view.y(), &self.boundary),
            SplineKind::Akima => fit_akima(&x, view.y()),
        })
    }

    /// Evaluate at each of `times`, writing into `out`.
    ///
    /// `input` must be the samples the cached fit (if any) was built from.
    pub fn evaluate_into(
        &self,
        input: &SampleView<'_>,
        times: &[f64],
        sorted: bool,
        out: &mut [f64],
    ) {
        let fit = match self.fit.get_or_compute(|| self.compute_fit(input)) {
            FitState::Fitted(fit) => fit,
            FitState::Degenerate => {
                out.iter_mut().for_each(|v| *v = 0.0);
                return;
            }
        };

        let y = input.y();
        let n = y.len();
        debug_assert_eq!(fit.b.len() + 1, n, "spline fit does not match bound input");

        let mut accel = Accelerator::default();
        let mut last = 0;
        for (t, value) in times.iter().zip(out.iter_mut()) {
            let (v, k) = match accel.lookup(input, *t) {
                Some(i) => (fit.eval(y, i, *t - input.t_at(i)), i),
                None => {
                    let k = input.lower_bound(*t, last);
                    let v = if k == 0 {
                        y[0]
                    } else if k == n {
                        y[n - 1]
                    } else if input.t_at(k) == *t {
                        y[k]
                    } else {
                        accel.record(k - 1);
                        fit.eval(y, k - 1, *t - input.t_at(k - 1))
                    };
                    (v, k)
                }
            };
            *value = v;
            if sorted {
                last = k;
            }
        }

        self.hits.fetch_add(accel.hits, Ordering::Relaxed);
        self.misses.fetch_add(accel.misses, Ordering::Relaxed);
    }
}

impl Clone for SplineInterpolator {
    /// Clones the configuration only; the copy refits on first use.
    fn clone(&self) -> Self {
        Self::new(self.kind, self.boundary)
    }
}

impl fmt::Debug for SplineInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplineInterpolator")
            .field("kind", &self.kind)
            .field("boundary", &self.boundary)
            .field("fitted", &self.is_fitted())
            .finish()
    }
}

/// Solve a tridiagonal system with the Thomas algorithm.
///
/// Row `i` reads `lower[i]·x[i-1] + diag[i]·x[i] + upper[i]·x[i+1] = rhs[i]`;
/// `lower[0]` and `upper[n-1]` are ignored.
fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - lower[i] * c_prime[i - 1];
        c_prime[i] = upper[i] / denom;
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    x
}

/// Cubic spline coefficients for strictly increasing `x`, `n >= 3`.
fn fit_cubic(x: &[f64], y: &[f64], boundary: &SplineBoundary) -> SplineFit {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    for i in 1..n - 1 {
        lower[i] = h[i - 1];
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        upper[i] = h[i];
        rhs[i] = 3.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }

    match *boundary {
        SplineBoundary::Natural => {
            diag[0] = 1.0;
            diag[n - 1] = 1.0;
        }
        SplineBoundary::Clamped { left, right } => {
            diag[0] = 2.0 * h[0];
            upper[0] = h[0];
            rhs[0] = 3.0 * ((y[1] - y[0]) / h[0] - left);

            diag[n - 1] = 2.0 * h[n - 2];
            lower[n - 1] = h[n - 2];
            rhs[n - 1] = 3.0 * (right - (y[n - 1] - y[n - 2]) / h[n - 2]);
        }
    }

    let c = solve_tridiagonal(&lower, &diag, &upper, &rhs);

    let mut b = Vec::with_capacity(n - 1);
    let mut d = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        b.push((y[i + 1] - y[i]) / h[i] - h[i] * (2.0 * c[i] + c[i + 1]) / 3.0);
        d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
    }

    SplineFit { b, c: c[..n - 1].to_vec(), d }
}

/// Akima spline coefficients for strictly increasing `x`, `n >= 5`.
fn fit_akima(x: &[f64], y: &[f64]) -> SplineFit {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Secant slopes, padded with two extrapolated slopes on each side:
    // m[k + 2] is the slope of interval k.
    let mut m = vec![0.0; n + 3];
    for k in 0..n - 1 {
        m[k + 2] = (y[k + 1] - y[k]) / h[k];
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 3.0 * m[2] - 2.0 * m[3];
    m[n + 1] = 2.0 * m[n] - m[n - 1];
    m[n + 2] = 3.0 * m[n] - 2.0 * m[n - 1];

    // Slope at knot i, from the four surrounding secants.
    let slope: Vec<f64> = (0..n)
        .map(|i| {
            let w_right = (m[i + 3] - m[i + 2]).abs();
            let w_left = (m[i + 1] - m[i]).abs();
            if w_right + w_left == 0.0 {
                0.5 * (m[i + 1] + m[i + 2])
            } else {
                (w_right * m[i + 1] + w_left * m[i + 2]) / (w_right + w_left)
            }
        })
        .collect();

    let mut b = Vec::with_capacity(n - 1);
    let mut c = Vec::with_capacity(n - 1);
    let mut d = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        let secant = m[i + 2];
        b.push(slope[i]);
        c.push((3.0 * secant - 2.0 * slope[i] - slope[i + 1]) / h[i]);
        d.push((slope[i] + slope[i + 1] - 2.0 * secant) / (h[i] * h[i]));
    }

    SplineFit { b, c, d }
}

/// An interpolation strategy instance.
#[derive(Clone, Debug)]
pub enum Interpolator {
    Linear(LinearInterpolator),
    Spline(SplineInterpolator),
}

impl Interpolator {
    /// Build an interpolator for a strategy.
    pub fn new(kind: InterpolationKind) -> Self {
        match kind {
            InterpolationKind::Linear => Self::Linear(LinearInterpolator),
            InterpolationKind::Spline { kind, boundary } => {
                Self::Spline(SplineInterpolator::new(kind, boundary))
            }
        }
    }

    /// Strategy this interpolator implements.
    pub fn kind(&self) -> InterpolationKind {
        match self {
            Self::Linear(_) => InterpolationKind::Linear,
            Self::Spline(s) => InterpolationKind::Spline {
                kind: s.kind,
                boundary: s.boundary,
            },
        }
    }

    /// Discard cached state derived from the bound input.
    pub fn invalidate(&mut self) {
        if let Self::Spline(s) = self {
            s.invalidate();
        }
    }

    /// Bind to `input` for evaluation, discarding state fitted to any
    /// previously bound input.
    pub fn bind<'a>(&'a mut self, input: SampleView<'a>) -> Bound<'a> {
        self.invalidate();
        Bound { interpolator: self, input }
    }

    /// Bind without discarding cached state. The owner of `input` must call
    /// [`invalidate`](Self::invalidate) whenever those samples change.
    pub(crate) fn bind_owned<'a>(&'a self, input: SampleView<'a>) -> Bound<'a> {
        Bound { interpolator: self, input }
    }

    fn evaluate_into(
        &self,
        input: &SampleView<'_>,
        times: &[f64],
        sorted: bool,
        out: &mut [f64],
    ) {
        match self {
            Self::Linear(l) => l.evaluate_into(input, times, sorted, out),
            Self::Spline(s) => s.evaluate_into(input, times, sorted, out),
        }
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(InterpolationKind::default())
    }
}

/// An interpolator bound to the samples it reads.
#[derive(Clone, Copy, Debug)]
pub struct Bound<'a> {
    interpolator: &'a Interpolator,
    input: SampleView<'a>,
}

impl<'a> Bound<'a> {
    /// Value at a single time.
    pub fn eval(&self, t: f64) -> f64 {
        let mut out = [0.0];
        self.eval_into(&[t], true, &mut out);
        out[0]
    }

    /// Values at many times.
    ///
    /// When `sorted` is true the times must be non-decreasing; successive
    /// lookups then resume from the previous bracket.
    pub fn eval_many(&self, times: &[f64], sorted: bool) -> Vec<f64> {
        let mut out = vec![0.0; times.len()];
        self.eval_into(times, sorted, &mut out);
        out
    }

    /// Values at many times, written into `out` (`out.len() == times.len()`).
    pub fn eval_into(&self, times: &[f64], sorted: bool, out: &mut [f64]) {
        debug_assert_eq!(times.len(), out.len());
        self.interpolator.evaluate_into(&self.input, times, sorted, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uneven<'a>(t: &'a [f64], y: &'a [f64]) -> SampleView<'a> {
        SampleView::Uneven { t, y }
    }

    #[test]
    fn test_linear_exact_at_samples() {
        let t = [0.0, 0.1, 0.35, 0.7, 1.3];
        let y = [1.0, -2.5, 3.25, 0.1, 7.0];
        let mut interp = Interpolator::new(InterpolationKind::Linear);
        let bound = interp.bind(uneven(&t, &y));

        assert_eq!(bound.eval_many(&t, true), y.to_vec());
        for (ti, yi) in t.iter().zip(y.iter()) {
            assert_eq!(bound.eval(*ti), *yi);
        }
    }

    #[test]
    fn test_linear_midpoints_and_flat_extrapolation() {
        let t = [0.0, 1.0, 3.0];
        let y = [0.0, 2.0, -2.0];
        let mut interp = Interpolator::new(InterpolationKind::Linear);
        let bound = interp.bind(uneven(&t, &y));

        let out = bound.eval_many(&[-5.0, 0.5, 2.0, 10.0], true);
        assert_eq!(out, vec![0.0, 1.0, 0.0, -2.0]);
    }

    #[test]
    fn test_linear_unsorted_matches_sorted() {
        let t: Vec<f64> = (0..40).map(|i| (i as f64).powf(1.3)).collect();
        let y: Vec<f64> = t.iter().map(|v| v.sin()).collect();
        let mut interp = Interpolator::new(InterpolationKind::Linear);
        let bound = interp.bind(uneven(&t, &y));

        let sorted: Vec<f64> = (0..200).map(|i| i as f64 * 0.5).collect();
        let mut shuffled = sorted.clone();
        shuffled.reverse();

        let a = bound.eval_many(&sorted, true);
        let mut b = bound.eval_many(&shuffled, false);
        b.reverse();
        assert_eq!(a, b);
    }

    #[test]
    fn test_linear_on_even_grid() {
        let y = [0.0, 1.0, 4.0, 9.0];
        let mut interp = Interpolator::new(InterpolationKind::Linear);
        let bound = interp.bind(SampleView::Even { t0: 1.0, dt: 0.5, y: &y });

        assert_eq!(bound.eval(1.0), 0.0);
        assert_eq!(bound.eval(2.0), 4.0);
        assert!((bound.eval(1.75) - 2.5).abs() < 1e-12);
        assert_eq!(bound.eval(0.0), 0.0);
        assert_eq!(bound.eval(3.0), 9.0);
    }

    #[test]
    fn test_natural_cubic_reproduces_line() {
        // A natural spline through samples of a straight line is that line.
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.7 + 0.01 * (i * i) as f64).collect();
        let y: Vec<f64> = t.iter().map(|v| 3.0 * v - 1.0).collect();
        let mut interp = Interpolator::new(InterpolationKind::cubic());
        let bound = interp.bind(uneven(&t, &y));

        for q in [0.2, 1.1, 2.9, 5.0, 6.3] {
            assert!((bound.eval(q) - (3.0 * q - 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_akima_smooth_signal() {
        let t: Vec<f64> = (0..60).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = t.iter().map(|v| v.sin()).collect();
        let mut interp = Interpolator::new(InterpolationKind::akima());
        let bound = interp.bind(uneven(&t, &y));

        let q: Vec<f64> = (0..50).map(|i| 0.05 + i as f64 * 0.1).collect();
        let out = bound.eval_many(&q, true);
        for (qi, v) in q.iter().zip(out.iter()) {
            assert!((v - qi.sin()).abs() < 1e-3, "{} at {}", v, qi);
        }
        assert_eq!(bound.eval(t[7]), y[7]);
    }

    #[test]
    fn test_clamped_cubic_end_slopes() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 4.0, 9.0];
        let mut interp = Interpolator::new(InterpolationKind::Spline {
            kind: SplineKind::Cubic,
            boundary: SplineBoundary::Clamped { left: 0.0, right: 6.0 },
        });
        let bound = interp.bind(uneven(&t, &y));

        // x² has exactly these end slopes, so the clamped spline is x².
        for q in [0.25, 1.5, 2.75] {
            assert!((bound.eval(q) - q * q).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spline_too_short_gives_zeros() {
        let t = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 3.0];
        let mut interp = Interpolator::new(InterpolationKind::akima());
        let bound = interp.bind(uneven(&t, &y));

        assert_eq!(bound.eval_many(&[0.5, 1.5], true), vec![0.0, 0.0]);
    }

    #[test]
    fn test_spline_refits_on_new_input() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let a = [0.0, 1.0, 2.0, 3.0];
        let b = [0.0, 2.0, 4.0, 6.0];
        let mut interp = Interpolator::new(InterpolationKind::cubic());

        assert!((interp.bind(uneven(&t, &a)).eval(1.5) - 1.5).abs() < 1e-12);
        assert!((interp.bind(uneven(&t, &b)).eval(1.5) - 3.0).abs() < 1e-12);

        match &interp {
            Interpolator::Spline(s) => assert!(s.is_fitted()),
            _ => unreachable!(),
        }
        interp.invalidate();
        match &interp {
            Interpolator::Spline(s) => assert!(!s.is_fitted()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_spline_rebind_refilled_buffer() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut y = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let mut interp = Interpolator::new(InterpolationKind::cubic());

        let first = interp.bind(uneven(&t, &y)).eval(1.5);
        y.clear();
        y.extend([0.0, 10.0, 20.0, 30.0, 40.0]);
        let second = interp.bind(uneven(&t, &y)).eval(1.5);

        assert!((first - 1.5).abs() < 1e-9);
        assert!((second - 15.0).abs() < 1e-9, "got {}", second);
    }

    #[test]
    fn test_owned_binding_keeps_fit_until_invalidated() {
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        let a = [0.0, 1.0, 2.0, 3.0, 4.0];
        let b = [0.0, 2.0, 4.0, 6.0, 8.0];
        let mut interp = Interpolator::new(InterpolationKind::cubic());

        assert!((interp.bind_owned(uneven(&t, &a)).eval(2.5) - 2.5).abs() < 1e-9);
        interp.invalidate();
        assert!((interp.bind_owned(uneven(&t, &b)).eval(2.5) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_accelerator_skips_search_within_interval() {
        let t: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y: Vec<f64> = t.iter().map(|v| v * v).collect();
        let mut interp = Interpolator::new(InterpolationKind::akima());
        let bound = interp.bind(uneven(&t, &y));

        // Unsorted queries in one interval: only the first one searches.
        let q = [3.1, 3.5, 3.05, 3.9, 3.3];
        let out = bound.eval_many(&q, false);
        let mut fresh = Interpolator::new(InterpolationKind::akima());
        for (qi, v) in q.iter().zip(out.iter()) {
            assert_eq!(fresh.bind(uneven(&t, &y)).eval(*qi), *v);
        }

        match &interp {
            Interpolator::Spline(s) => assert_eq!(s.accelerator_stats(), (q.len() - 1, 1)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_accelerator_reuses_interval() {
        let t: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y: Vec<f64> = t.iter().map(|v| v * v).collect();
        let mut interp = Interpolator::new(InterpolationKind::akima());
        let bound = interp.bind(uneven(&t, &y));

        let q: Vec<f64> = (1..10).map(|i| 3.0 + i as f64 * 0.09).collect();
        let _ = bound.eval_many(&q, true);

        match &interp {
            Interpolator::Spline(s) => assert_eq!(s.accelerator_stats(), (q.len() - 1, 1)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_spline_shared_across_threads() {
        let t: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let y: Vec<f64> = t.iter().map(|v| (v * 0.1).cos()).collect();
        let mut interp = Interpolator::new(InterpolationKind::cubic());
        let bound = interp.bind(uneven(&t, &y));
        let expected = bound.eval_many(&[10.5, 20.25, 70.75], true);
        assert!(matches!(bound.interpolator, Interpolator::Spline(s) if s.is_fitted()));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(bound.eval_many(&[10.5, 20.25, 70.75], true), expected);
                });
            }
        });
    }
}
