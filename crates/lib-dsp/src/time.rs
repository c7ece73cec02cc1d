//! Time-domain representations of a sampled signal.
//!
//! A signal in the time domain is either:
//! - [`UnevenSamples`]: explicit, non-decreasing sample times `t[i]`
//! - [`EvenSamples`]: an implicit regular grid `t[i] = t0 + i·dt`
//!
//! Both implement [`SampledSignal`], which provides a borrowed
//! [`SampleView`] for interpolation plus the usual reductions (peak, sum of
//! squares, mean, RMS) over Python-style index ranges.
//!
//! Each representation owns its [`Interpolator`]. Every mutable accessor
//! invalidates the interpolator's cached state before handing out the
//! reference, so a fit can never outlive the data it was built from.

use crate::cache::LazyCache;
use crate::error::{DspError, DspResult};
use crate::fft;
use crate::interpolation::Interpolator;
use crate::spectrum::Spectrum;
use lib_types::interpolation::InterpolationKind;
use std::ops::{
    AddAssign, Bound as RangeBound, DivAssign, Index, MulAssign, Range, RangeBounds, SubAssign,
};

/// Borrowed view of the samples of a time representation.
#[derive(Clone, Copy, Debug)]
pub enum SampleView<'a> {
    /// Explicit sample times.
    Uneven { t: &'a [f64], y: &'a [f64] },
    /// Regular grid starting at `t0` with spacing `dt`.
    Even { t0: f64, dt: f64, y: &'a [f64] },
}

impl<'a> SampleView<'a> {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.y().len()
    }

    /// Whether there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.y().is_empty()
    }

    /// Sample values.
    #[inline]
    pub fn y(&self) -> &'a [f64] {
        match *self {
            Self::Uneven { y, .. } | Self::Even { y, .. } => y,
        }
    }

    /// Time of sample `i`.
    #[inline]
    pub fn t_at(&self, i: usize) -> f64 {
        match *self {
            Self::Uneven { t, .. } => t[i],
            Self::Even { t0, dt, .. } => t0 + i as f64 * dt,
        }
    }

    /// Smallest index `i >= start` with `t[i] >= t`, or `len()` if none.
    ///
    /// On a regular grid the answer is computed directly; otherwise the
    /// search gallops forward from `start`, so a caller walking through
    /// sorted query times pays roughly constant cost per query.
    pub fn lower_bound(&self, t: f64, start: usize) -> usize {
        let n = self.len();
        let start = start.min(n);

        match *self {
            Self::Uneven { t: times, .. } => {
                let tail = &times[start..];
                let mut hi = 1;
                while hi < tail.len() && tail[hi] < t {
                    hi *= 2;
                }
                let lo = hi / 2;
                let hi = hi.min(tail.len());
                start + lo + tail[lo..hi].partition_point(|&v| v < t)
            }
            Self::Even { t0, dt, .. } => {
                let x = (t - t0) / dt;
                let mut k = if x <= 0.0 { 0 } else { x.ceil().min(n as f64) as usize };
                k = k.max(start);
                while k > start && self.t_at(k - 1) >= t {
                    k -= 1;
                }
                while k < n && self.t_at(k) < t {
                    k += 1;
                }
                k
            }
        }
    }
}

/// Location and value of a peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Sample index.
    pub index: usize,
    /// Sample value (absolute value for [`SampledSignal::peak_abs`]).
    pub value: f64,
}

/// Resolve a Python-style range (negative indices count from the end).
pub fn resolve_range<R: RangeBounds<isize>>(range: R, len: usize) -> Range<usize> {
    let norm = |i: isize| -> usize {
        if i < 0 {
            (len as isize + i).max(0) as usize
        } else {
            (i as usize).min(len)
        }
    };

    let start = match range.start_bound() {
        RangeBound::Included(&s) => norm(s),
        RangeBound::Excluded(&s) => (norm(s) + 1).min(len),
        RangeBound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        RangeBound::Included(&e) => (norm(e) + 1).min(len),
        RangeBound::Excluded(&e) => norm(e),
        RangeBound::Unbounded => len,
    };

    start..end.max(start)
}

/// Common behavior of time-domain representations.
pub trait SampledSignal {
    /// Borrowed view of the samples.
    fn view(&self) -> SampleView<'_>;

    /// Interpolator owned by this representation.
    fn interpolator(&self) -> &Interpolator;

    /// Sample times as a slice.
    fn times(&self) -> &[f64];

    /// Number of samples.
    fn len(&self) -> usize {
        self.view().len()
    }

    /// Whether there are no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample values.
    fn y(&self) -> &[f64] {
        self.view().y()
    }

    /// Time of sample `i`.
    fn t_at(&self, i: usize) -> f64 {
        self.view().t_at(i)
    }

    /// Spacing between sample `i` and `i + 1`.
    fn dt_at(&self, i: usize) -> f64 {
        let view = self.view();
        view.t_at(i + 1) - view.t_at(i)
    }

    /// Smallest index `i >= start` with `t[i] >= t`.
    fn lower_bound(&self, t: f64, start: usize) -> usize {
        self.view().lower_bound(t, start)
    }

    /// Interpolated value at time `t`.
    fn interpolate(&self, t: f64) -> f64 {
        self.interpolator().bind_owned(self.view()).eval(t)
    }

    /// Interpolated values at many times (`sorted`: times are non-decreasing).
    fn interpolate_many(&self, times: &[f64], sorted: bool) -> Vec<f64> {
        self.interpolator().bind_owned(self.view()).eval_many(times, sorted)
    }

    /// Largest value in the range.
    fn peak<R: RangeBounds<isize>>(&self, range: R) -> Option<Peak>
    where
        Self: Sized,
    {
        let y = self.y();
        let range = resolve_range(range, y.len());
        let offset = range.start;
        y[range]
            .iter()
            .enumerate()
            .fold(None, |best: Option<Peak>, (i, &v)| match best {
                Some(p) if p.value >= v => Some(p),
                _ => Some(Peak { index: offset + i, value: v }),
            })
    }

    /// Largest absolute value in the range.
    fn peak_abs<R: RangeBounds<isize>>(&self, range: R) -> Option<Peak>
    where
        Self: Sized,
    {
        let y = self.y();
        let range = resolve_range(range, y.len());
        let offset = range.start;
        y[range]
            .iter()
            .enumerate()
            .fold(None, |best: Option<Peak>, (i, &v)| match best {
                Some(p) if p.value >= v.abs() => Some(p),
                _ => Some(Peak { index: offset + i, value: v.abs() }),
            })
    }

    /// Sum of squared values in the range.
    fn sum_sq<R: RangeBounds<isize>>(&self, range: R) -> f64
    where
        Self: Sized,
    {
        let y = self.y();
        y[resolve_range(range, y.len())].iter().map(|v| v * v).sum()
    }

    /// Mean value over the range (0 for an empty range).
    fn mean<R: RangeBounds<isize>>(&self, range: R) -> f64
    where
        Self: Sized,
    {
        let y = self.y();
        let range = resolve_range(range, y.len());
        if range.is_empty() {
            return 0.0;
        }
        let count = range.len();
        y[range].iter().sum::<f64>() / count as f64
    }

    /// Root mean square: `sqrt(sum_sq(range) / len())`.
    ///
    /// The sum over the range is divided by the total number of samples,
    /// not by the length of the range.
    fn rms<R: RangeBounds<isize>>(&self, range: R) -> f64
    where
        Self: Sized,
    {
        let n = self.len();
        if n == 0 {
            return 0.0;
        }
        (self.sum_sq(range) / n as f64).sqrt()
    }
}

/// Samples with explicit times.
#[derive(Clone, Debug)]
pub struct UnevenSamples {
    t: Vec<f64>,
    y: Vec<f64>,
    nominal_dt: f64,
    interp: Interpolator,
}

impl UnevenSamples {
    /// Create from times and values.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ or the times decrease anywhere.
    pub fn new(t: Vec<f64>, y: Vec<f64>) -> Self {
        match Self::try_new(t, y) {
            Ok(samples) => samples,
            Err(e) => panic!("invalid uneven samples: {}", e),
        }
    }

    /// Create from times and values, validating them.
    pub fn try_new(t: Vec<f64>, y: Vec<f64>) -> DspResult<Self> {
        if t.len() != y.len() {
            return Err(DspError::LengthMismatch {
                expected: t.len(),
                actual: y.len(),
            });
        }
        if let Some(i) = t.windows(2).position(|w| w[1] < w[0]) {
            return Err(DspError::InvalidConfig(format!(
                "sample times must be non-decreasing (t[{}] = {} > t[{}] = {})",
                i,
                t[i],
                i + 1,
                t[i + 1]
            )));
        }

        Ok(Self {
            t,
            y,
            nominal_dt: 0.0,
            interp: Interpolator::default(),
        })
    }

    /// Copy the regular grid of an evenly sampled signal into explicit times.
    pub fn from_even(even: &EvenSamples) -> Self {
        Self {
            t: even.times().to_vec(),
            y: even.y().to_vec(),
            nominal_dt: even.dt(),
            interp: Interpolator::new(even.interpolator().kind()),
        }
    }

    /// Use a different interpolation strategy.
    pub fn with_interpolation(mut self, kind: InterpolationKind) -> Self {
        self.set_interpolation(kind);
        self
    }

    /// Replace the interpolator.
    pub fn set_interpolation(&mut self, kind: InterpolationKind) {
        self.interp = Interpolator::new(kind);
    }

    /// Hint for the expected spacing (0 if unknown).
    pub fn with_nominal_dt(mut self, dt: f64) -> Self {
        self.nominal_dt = dt;
        self
    }

    /// Expected spacing (0 if unknown).
    pub fn nominal_dt(&self) -> f64 {
        self.nominal_dt
    }

    /// Set the expected spacing (0 for unknown).
    pub fn set_nominal_dt(&mut self, dt: f64) {
        self.nominal_dt = dt;
    }

    /// Sample times.
    pub fn t(&self) -> &[f64] {
        &self.t
    }

    /// Mutable sample times. Must stay non-decreasing.
    pub fn t_mut(&mut self) -> &mut [f64] {
        self.interp.invalidate();
        &mut self.t
    }

    /// Mutable sample values.
    pub fn y_mut(&mut self) -> &mut [f64] {
        self.interp.invalidate();
        &mut self.y
    }

    /// Append a sample. `t` must not precede the last sample time.
    pub fn push(&mut self, t: f64, y: f64) {
        self.interp.invalidate();
        self.t.push(t);
        self.y.push(y);
    }

    /// The spacing, if every consecutive difference is bit-identical.
    ///
    /// Timestamps carrying any floating-point jitter are not regular.
    pub fn is_regular(&self) -> Option<f64> {
        if self.t.len() < 2 {
            return None;
        }
        let dt = self.t[1] - self.t[0];
        self.t
            .windows(2)
            .all(|w| (w[1] - w[0]).to_bits() == dt.to_bits())
            .then_some(dt)
    }

    /// Resample onto a regular grid.
    ///
    /// The grid starts at `t[0]`. Its spacing is `dt` if given, else the
    /// nominal spacing if known, else the mean spacing. It never extends
    /// past `t[last]`.
    ///
    /// The grid has `ceil((t[last] - t[0]) / dt)` points, plus one more when
    /// `t[last]` lies exactly on the grid. Plain `ceil` would drop that end
    /// sample, so an even signal copied to explicit times and resampled at a
    /// different spacing could never reach its last sample. The extra point
    /// keeps it.
    ///
    /// Regular input whose spacing equals the target spacing is copied;
    /// anything else goes through this representation's interpolator.
    pub fn to_even(&self, dt: Option<f64>) -> EvenSamples {
        let kind = self.interp.kind();
        let n = self.len();
        if n == 0 {
            let fallback = if self.nominal_dt > 0.0 { self.nominal_dt } else { 1.0 };
            let dt = dt.filter(|d| *d > 0.0).unwrap_or(fallback);
            return EvenSamples::new(Vec::new(), dt, 0.0).with_interpolation(kind);
        }

        let first = self.t[0];
        let last = self.t[n - 1];
        let span = last - first;

        let dt = dt
            .filter(|d| *d > 0.0)
            .or_else(|| (self.nominal_dt > 0.0).then_some(self.nominal_dt))
            .unwrap_or_else(|| if n > 1 { span / (n - 1) as f64 } else { 0.0 });

        if !(dt > 0.0 && dt.is_finite()) {
            // Single sample, or every sample at the same time.
            return EvenSamples::new(vec![self.y[0]], 1.0, first).with_interpolation(kind);
        }

        if self.is_regular() == Some(dt) {
            return EvenSamples::new(self.y.clone(), dt, first).with_interpolation(kind);
        }

        let mut count = (span / dt).ceil() as usize;
        if first + count as f64 * dt <= last {
            count += 1;
        }

        let grid: Vec<f64> = (0..count).map(|i| first + i as f64 * dt).collect();
        let values = self.interpolate_many(&grid, true);
        EvenSamples::new(values, dt, first).with_interpolation(kind)
    }
}

impl SampledSignal for UnevenSamples {
    fn view(&self) -> SampleView<'_> {
        SampleView::Uneven { t: &self.t, y: &self.y }
    }

    fn interpolator(&self) -> &Interpolator {
        &self.interp
    }

    fn times(&self) -> &[f64] {
        &self.t
    }
}

/// Samples on a regular grid `t[i] = t0 + i·dt`.
#[derive(Clone, Debug)]
pub struct EvenSamples {
    y: Vec<f64>,
    dt: f64,
    t0: f64,
    times: LazyCache<Vec<f64>>,
    interp: Interpolator,
}

impl EvenSamples {
    /// Create from values, spacing and start time.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is not positive and finite.
    pub fn new(y: Vec<f64>, dt: f64, t0: f64) -> Self {
        assert!(dt > 0.0 && dt.is_finite(), "dt must be positive and finite, got {}", dt);
        Self::from_parts(y, dt, t0)
    }

    fn from_parts(y: Vec<f64>, dt: f64, t0: f64) -> Self {
        Self {
            y,
            dt,
            t0,
            times: LazyCache::new(),
            interp: Interpolator::default(),
        }
    }

    /// `len` zero-valued samples.
    pub fn zeros(len: usize, dt: f64, t0: f64) -> Self {
        Self::new(vec![0.0; len], dt, t0)
    }

    /// Regular samples of an uneven signal (see [`UnevenSamples::to_even`]).
    pub fn from_uneven(uneven: &UnevenSamples, dt: Option<f64>) -> Self {
        uneven.to_even(dt)
    }

    /// Inverse transform of a spectrum: `Nt` samples with `dt = 1/(Nt·df)`.
    ///
    /// An empty spectrum (`Nt == 0`) yields an empty signal.
    pub fn from_spectrum(spectrum: &Spectrum) -> Self {
        let nt = spectrum.nt();
        if nt == 0 {
            return Self::from_parts(Vec::new(), 1.0, spectrum.t0());
        }
        let y = fft::inverse(nt, spectrum.bins());
        Self::from_parts(y, 1.0 / (nt as f64 * spectrum.df()), spectrum.t0())
    }

    /// Use a different interpolation strategy.
    pub fn with_interpolation(mut self, kind: InterpolationKind) -> Self {
        self.set_interpolation(kind);
        self
    }

    /// Replace the interpolator.
    pub fn set_interpolation(&mut self, kind: InterpolationKind) {
        self.interp = Interpolator::new(kind);
    }

    /// Sample spacing.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time of the first sample.
    #[inline]
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// `len() · dt`.
    pub fn duration(&self) -> f64 {
        self.y.len() as f64 * self.dt
    }

    /// Sample rate (reciprocal of dt).
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.dt
    }

    fn invalidate(&mut self) {
        self.times.invalidate();
        self.interp.invalidate();
    }

    /// Change the spacing.
    pub fn set_dt(&mut self, dt: f64) {
        assert!(dt > 0.0 && dt.is_finite(), "dt must be positive and finite, got {}", dt);
        self.dt = dt;
        self.invalidate();
    }

    /// Change the start time.
    pub fn set_t0(&mut self, t0: f64) {
        self.t0 = t0;
        self.invalidate();
    }

    /// Resize; new samples are zero.
    pub fn resize(&mut self, len: usize) {
        self.y.resize(len, 0.0);
        self.invalidate();
    }

    /// Mutable sample values.
    pub fn y_mut(&mut self) -> &mut [f64] {
        self.interp.invalidate();
        &mut self.y
    }

    /// Consume into the sample values.
    pub fn into_values(self) -> Vec<f64> {
        self.y
    }

    /// Write `t0 + i·dt` for each sample into `out`.
    pub fn fill_times(&self, out: &mut [f64]) {
        for (i, t) in out.iter_mut().enumerate().take(self.y.len()) {
            *t = self.t0 + i as f64 * self.dt;
        }
    }

    /// Whether the time array is currently materialized.
    pub fn times_cached(&self) -> bool {
        self.times.is_fresh()
    }
}

impl SampledSignal for EvenSamples {
    fn view(&self) -> SampleView<'_> {
        SampleView::Even {
            t0: self.t0,
            dt: self.dt,
            y: &self.y,
        }
    }

    fn interpolator(&self) -> &Interpolator {
        &self.interp
    }

    /// Sample times, computed on first use and cached until `t0`, `dt` or
    /// the length change.
    fn times(&self) -> &[f64] {
        self.times.get_or_compute(|| {
            let mut t = vec![0.0; self.y.len()];
            self.fill_times(&mut t);
            t
        })
    }
}

macro_rules! impl_scalar_ops {
    ($ty:ty) => {
        impl AddAssign<f64> for $ty {
            fn add_assign(&mut self, rhs: f64) {
                self.y_mut().iter_mut().for_each(|v| *v += rhs);
            }
        }

        impl SubAssign<f64> for $ty {
            fn sub_assign(&mut self, rhs: f64) {
                self.y_mut().iter_mut().for_each(|v| *v -= rhs);
            }
        }

        impl MulAssign<f64> for $ty {
            fn mul_assign(&mut self, rhs: f64) {
                self.y_mut().iter_mut().for_each(|v| *v *= rhs);
            }
        }

        impl DivAssign<f64> for $ty {
            fn div_assign(&mut self, rhs: f64) {
                self.y_mut().iter_mut().for_each(|v| *v /= rhs);
            }
        }

        impl Index<usize> for $ty {
            type Output = f64;

            fn index(&self, i: usize) -> &f64 {
                &self.y[i]
            }
        }
    };
}

impl_scalar_ops!(UnevenSamples);
impl_scalar_ops!(EvenSamples);
