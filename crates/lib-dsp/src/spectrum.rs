//! Frequency-domain representation of a real signal.
//!
//! A [`Spectrum`] holds the `Nt/2 + 1` non-negative frequency bins of a
//! real signal with `Nt` time samples, the bin spacing `df` and the time
//! offset `t0` of the signal it came from. Unwrapped phase and group delay
//! are derived lazily and cached until the bins change.

use crate::angle;
use crate::cache::LazyCache;
use crate::error::{DspError, DspResult};
use crate::fft;
use crate::time::{EvenSamples, SampledSignal};
use num_complex::Complex64;
use std::ops::Index;

/// Value reported in dB for a bin with zero magnitude.
pub const DB_FLOOR: f64 = -100.0;

/// Non-negative frequency bins of a real signal.
#[derive(Clone, Debug)]
pub struct Spectrum {
    nt: usize,
    df: f64,
    t0: f64,
    bins: Vec<Complex64>,
    unwrapped: LazyCache<Vec<f64>>,
    group_delay: LazyCache<Vec<f64>>,
}

impl Spectrum {
    /// Create from bins.
    ///
    /// # Panics
    ///
    /// Panics if `bins.len() != nt / 2 + 1`.
    pub fn new(nt: usize, bins: Vec<Complex64>, df: f64, t0: f64) -> Self {
        match Self::try_new(nt, bins, df, t0) {
            Ok(spectrum) => spectrum,
            Err(e) => panic!("invalid spectrum: {}", e),
        }
    }

    /// Create from bins, checking their count against `nt`.
    pub fn try_new(nt: usize, bins: Vec<Complex64>, df: f64, t0: f64) -> DspResult<Self> {
        let expected = fft::bins_for(nt);
        if bins.len() != expected {
            return Err(DspError::LengthMismatch {
                expected,
                actual: bins.len(),
            });
        }

        Ok(Self {
            nt,
            df,
            t0,
            bins,
            unwrapped: LazyCache::new(),
            group_delay: LazyCache::new(),
        })
    }

    /// All-zero spectrum for `nt` time samples.
    pub fn zeros(nt: usize, df: f64, t0: f64) -> Self {
        Self::new(nt, vec![Complex64::new(0.0, 0.0); fft::bins_for(nt)], df, t0)
    }

    /// Forward transform of a regularly sampled signal: `df = 1/(N·dt)`.
    ///
    /// An empty signal yields a single zero bin with `df = 0`.
    pub fn from_even(even: &EvenSamples) -> Self {
        let nt = even.len();
        if nt == 0 {
            return Self::zeros(0, 0.0, even.t0());
        }
        let bins = fft::forward(even.y());
        Self::new(nt, bins, 1.0 / (nt as f64 * even.dt()), even.t0())
    }

    fn invalidate(&mut self) {
        self.unwrapped.invalidate();
        self.group_delay.invalidate();
    }

    /// Number of time samples.
    #[inline]
    pub fn nt(&self) -> usize {
        self.nt
    }

    /// Number of frequency bins (`nt / 2 + 1`).
    #[inline]
    pub fn nf(&self) -> usize {
        self.bins.len()
    }

    /// Bin spacing.
    #[inline]
    pub fn df(&self) -> f64 {
        self.df
    }

    /// Time offset of the first sample of the matching time signal.
    #[inline]
    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// Set the time offset.
    pub fn set_t0(&mut self, t0: f64) {
        self.t0 = t0;
    }

    /// Frequency of bin `i`.
    #[inline]
    pub fn f(&self, i: usize) -> f64 {
        i as f64 * self.df
    }

    /// Frequencies of all bins.
    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.nf()).map(|i| self.f(i)).collect()
    }

    /// Bins.
    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    /// Mutable bins.
    pub fn bins_mut(&mut self) -> &mut [Complex64] {
        self.invalidate();
        &mut self.bins
    }

    /// Bin `i`.
    pub fn bin(&self, i: usize) -> Complex64 {
        self.bins[i]
    }

    /// Value at an arbitrary frequency.
    ///
    /// Real and imaginary parts are interpolated linearly between bins;
    /// below zero the DC bin is used and past the last bin its value holds.
    pub fn at(&self, freq: f64) -> Complex64 {
        let last = self.nf() - 1;
        if self.df <= 0.0 || freq <= 0.0 {
            return self.bins[0];
        }

        let x = freq / self.df;
        let i = x.floor() as usize;
        if i >= last {
            return self.bins[last];
        }

        let frac = x - i as f64;
        self.bins[i] * (1.0 - frac) + self.bins[i + 1] * frac
    }

    /// Overwrite every bin with `h(f)` evaluated at its frequency.
    pub fn fill_with<F>(&mut self, mut h: F)
    where
        F: FnMut(f64) -> Complex64,
    {
        let df = self.df;
        for (i, bin) in self.bins_mut().iter_mut().enumerate() {
            *bin = h(i as f64 * df);
        }
    }

    /// Change the number of time samples, zero-filling new bins.
    pub fn set_nt(&mut self, nt: usize) {
        self.nt = nt;
        self.bins.resize(fft::bins_for(nt), Complex64::new(0.0, 0.0));
        self.invalidate();
    }

    /// Zero-pad to `(1 + n)` times the current length.
    ///
    /// `df` is unchanged, so the matching time signal is sampled `1 + n`
    /// times more finely over the same span.
    pub fn pad(&mut self, n: usize) {
        self.set_nt(self.nt * (1 + n));
    }

    /// Magnitude `|Y[i]|`, or `10·log10(|Y[i]|)` in dB.
    pub fn mag(&self, i: usize, db: bool) -> f64 {
        let m = self.bins[i].norm();
        if db {
            if m > 0.0 {
                10.0 * m.log10()
            } else {
                DB_FLOOR
            }
        } else {
            m
        }
    }

    /// Magnitudes of all bins.
    pub fn mags(&self, db: bool) -> Vec<f64> {
        (0..self.nf()).map(|i| self.mag(i, db)).collect()
    }

    /// Squared magnitude `|Y[i]|²`, or `20·log10(|Y[i]|²)` in dB.
    pub fn norm(&self, i: usize, db: bool) -> f64 {
        let n = self.bins[i].norm_sqr();
        if db {
            if n > 0.0 {
                20.0 * n.log10()
            } else {
                DB_FLOOR
            }
        } else {
            n
        }
    }

    /// Squared magnitudes of all bins.
    pub fn norms(&self, db: bool) -> Vec<f64> {
        (0..self.nf()).map(|i| self.norm(i, db)).collect()
    }

    /// Phase of bin `i`, wrapped or from the unwrapped sequence.
    pub fn phase(&self, i: usize, unwrapped: bool) -> f64 {
        if unwrapped {
            self.unwrapped_phases()[i]
        } else {
            self.bins[i].arg()
        }
    }

    /// Phases of all bins.
    pub fn phases(&self, unwrapped: bool) -> Vec<f64> {
        if unwrapped {
            self.unwrapped_phases().to_vec()
        } else {
            self.bins.iter().map(|b| b.arg()).collect()
        }
    }

    /// Unwrapped phase, cached until the bins change.
    pub fn unwrapped_phases(&self) -> &[f64] {
        self.unwrapped.get_or_compute(|| {
            let mut phases: Vec<f64> = self.bins.iter().map(|b| b.arg()).collect();
            angle::unwrap(&mut phases);
            phases
        })
    }

    /// Group delay of bin `i`.
    pub fn group_delay(&self, i: usize) -> f64 {
        self.group_delays()[i]
    }

    /// Group delay per bin, cached until the bins change.
    ///
    /// Forward difference of the unwrapped phase, `(φ[i] - φ[i+1]) / (2π·df)`.
    /// The last bin has no successor and reports 0.
    pub fn group_delays(&self) -> &[f64] {
        self.group_delay.get_or_compute(|| {
            let nf = self.nf();
            let mut delays = vec![0.0; nf];
            let dw = angle::TAU * self.df;
            if dw > 0.0 {
                let phases = self.unwrapped_phases();
                for i in 1..nf {
                    delays[i - 1] = (phases[i - 1] - phases[i]) / dw;
                }
            }
            delays
        })
    }

    /// Whether the unwrapped phase is currently cached.
    pub fn phases_cached(&self) -> bool {
        self.unwrapped.is_fresh()
    }
}

impl Index<usize> for Spectrum {
    type Output = Complex64;

    fn index(&self, i: usize) -> &Complex64 {
        &self.bins[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn delayed_impulse(n: usize, dt: f64, delay_samples: usize) -> EvenSamples {
        let mut y = vec![0.0; n];
        y[delay_samples] = 1.0;
        EvenSamples::new(y, dt, 0.0)
    }

    #[test]
    fn test_from_even_metadata() {
        let even = EvenSamples::new(vec![0.0; 100], 0.01, 2.5);
        let spectrum = Spectrum::from_even(&even);
        assert_eq!(spectrum.nt(), 100);
        assert_eq!(spectrum.nf(), 51);
        assert!((spectrum.df() - 1.0).abs() < 1e-12);
        assert_eq!(spectrum.t0(), 2.5);
        assert!((spectrum.f(10) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_try_new_rejects_wrong_bin_count() {
        let bins = vec![Complex64::new(0.0, 0.0); 5];
        assert!(matches!(
            Spectrum::try_new(16, bins, 1.0, 0.0),
            Err(DspError::LengthMismatch { expected: 9, actual: 5 })
        ));
    }

    #[test]
    fn test_linear_phase_group_delay() {
        let n = 64;
        let dt = 1e-3;
        let k = 5;
        let spectrum = Spectrum::from_even(&delayed_impulse(n, dt, k));

        // A pure delay of k samples: phase -2π·f·k·dt, group delay k·dt.
        let expected_delay = k as f64 / (n as f64 * spectrum.df());
        assert!((expected_delay - k as f64 * dt).abs() < 1e-12);

        let phases = spectrum.unwrapped_phases();
        for (i, phase) in phases.iter().enumerate() {
            let expected = -2.0 * PI * spectrum.f(i) * k as f64 * dt;
            assert!((phase - expected).abs() < 1e-9, "bin {}: {} vs {}", i, phase, expected);
        }

        let delays = spectrum.group_delays();
        for &d in &delays[..spectrum.nf() - 1] {
            assert!((d - expected_delay).abs() < 1e-9);
        }
        assert_eq!(delays[spectrum.nf() - 1], 0.0);
    }

    #[test]
    fn test_bins_mut_invalidates_phase_cache() {
        let mut spectrum = Spectrum::from_even(&delayed_impulse(32, 1.0, 3));
        let _ = spectrum.unwrapped_phases();
        assert!(spectrum.phases_cached());

        for bin in spectrum.bins_mut() {
            *bin = Complex64::new(1.0, 0.0);
        }
        assert!(!spectrum.phases_cached());
        assert!(spectrum.group_delays().iter().all(|&d| d.abs() < 1e-15));
    }

    #[test]
    fn test_resize_invalidates_phase_cache() {
        let mut spectrum = Spectrum::from_even(&delayed_impulse(32, 1.0, 3));
        assert_eq!(spectrum.group_delays().len(), 17);
        assert!(spectrum.phases_cached());

        spectrum.pad(1);
        assert!(!spectrum.phases_cached());
        assert_eq!(spectrum.unwrapped_phases().len(), 33);
        assert_eq!(spectrum.group_delays().len(), 33);
        assert_eq!(spectrum.group_delay(32), 0.0);

        spectrum.set_nt(8);
        assert!(!spectrum.phases_cached());
        assert_eq!(spectrum.group_delays().len(), 5);
        for i in 0..4 {
            assert!((spectrum.group_delay(i) - 3.0).abs() < 1e-9, "bin {}", i);
        }
    }

    #[test]
    fn test_magnitude_db_floor() {
        let mut spectrum = Spectrum::zeros(8, 1.0, 0.0);
        spectrum.bins_mut()[1] = Complex64::new(3.0, 4.0);

        assert_eq!(spectrum.mag(1, false), 5.0);
        assert!((spectrum.mag(1, true) - 10.0 * 5f64.log10()).abs() < 1e-12);
        assert_eq!(spectrum.norm(1, false), 25.0);
        assert!((spectrum.norm(1, true) - 20.0 * 25f64.log10()).abs() < 1e-12);

        assert_eq!(spectrum.mag(0, true), DB_FLOOR);
        assert_eq!(spectrum.norm(2, true), DB_FLOOR);
        assert_eq!(spectrum.mags(false).len(), 5);
    }

    #[test]
    fn test_at_interpolates_and_holds() {
        let mut spectrum = Spectrum::zeros(6, 0.5, 0.0);
        spectrum.fill_with(|f| Complex64::new(f, -2.0 * f));

        let mid = spectrum.at(0.75);
        assert!((mid.re - 0.75).abs() < 1e-12);
        assert!((mid.im + 1.5).abs() < 1e-12);

        assert_eq!(spectrum.at(-1.0), spectrum[0]);
        assert_eq!(spectrum.at(100.0), spectrum[3]);
    }

    #[test]
    fn test_pad_keeps_df_and_bins() {
        let even = EvenSamples::new((0..16).map(|i| (i as f64).sin()).collect(), 0.1, 0.0);
        let mut spectrum = Spectrum::from_even(&even);
        let original = spectrum.bins().to_vec();
        let df = spectrum.df();

        spectrum.pad(3);
        assert_eq!(spectrum.nt(), 64);
        assert_eq!(spectrum.nf(), 33);
        assert_eq!(spectrum.df(), df);
        assert_eq!(&spectrum.bins()[..original.len()], original.as_slice());
        assert!(spectrum.bins()[original.len()..].iter().all(|b| b.norm() == 0.0));

        let padded = EvenSamples::from_spectrum(&spectrum);
        assert_eq!(padded.len(), 64);
        assert!((padded.dt() - 0.1 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_signal() {
        let even = EvenSamples::new(Vec::new(), 1.0, 0.0);
        let spectrum = Spectrum::from_even(&even);
        assert_eq!(spectrum.nt(), 0);
        assert_eq!(spectrum.nf(), 1);
        assert!(EvenSamples::from_spectrum(&spectrum).is_empty());
    }
}
