//! A signal with three interchangeable representations.
//!
//! [`Signal`] keeps uneven samples, even samples and a spectrum in lazily
//! filled slots. The representation written last is authoritative; the
//! others are derived from it on first read and dropped again by the next
//! `update_*` call. Derived Hilbert transform and envelope caches follow the
//! same rule.
//!
//! Derivation routes:
//! - even: from uneven (resampling) if fresh, else inverse transform
//! - uneven: explicit times from even
//! - spectrum: forward transform of even
//!
//! Reads take `&self` and may run concurrently; the first reader of a stale
//! slot computes it while later readers wait on that slot only.

use crate::cache::LazyCache;
use crate::ops;
use crate::spectrum::Spectrum;
use crate::time::{EvenSamples, SampledSignal, UnevenSamples};
use lib_types::interpolation::{InterpolationKind, SignalConfig};
use tracing::trace;

/// Which cached slots of a [`Signal`] currently hold a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Freshness {
    pub uneven: bool,
    pub even: bool,
    pub spectrum: bool,
    pub hilbert: bool,
    pub envelope: bool,
}

/// Signal with lazily derived time and frequency representations.
#[derive(Clone, Debug)]
pub struct Signal {
    interpolation: InterpolationKind,
    uneven: LazyCache<UnevenSamples>,
    even: LazyCache<EvenSamples>,
    spectrum: LazyCache<Spectrum>,
    hilbert: LazyCache<Box<Signal>>,
    envelope: LazyCache<EvenSamples>,
}

fn fresh_mut<'a, T>(slot: &'a mut LazyCache<T>, name: &str) -> &'a mut T {
    match slot.get_mut() {
        Some(value) => value,
        None => panic!("{} representation was not prepared", name),
    }
}

impl Signal {
    fn empty(interpolation: InterpolationKind) -> Self {
        Self {
            interpolation,
            uneven: LazyCache::new(),
            even: LazyCache::new(),
            spectrum: LazyCache::new(),
            hilbert: LazyCache::new(),
            envelope: LazyCache::new(),
        }
    }

    /// Signal whose authoritative representation is `even`.
    pub fn from_even(even: EvenSamples) -> Self {
        let mut signal = Self::empty(even.interpolator().kind());
        signal.even.set(even);
        signal
    }

    /// Signal whose authoritative representation is `uneven`.
    pub fn from_uneven(uneven: UnevenSamples) -> Self {
        let mut signal = Self::empty(uneven.interpolator().kind());
        signal.uneven.set(uneven);
        signal
    }

    /// Signal whose authoritative representation is `spectrum`.
    pub fn from_spectrum(spectrum: Spectrum) -> Self {
        let mut signal = Self::empty(InterpolationKind::default());
        signal.spectrum.set(spectrum);
        signal
    }

    /// Signal from a regularly sampled buffer.
    pub fn from_samples(y: impl Into<Vec<f64>>, dt: f64, t0: f64) -> Self {
        Self::from_even(EvenSamples::new(y.into(), dt, t0))
    }

    /// Signal from explicit sample times.
    pub fn from_times(t: impl Into<Vec<f64>>, y: impl Into<Vec<f64>>) -> Self {
        Self::from_uneven(UnevenSamples::new(t.into(), y.into()))
    }

    /// Apply a configuration. Meant to be used right after construction.
    pub fn with_config(self, config: SignalConfig) -> Self {
        self.with_interpolation(config.interpolation)
    }

    /// Use `kind` for the current and every derived time representation.
    pub fn with_interpolation(mut self, kind: InterpolationKind) -> Self {
        self.interpolation = kind;
        if let Some(uneven) = self.uneven.get_mut() {
            uneven.set_interpolation(kind);
        }
        if let Some(even) = self.even.get_mut() {
            even.set_interpolation(kind);
        }
        self
    }

    /// Interpolation strategy handed to derived representations.
    pub fn interpolation(&self) -> InterpolationKind {
        self.interpolation
    }

    /// Which slots currently hold a value.
    pub fn freshness(&self) -> Freshness {
        Freshness {
            uneven: self.uneven.is_fresh(),
            even: self.even.is_fresh(),
            spectrum: self.spectrum.is_fresh(),
            hilbert: self.hilbert.is_fresh(),
            envelope: self.envelope.is_fresh(),
        }
    }

    fn derive_even(&self) -> EvenSamples {
        if let Some(uneven) = self.uneven.get() {
            trace!(samples = uneven.len(), "uneven -> even");
            uneven.to_even(None)
        } else if let Some(spectrum) = self.spectrum.get() {
            trace!(nt = spectrum.nt(), "spectrum -> even");
            EvenSamples::from_spectrum(spectrum).with_interpolation(self.interpolation)
        } else {
            panic!("signal has no fresh representation to derive from");
        }
    }

    fn derive_uneven(&self) -> UnevenSamples {
        let even = self.even();
        trace!(samples = even.len(), "even -> uneven");
        UnevenSamples::from_even(even)
    }

    fn derive_spectrum(&self) -> Spectrum {
        let even = self.even();
        trace!(samples = even.len(), "even -> spectrum");
        Spectrum::from_even(even)
    }

    /// Evenly sampled representation.
    pub fn even(&self) -> &EvenSamples {
        self.even.get_or_compute(|| self.derive_even())
    }

    /// Representation with explicit sample times.
    pub fn uneven(&self) -> &UnevenSamples {
        self.uneven.get_or_compute(|| self.derive_uneven())
    }

    /// Frequency representation.
    pub fn spectrum(&self) -> &Spectrum {
        self.spectrum.get_or_compute(|| self.derive_spectrum())
    }

    fn invalidate_derived(&mut self) {
        self.hilbert.invalidate();
        self.envelope.invalidate();
    }

    /// Mutable even samples; every other representation becomes stale.
    pub fn update_even(&mut self) -> &mut EvenSamples {
        if !self.even.is_fresh() {
            let even = self.derive_even();
            self.even.set(even);
        }
        self.uneven.invalidate();
        self.spectrum.invalidate();
        self.invalidate_derived();
        fresh_mut(&mut self.even, "even")
    }

    /// Mutable uneven samples; every other representation becomes stale.
    pub fn update_uneven(&mut self) -> &mut UnevenSamples {
        if !self.uneven.is_fresh() {
            let uneven = self.derive_uneven();
            self.uneven.set(uneven);
        }
        self.even.invalidate();
        self.spectrum.invalidate();
        self.invalidate_derived();
        fresh_mut(&mut self.uneven, "uneven")
    }

    /// Mutable spectrum; every other representation becomes stale.
    pub fn update_spectrum(&mut self) -> &mut Spectrum {
        if !self.spectrum.is_fresh() {
            let spectrum = self.derive_spectrum();
            self.spectrum.set(spectrum);
        }
        self.uneven.invalidate();
        self.even.invalidate();
        self.invalidate_derived();
        fresh_mut(&mut self.spectrum, "spectrum")
    }

    /// Hilbert transform: every bin rotated by 90°.
    pub fn hilbert(&self) -> &Signal {
        self.hilbert.get_or_compute(|| {
            trace!("spectrum -> hilbert");
            let rotated = ops::hilbert_spectrum(self.spectrum());
            Box::new(Signal::from_spectrum(rotated).with_interpolation(self.interpolation))
        })
    }

    /// Envelope `sqrt(x² + H(x)²)` on the even grid.
    pub fn envelope(&self) -> &EvenSamples {
        self.envelope.get_or_compute(|| {
            let even = self.even();
            let hilbert = self.hilbert().even();
            trace!(samples = even.len(), "hilbert -> envelope");
            let values = even
                .y()
                .iter()
                .zip(hilbert.y())
                .map(|(x, h)| (x * x + h * h).sqrt())
                .collect();
            EvenSamples::new(values, even.dt(), even.t0()).with_interpolation(self.interpolation)
        })
    }
}

impl From<EvenSamples> for Signal {
    fn from(even: EvenSamples) -> Self {
        Self::from_even(even)
    }
}

impl From<UnevenSamples> for Signal {
    fn from(uneven: UnevenSamples) -> Self {
        Self::from_uneven(uneven)
    }
}

impl From<Spectrum> for Signal {
    fn from(spectrum: Spectrum) -> Self {
        Self::from_spectrum(spectrum)
    }
}
