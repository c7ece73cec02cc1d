//! Real-valued FFT backend with per-thread plan caching.
//!
//! This module wraps `realfft` with:
//! - One planner and plan map per thread, so executing a cached plan never
//!   takes a lock
//! - Plan construction serialized process-wide
//! - An optional persisted "wisdom" file listing the lengths planned by
//!   previous runs, so they can be planned up front
//!
//! Conventions: the forward transform is unnormalized and returns the
//! `N/2 + 1` non-negative frequency bins of an `N`-sample real signal; the
//! inverse transform divides by `N`, so `inverse(N, &forward(x)) == x`.

use crate::cache::RecoverMutex;
use crate::error::{DspError, DspResult};
use num_complex::Complex64;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Serializes plan construction across threads.
static PLANNER_LOCK: Mutex<()> = Mutex::new(());

/// Every length planned by any thread of this process.
static PLANNED_LENGTHS: Mutex<BTreeSet<usize>> = Mutex::new(BTreeSet::new());

/// Lengths read from the wisdom file.
static WISDOM_LENGTHS: Mutex<BTreeSet<usize>> = Mutex::new(BTreeSet::new());

thread_local! {
    static PLANS: RefCell<PlanCache> = RefCell::new(PlanCache::new());
    static STATS: Cell<TransformStats> = Cell::new(TransformStats::default());
}

/// Forward and inverse plans for one length.
#[derive(Clone)]
struct Plan {
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
}

struct PlanCache {
    planner: RealFftPlanner<f64>,
    plans: HashMap<usize, Plan>,
}

impl PlanCache {
    fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
            plans: HashMap::new(),
        }
    }

    fn get_or_plan(&mut self, len: usize) -> Plan {
        if let Some(plan) = self.plans.get(&len) {
            return plan.clone();
        }

        let plan = {
            let _guard = PLANNER_LOCK.lock_recover();
            Plan {
                forward: self.planner.plan_fft_forward(len),
                inverse: self.planner.plan_fft_inverse(len),
            }
        };

        PLANNED_LENGTHS.lock_recover().insert(len);
        update_stats(|s| s.plans += 1);
        tracing::debug!(len, "Built transform plan");

        self.plans.insert(len, plan.clone());
        plan
    }
}

fn plan_for(len: usize) -> Plan {
    PLANS.with(|cache| cache.borrow_mut().get_or_plan(len))
}

/// Per-thread transform counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Forward transforms executed.
    pub forward: usize,
    /// Inverse transforms executed.
    pub inverse: usize,
    /// Plans built.
    pub plans: usize,
}

fn update_stats(f: impl FnOnce(&mut TransformStats)) {
    STATS.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

/// Counters for transforms executed on the calling thread.
pub fn stats() -> TransformStats {
    STATS.with(Cell::get)
}

/// Reset the calling thread's counters.
pub fn reset_stats() {
    STATS.with(|cell| cell.set(TransformStats::default()));
}

/// Number of frequency bins for a time-domain length.
#[inline]
pub fn bins_for(len: usize) -> usize {
    len / 2 + 1
}

/// Perform forward real-to-complex FFT.
///
/// Input: N real samples
/// Output: N/2 + 1 complex samples (Hermitian symmetry exploited)
pub fn try_forward(input: &[f64]) -> DspResult<Vec<Complex64>> {
    let len = input.len();
    if len == 0 {
        return Err(DspError::InvalidFftSize(len));
    }

    let plan = plan_for(len);
    let mut scratch = input.to_vec();
    let mut output = plan.forward.make_output_vec();

    plan.forward
        .process(&mut scratch, &mut output)
        .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

    update_stats(|s| s.forward += 1);
    Ok(output)
}

/// Perform inverse complex-to-real FFT, normalized by `1/len`.
///
/// Input: len/2 + 1 complex samples
/// Output: len real samples
///
/// The imaginary part of the DC bin (and of the Nyquist bin when `len` is
/// even) cannot be represented by a real signal and is ignored.
pub fn try_inverse(len: usize, spectrum: &[Complex64]) -> DspResult<Vec<f64>> {
    if len == 0 {
        return Err(DspError::InvalidFftSize(len));
    }

    let expected = bins_for(len);
    if spectrum.len() != expected {
        return Err(DspError::LengthMismatch {
            expected,
            actual: spectrum.len(),
        });
    }

    let plan = plan_for(len);
    let mut input = spectrum.to_vec();
    input[0].im = 0.0;
    if len % 2 == 0 {
        input[len / 2].im = 0.0;
    }
    let mut output = plan.inverse.make_output_vec();

    plan.inverse
        .process(&mut input, &mut output)
        .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

    // Normalize
    let scale = 1.0 / len as f64;
    for x in output.iter_mut() {
        *x *= scale;
    }

    update_stats(|s| s.inverse += 1);
    Ok(output)
}

/// Forward transform of a non-empty signal.
///
/// # Panics
///
/// Panics if `input` is empty or the transform fails; there is no partial
/// result to return. Use [`try_forward`] to handle these as errors.
pub fn forward(input: &[f64]) -> Vec<Complex64> {
    try_forward(input).unwrap_or_else(|e| panic!("forward transform failed: {}", e))
}

/// Inverse transform to `len` samples.
///
/// # Panics
///
/// Panics if `len` is zero or `spectrum.len() != len / 2 + 1`. Use
/// [`try_inverse`] to handle these as errors.
pub fn inverse(len: usize, spectrum: &[Complex64]) -> Vec<f64> {
    try_inverse(len, spectrum).unwrap_or_else(|e| panic!("inverse transform failed: {}", e))
}

/// Compute the power spectrum (magnitude squared) of a signal.
pub fn power_spectrum(signal: &[f64]) -> DspResult<Vec<f64>> {
    let spectrum = try_forward(signal)?;
    Ok(spectrum.iter().map(|c| c.norm_sqr()).collect())
}

/// Compute the magnitude spectrum of a signal.
pub fn magnitude_spectrum(signal: &[f64]) -> DspResult<Vec<f64>> {
    let spectrum = try_forward(signal)?;
    Ok(spectrum.iter().map(|c| c.norm()).collect())
}

/// Compute the phase spectrum of a signal (in radians).
pub fn phase_spectrum(signal: &[f64]) -> DspResult<Vec<f64>> {
    let spectrum = try_forward(signal)?;
    Ok(spectrum.iter().map(|c| c.arg()).collect())
}

/// On-disk format of the wisdom file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WisdomFile {
    lengths: Vec<usize>,
}

/// Saves wisdom to its file when dropped.
///
/// Hold this for the lifetime of the process (e.g. in `main`).
#[must_use = "wisdom is saved when the guard is dropped"]
#[derive(Debug)]
pub struct WisdomGuard {
    path: PathBuf,
}

impl WisdomGuard {
    /// File the wisdom will be written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WisdomGuard {
    fn drop(&mut self) {
        if let Err(e) = save_wisdom(&self.path) {
            tracing::debug!(path = ?self.path, error = %e, "Could not save transform wisdom");
        }
    }
}

fn read_wisdom(path: &Path) -> DspResult<WisdomFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load transform wisdom from `path`.
///
/// A missing or unreadable file is not an error: planning simply starts
/// from scratch. The returned guard writes the wisdom back on drop.
pub fn load_wisdom(path: impl AsRef<Path>) -> WisdomGuard {
    let path = path.as_ref().to_path_buf();

    match read_wisdom(&path) {
        Ok(wisdom) => {
            tracing::debug!(path = ?path, count = wisdom.lengths.len(), "Loaded transform wisdom");
            WISDOM_LENGTHS.lock_recover().extend(wisdom.lengths);
        }
        Err(e) => {
            tracing::debug!(path = ?path, error = %e, "No usable transform wisdom");
        }
    }

    WisdomGuard { path }
}

/// Lengths known from wisdom.
pub fn wisdom_lengths() -> Vec<usize> {
    WISDOM_LENGTHS.lock_recover().iter().copied().collect()
}

/// Plan every length known from wisdom on the calling thread.
///
/// Returns the number of lengths planned.
pub fn warm_up() -> usize {
    let lengths = wisdom_lengths();
    for &len in &lengths {
        plan_for(len);
    }
    lengths.len()
}

/// Write every length known to this process to `path`.
pub fn save_wisdom(path: impl AsRef<Path>) -> DspResult<()> {
    let mut lengths: BTreeSet<usize> = WISDOM_LENGTHS.lock_recover().clone();
    lengths.extend(PLANNED_LENGTHS.lock_recover().iter().copied());

    let wisdom = WisdomFile {
        lengths: lengths.into_iter().collect(),
    };
    std::fs::write(path.as_ref(), serde_json::to_string_pretty(&wisdom)?)?;
    tracing::debug!(path = ?path.as_ref(), count = wisdom.lengths.len(), "Saved transform wisdom");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(n: usize, cycles: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * cycles * i as f64 / n as f64).sin())
            .collect()
    }

    #[test]
    fn test_rfft_irfft_roundtrip() {
        for &n in &[64usize, 100, 127] {
            let signal: Vec<f64> = tone(n, 4.0)
                .iter()
                .enumerate()
                .map(|(i, v)| v + 0.1 * (i % 7) as f64)
                .collect();

            let spectrum = forward(&signal);
            assert_eq!(spectrum.len(), n / 2 + 1);

            let recovered = inverse(n, &spectrum);
            for (orig, rec) in signal.iter().zip(recovered.iter()) {
                assert!((orig - rec).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_tone_lands_in_its_bin() {
        let n = 128;
        let mags = magnitude_spectrum(&tone(n, 8.0)).unwrap();
        let peak = mags
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(peak, 8);
        assert!((mags[8] - n as f64 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(try_forward(&[]), Err(DspError::InvalidFftSize(0))));
        assert!(matches!(try_inverse(0, &[]), Err(DspError::InvalidFftSize(0))));

        let bins = vec![Complex64::new(1.0, 0.0); 4];
        assert!(matches!(
            try_inverse(16, &bins),
            Err(DspError::LengthMismatch { expected: 9, actual: 4 })
        ));
    }

    #[test]
    #[should_panic(expected = "inverse transform failed")]
    fn test_inverse_contract_violation_panics() {
        inverse(8, &[Complex64::new(0.0, 0.0); 3]);
    }

    #[test]
    fn test_dc_imaginary_part_ignored() {
        let n = 8;
        let mut bins = vec![Complex64::new(0.0, 0.0); n / 2 + 1];
        bins[0] = Complex64::new(8.0, 3.0);
        bins[n / 2] = Complex64::new(0.0, -2.0);

        let y = inverse(n, &bins);
        for v in y {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stats_and_plan_reuse() {
        reset_stats();
        let signal = tone(96, 3.0);

        let spectrum = forward(&signal);
        let _ = forward(&signal);
        let _ = inverse(96, &spectrum);

        let stats = stats();
        assert_eq!(stats.forward, 2);
        assert_eq!(stats.inverse, 1);
        assert!(stats.plans <= 1);

        // Counters are per thread.
        let other = std::thread::spawn(|| {
            let _ = forward(&[1.0, 2.0, 3.0]);
            super::stats()
        })
        .join()
        .unwrap();
        assert_eq!(other.forward, 1);
        assert_eq!(other.plans, 1);
    }

    #[test]
    fn test_wisdom_roundtrip() {
        let path = std::env::temp_dir().join(format!("sigview-wisdom-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        // Missing file degrades to an empty database.
        let guard = load_wisdom(&path);
        let _ = forward(&vec![0.5; 77]);
        drop(guard);

        let saved = read_wisdom(&path).unwrap();
        assert!(saved.lengths.contains(&77));

        let _guard = load_wisdom(&path);
        assert!(wisdom_lengths().contains(&77));
        assert!(warm_up() >= 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_wisdom_is_ignored() {
        let path = std::env::temp_dir()
            .join(format!("sigview-bad-wisdom-{}.json", std::process::id()));
        std::fs::write(&path, "not json").unwrap();

        let guard = load_wisdom(&path);
        assert_eq!(guard.path(), path.as_path());
        drop(guard);

        let _ = std::fs::remove_file(&path);
    }
}
