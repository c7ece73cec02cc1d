//! Result output formatting and writing.

use crate::OutputFormat;
use anyhow::Result;
use lib_dsp::ops::{self, Impulsivity};
use lib_dsp::{EvenSamples, SampledSignal, Signal, Spectrum};
use serde::Serialize;
use std::io::Write;

/// Summary quantities of a signal.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub samples: usize,
    pub dt: f64,
    pub t0: f64,
    pub duration: f64,
    pub peak: f64,
    pub peak_time: f64,
    pub rms: f64,
    pub mean: f64,
    pub dominant_frequency: f64,
    pub impulsivity: f64,
}

impl Summary {
    pub fn of(signal: &Signal) -> Self {
        let even = signal.even();
        let spectrum = signal.spectrum();
        let peak = even.peak_abs(..);

        // Skip DC when looking for the dominant tone.
        let dominant = spectrum
            .mags(false)
            .iter()
            .enumerate()
            .skip(1)
            .fold((0, 0.0), |best, (i, &m)| if m > best.1 { (i, m) } else { best })
            .0;

        let Impulsivity { measure, .. } = ops::impulsivity(signal, None, true);

        Self {
            samples: even.len(),
            dt: even.dt(),
            t0: even.t0(),
            duration: even.duration(),
            peak: peak.map_or(0.0, |p| even[p.index]),
            peak_time: peak.map_or(even.t0(), |p| even.t_at(p.index)),
            rms: even.rms(..),
            mean: even.mean(..),
            dominant_frequency: spectrum.f(dominant),
            impulsivity: measure,
        }
    }
}

/// Write a summary.
pub fn write_summary(out: &mut dyn Write, summary: &Summary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Signal Summary")?;
            writeln!(out, "==============")?;
            writeln!(out, "Samples:            {}", summary.samples)?;
            writeln!(out, "dt:                 {:.6e}", summary.dt)?;
            writeln!(out, "t0:                 {:.6e}", summary.t0)?;
            writeln!(out, "Duration:           {:.6e}", summary.duration)?;
            writeln!(out, "Peak:               {:.6} at {:.6e}", summary.peak, summary.peak_time)?;
            writeln!(out, "RMS:                {:.6}", summary.rms)?;
            writeln!(out, "Mean:               {:.6}", summary.mean)?;
            writeln!(out, "Dominant frequency: {:.6e}", summary.dominant_frequency)?;
            writeln!(out, "Impulsivity:        {:.4}", summary.impulsivity)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "metric,value")?;
            writeln!(out, "samples,{}", summary.samples)?;
            writeln!(out, "dt,{}", summary.dt)?;
            writeln!(out, "t0,{}", summary.t0)?;
            writeln!(out, "duration,{}", summary.duration)?;
            writeln!(out, "peak,{}", summary.peak)?;
            writeln!(out, "peak_time,{}", summary.peak_time)?;
            writeln!(out, "rms,{}", summary.rms)?;
            writeln!(out, "mean,{}", summary.mean)?;
            writeln!(out, "dominant_frequency,{}", summary.dominant_frequency)?;
            writeln!(out, "impulsivity,{}", summary.impulsivity)?;
        }
    }
    Ok(())
}

/// Write samples and their envelope as `time,value,envelope` rows.
pub fn write_envelope(
    out: &mut dyn Write,
    even: &EvenSamples,
    envelope: &EvenSamples,
) -> Result<()> {
    writeln!(out, "time,value,envelope")?;
    for ((t, v), e) in even.times().iter().zip(even.y()).zip(envelope.y()) {
        writeln!(out, "{},{},{}", t, v, e)?;
    }
    Ok(())
}

/// Write a spectrum as `frequency,magnitude,phase,group_delay` rows.
pub fn write_spectrum(out: &mut dyn Write, spectrum: &Spectrum, db: bool) -> Result<()> {
    writeln!(out, "frequency,magnitude,phase,group_delay")?;
    let delays = spectrum.group_delays();
    let phases = spectrum.unwrapped_phases();
    for i in 0..spectrum.nf() {
        writeln!(
            out,
            "{},{},{},{}",
            spectrum.f(i),
            spectrum.mag(i, db),
            phases[i],
            delays[i]
        )?;
    }
    Ok(())
}

/// Write a sampled signal as `time,value` rows.
pub fn write_samples(out: &mut dyn Write, even: &EvenSamples) -> Result<()> {
    writeln!(out, "time,value")?;
    for (t, v) in even.times().iter().zip(even.y()) {
        writeln!(out, "{},{}", t, v)?;
    }
    Ok(())
}
