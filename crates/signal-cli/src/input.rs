//! Reading sample files.
//!
//! One sample per line, `#` starts a comment. A line holds either a single
//! value (evenly sampled, spacing from the configuration) or a time and a
//! value separated by whitespace or a comma.

use anyhow::{bail, Context, Result};
use lib_dsp::time::UnevenSamples;
use lib_dsp::Signal;
use lib_types::interpolation::SignalConfig;
use std::path::Path;

/// Parsed sample file.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    /// Values only.
    Values(Vec<f64>),
    /// Time and value pairs.
    Timed { t: Vec<f64>, y: Vec<f64> },
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(y) => y.len(),
            Self::Timed { y, .. } => y.len(),
        }
    }
}

/// Parse sample file content.
pub fn parse_samples(content: &str) -> Result<Samples> {
    let mut columns = None;
    let mut t = Vec::new();
    let mut y = Vec::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .map(|f| {
                f.parse::<f64>()
                    .with_context(|| format!("line {}: invalid number {:?}", lineno + 1, f))
            })
            .collect::<Result<Vec<f64>>>()?;

        let expected = *columns.get_or_insert(fields.len());
        if fields.len() != expected {
            bail!("line {}: expected {} columns, found {}", lineno + 1, expected, fields.len());
        }

        match fields.as_slice() {
            [value] => y.push(*value),
            [time, value] => {
                t.push(*time);
                y.push(*value);
            }
            _ => bail!("line {}: expected 1 or 2 columns, found {}", lineno + 1, fields.len()),
        }
    }

    Ok(if columns == Some(2) {
        Samples::Timed { t, y }
    } else {
        Samples::Values(y)
    })
}

/// Build a signal from parsed samples.
///
/// Values-only input needs `dt`. Timed input keeps its times, with `dt`
/// recorded as the nominal spacing.
pub fn build_signal(samples: Samples, dt: Option<f64>, config: SignalConfig) -> Result<Signal> {
    let signal = match samples {
        Samples::Values(y) => {
            let Some(dt) = dt else {
                bail!("single-column input needs a sample spacing (--dt or nominal_dt)");
            };
            Signal::from_samples(y, dt, 0.0)
        }
        Samples::Timed { t, y } => {
            let uneven = UnevenSamples::try_new(t, y)?.with_nominal_dt(dt.unwrap_or(0.0));
            Signal::from_uneven(uneven)
        }
    };
    Ok(signal.with_config(config))
}

/// Read a sample file into a signal.
pub fn read_signal(path: &Path, dt: Option<f64>, config: SignalConfig) -> Result<Signal> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample file: {:?}", path))?;
    let samples = parse_samples(&content)
        .with_context(|| format!("Failed to parse sample file: {:?}", path))?;
    tracing::info!("Read {} samples from {:?}", samples.len(), path);
    build_signal(samples, dt, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_dsp::SampledSignal;

    #[test]
    fn test_parse_two_columns() {
        let samples = parse_samples("# t, y\n0.0, 1.0\n0.5 2.0\n\n1.5,\t-1.0 # last\n").unwrap();
        assert_eq!(
            samples,
            Samples::Timed {
                t: vec![0.0, 0.5, 1.5],
                y: vec![1.0, 2.0, -1.0],
            }
        );
    }

    #[test]
    fn test_parse_single_column() {
        let samples = parse_samples("1\n2\n3\n").unwrap();
        assert_eq!(samples, Samples::Values(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_samples("1, 2\n3\n").is_err());
        assert!(parse_samples("1, x\n").is_err());
        assert!(parse_samples("1 2 3\n").is_err());
    }

    #[test]
    fn test_build_signal() {
        assert!(build_signal(Samples::Values(vec![1.0]), None, SignalConfig::default()).is_err());

        let signal =
            build_signal(Samples::Values(vec![1.0, 2.0]), Some(0.5), SignalConfig::default())
                .unwrap();
        assert_eq!(signal.even().dt(), 0.5);

        let timed = Samples::Timed {
            t: vec![0.0, 1.0, 3.0],
            y: vec![0.0, 1.0, 3.0],
        };
        let signal = build_signal(timed, Some(1.0), SignalConfig::default()).unwrap();
        assert_eq!(signal.even().len(), 4);
        assert_eq!(signal.even()[2], 2.0);

        let unsorted = Samples::Timed {
            t: vec![1.0, 0.0],
            y: vec![0.0, 0.0],
        };
        assert!(build_signal(unsorted, None, SignalConfig::default()).is_err());
    }
}
