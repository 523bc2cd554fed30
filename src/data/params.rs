use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::package::error::{PackageError, PackageResult};

// ---------------------------------------------------------------------------
// ParameterSet – XCMS processing parameters
// ---------------------------------------------------------------------------

/// XCMS centWave / grouping parameters plus the label of the preset they
/// were seeded from.
///
/// A preset is itself a `ParameterSet` whose `preset` is its own name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(rename = "name")]
    pub preset: String,
    /// Maximum m/z deviation in consecutive scans (parts per million).
    pub ppm: i64,
    /// Chromatographic peak width range, free text `"min,max"` in seconds.
    pub peakwidth: String,
    /// Signal-to-noise threshold.
    pub snthresh: i64,
    /// Retention-time bandwidth used for grouping.
    pub bw: i64,
    /// Width of overlapping m/z slices used for grouping.
    pub mzwid: f64,
    /// Minimum fraction of samples in a class a feature must appear in.
    pub minfrac: f64,
}

impl ParameterSet {
    /// The three presets shipped with the packager. The first is the default.
    pub fn builtin_presets() -> Vec<ParameterSet> {
        vec![
            ParameterSet {
                preset: "UHPLC-Orbitrap (default)".to_string(),
                ppm: 3,
                peakwidth: "5,20".to_string(),
                snthresh: 10,
                bw: 5,
                mzwid: 0.015,
                minfrac: 0.5,
            },
            ParameterSet {
                preset: "HILIC-QTOF (default)".to_string(),
                ppm: 15,
                peakwidth: "10,60".to_string(),
                snthresh: 8,
                bw: 10,
                mzwid: 0.025,
                minfrac: 0.5,
            },
            ParameterSet {
                preset: "Generic LC-MS".to_string(),
                ppm: 25,
                peakwidth: "5,40".to_string(),
                snthresh: 6,
                bw: 5,
                mzwid: 0.02,
                minfrac: 0.3,
            },
        ]
    }

    /// Copy every field from `preset`, discarding any overrides.
    pub fn reset_to(&mut self, preset: &ParameterSet) {
        *self = preset.clone();
    }

    /// Parse `peakwidth` into `(min, max)`.
    pub fn peakwidth_range(&self) -> PackageResult<(f64, f64)> {
        let invalid = |reason: &str| PackageError::invalid_parameter("peakwidth", reason);

        let mut parts = self.peakwidth.split(',');
        let (Some(min), Some(max), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected two values as \"min,max\""));
        };
        let min: f64 = min
            .trim()
            .parse()
            .map_err(|_| invalid(&format!("'{}' is not a number", min.trim())))?;
        let max: f64 = max
            .trim()
            .parse()
            .map_err(|_| invalid(&format!("'{}' is not a number", max.trim())))?;

        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(invalid("values must be finite and not negative"));
        }
        if min > max {
            return Err(invalid(&format!("min {min} is greater than max {max}")));
        }
        Ok((min, max))
    }

    /// Form-level sanity checks. Instrument-specific ranges are not checked.
    pub fn validate(&self) -> PackageResult<()> {
        self.peakwidth_range()?;

        for (field, value) in [("ppm", self.ppm), ("snthresh", self.snthresh), ("bw", self.bw)] {
            if value < 0 {
                return Err(PackageError::invalid_parameter(field, "must not be negative"));
            }
        }
        if !self.mzwid.is_finite() || self.mzwid < 0.0 {
            return Err(PackageError::invalid_parameter(
                "mzwid",
                "must be a finite, non-negative number",
            ));
        }
        if !self.minfrac.is_finite() || !(0.0..=1.0).contains(&self.minfrac) {
            return Err(PackageError::invalid_parameter(
                "minfrac",
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// Plain-text summary written to `xcms_parameters.txt`.
    pub fn to_summary(&self) -> String {
        let mut text = String::from("XCMS Parameters:\n");
        // Writing to a String cannot fail.
        let _ = writeln!(text, "Preset: {}", self.preset);
        let _ = writeln!(text, "ppm: {}", self.ppm);
        let _ = writeln!(text, "peakwidth: {}", self.peakwidth);
        let _ = writeln!(text, "snthresh: {}", self.snthresh);
        let _ = writeln!(text, "bw: {}", self.bw);
        let _ = writeln!(text, "mzwid: {}", FloatText(self.mzwid));
        let _ = writeln!(text, "minfrac: {}", FloatText(self.minfrac));
        text
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        // builtin_presets() is never empty.
        Self::builtin_presets().swap_remove(0)
    }
}

/// Float display in shortest round-trip form, keeping one decimal for whole
/// numbers (`1.0`, not `1`) so float fields stay recognisable as floats.
/// Magnitudes below `1e-4` or from `1e16` up use exponent form with a signed,
/// two-digit exponent (`1e-07`, `1.5e+16`).
struct FloatText(f64);

impl fmt::Display for FloatText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        if self.0.is_finite() && self.0 != 0.0 && !(1e-4..1e16).contains(&magnitude) {
            let sci = format!("{:e}", self.0);
            let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            return write!(f, "{mantissa}e{sign}{:02}", exponent.abs());
        }
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
