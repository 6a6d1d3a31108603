//! Tone curves
//!
//! A tone curve remaps a sample intensity to the threshold the glyph at that
//! sample position is compared against. Curves are plain values: pick one,
//! pass it to [`crate::Asciifier`], and the threshold table is derived from it.
//!
//! Every curve also has a compact text form used by the CLI and config files:
//!
//! | text                  | curve                                  |
//! |-----------------------|----------------------------------------|
//! | `identity`            | `x`                                    |
//! | `shift:-20`           | `x + delta`                            |
//! | `contrast-low`        | `-100000 / (x/2 + 165) + 600`          |
//! | `contrast-medium`     | `-75000 / (2x/3 + 150) + 500`          |
//! | `contrast-high`       | `-50000 / (x + 130) + 384`             |
//! | `linear:a,b`          | `a*x + b`                              |
//! | `poly:c0,c1,...`      | `c0 + c1*x + c2*x^2 + ...`             |
//! | `homographic:a,b,c,d` | `(a*x + b) / (c*x + d)`                |
//! | `binary:t`            | `0` below `t`, `255` from `t` upwards  |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsciiError;

/// Intensity remapping function used to build a threshold table.
///
/// Evaluation is always `f64` and never clamps, so curves such as
/// [`ToneCurve::Shift`] may return values outside `0..=255`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ToneCurve {
    /// `f(x) = x`
    #[default]
    Identity,
    /// `f(x) = x + delta`
    Shift(f64),
    /// Mild reciprocal contrast curve.
    ContrastLow,
    /// Medium reciprocal contrast curve.
    ContrastMedium,
    /// Steep reciprocal contrast curve.
    ContrastHigh,
    /// `f(x) = a*x + b`
    Linear { a: f64, b: f64 },
    /// `f(x) = sum(coeffs[i] * x^i)`, lowest degree first.
    Polynomial(Vec<f64>),
    /// `f(x) = (a*x + b) / (c*x + d)`
    ///
    /// Where `c*x + d == 0` the result is infinite (or NaN when the numerator
    /// is zero too). Threshold tables reject such samples.
    Homographic { a: f64, b: f64, c: f64, d: f64 },
    /// `f(x) = 0` for `x < threshold`, `255` otherwise.
    Binary(f64),
}

impl ToneCurve {
    /// Evaluate the curve at `x`.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ToneCurve::Identity => x,
            ToneCurve::Shift(delta) => x + delta,
            ToneCurve::ContrastLow => -100_000.0 / (0.5 * x + 165.0) + 600.0,
            ToneCurve::ContrastMedium => -75_000.0 / (2.0 / 3.0 * x + 150.0) + 500.0,
            ToneCurve::ContrastHigh => -50_000.0 / (x + 130.0) + 384.0,
            ToneCurve::Linear { a, b } => a * x + b,
            // Horner's scheme, highest degree first
            ToneCurve::Polynomial(coeffs) => coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c),
            ToneCurve::Homographic { a, b, c, d } => (a * x + b) / (c * x + d),
            ToneCurve::Binary(threshold) => {
                if x < *threshold {
                    0.0
                } else {
                    255.0
                }
            }
        }
    }

    /// Returns true if the curve is non-decreasing over `samples`, taken in order.
    ///
    /// Only monotonic curves keep darker glyphs on darker pixels; a
    /// non-monotonic curve changes which table entry matches first.
    pub fn is_monotonic_over(&self, samples: &[f64]) -> bool {
        samples
            .windows(2)
            .all(|pair| self.apply(pair[0]) <= self.apply(pair[1]))
    }

    /// The named curves that make sense without extra tuning.
    pub fn presets() -> Vec<ToneCurve> {
        vec![
            ToneCurve::Identity,
            ToneCurve::Shift(-20.0),
            ToneCurve::ContrastLow,
            ToneCurve::ContrastMedium,
            ToneCurve::ContrastHigh,
            ToneCurve::Binary(127.0),
        ]
    }
}

fn parse_params(name: &str, params: Option<&str>, expected: Option<usize>) -> Result<Vec<f64>, AsciiError> {
    let raw = params.unwrap_or("").trim();
    let values = if raw.is_empty() {
        Vec::new()
    } else {
        raw.split(',')
            .map(|p| {
                p.trim().parse::<f64>().map_err(|_| {
                    AsciiError::Config(format!("curve '{name}': '{}' is not a number", p.trim()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    match expected {
        Some(n) if values.len() != n => Err(AsciiError::Config(format!(
            "curve '{name}' takes {n} parameter(s), got {}",
            values.len()
        ))),
        None if values.is_empty() => Err(AsciiError::Config(format!(
            "curve '{name}' needs at least one coefficient"
        ))),
        _ => Ok(values),
    }
}

impl FromStr for ToneCurve {
    type Err = AsciiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, params) = match s.split_once(':') {
            Some((name, params)) => (name.trim(), Some(params)),
            None => (s, None),
        };
        let name = name.to_ascii_lowercase().replace('_', "-");

        let curve = match name.as_str() {
            "identity" | "default" => {
                parse_params(&name, params, Some(0))?;
                ToneCurve::Identity
            }
            "shift" => ToneCurve::Shift(parse_params(&name, params, Some(1))?[0]),
            "contrast-low" | "contrast-l" => {
                parse_params(&name, params, Some(0))?;
                ToneCurve::ContrastLow
            }
            "contrast-medium" | "contrast-m" => {
                parse_params(&name, params, Some(0))?;
                ToneCurve::ContrastMedium
            }
            "contrast-high" | "contrast-h" => {
                parse_params(&name, params, Some(0))?;
                ToneCurve::ContrastHigh
            }
            "linear" => {
                let p = parse_params(&name, params, Some(2))?;
                ToneCurve::Linear { a: p[0], b: p[1] }
            }
            "poly" | "polynomial" => ToneCurve::Polynomial(parse_params(&name, params, None)?),
            "homographic" => {
                let p = parse_params(&name, params, Some(4))?;
                ToneCurve::Homographic {
                    a: p[0],
                    b: p[1],
                    c: p[2],
                    d: p[3],
                }
            }
            "binary" => ToneCurve::Binary(parse_params(&name, params, Some(1))?[0]),
            _ => return Err(AsciiError::UnknownCurve(s.to_string())),
        };
        Ok(curve)
    }
}

impl fmt::Display for ToneCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneCurve::Identity => write!(f, "identity"),
            ToneCurve::Shift(delta) => write!(f, "shift:{delta}"),
            ToneCurve::ContrastLow => write!(f, "contrast-low"),
            ToneCurve::ContrastMedium => write!(f, "contrast-medium"),
            ToneCurve::ContrastHigh => write!(f, "contrast-high"),
            ToneCurve::Linear { a, b } => write!(f, "linear:{a},{b}"),
            ToneCurve::Polynomial(coeffs) => {
                let joined: Vec<String> = coeffs.iter().map(|c| c.to_string()).collect();
                write!(f, "poly:{}", joined.join(","))
            }
            ToneCurve::Homographic { a, b, c, d } => write!(f, "homographic:{a},{b},{c},{d}"),
            ToneCurve::Binary(threshold) => write!(f, "binary:{threshold}"),
        }
    }
}

impl TryFrom<String> for ToneCurve {
    type Error = AsciiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToneCurve> for String {
    fn from(curve: ToneCurve) -> Self {
        curve.to_string()
    }
}
