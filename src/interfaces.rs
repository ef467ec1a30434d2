// Definitions that are used throughout all modules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PatternError;

// Where the phase of a Fourier component is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginMode {
    /// Origin at pattern[0, 0]
    Corner,
    /// Origin at the zero-frequency position of an unshifted FFT, i.e. (nx / 2, ny / 2)
    Fft,
}

impl FromStr for OriginMode {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "corner" => Ok(OriginMode::Corner),
            "fft" => Ok(OriginMode::Fft),
            other => Err(PatternError::InvalidMode {
                kind: "origin mode",
                value: other.to_string(),
                expected: "'corner', 'fft'",
            }),
        }
    }
}

impl fmt::Display for OriginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginMode::Corner => write!(f, "corner"),
            OriginMode::Fft => write!(f, "fft"),
        }
    }
}

// Units of reciprocal vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyUnits {
    /// dot(a_i, r_j) = delta_ij
    Frequency,
    /// dot(a_i, r_j) = 2 pi delta_ij
    AngularFrequency,
}

impl FromStr for FrequencyUnits {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequency" => Ok(FrequencyUnits::Frequency),
            "angular-frequency" => Ok(FrequencyUnits::AngularFrequency),
            other => Err(PatternError::InvalidMode {
                kind: "frequency units",
                value: other.to_string(),
                expected: "'frequency', 'angular-frequency'",
            }),
        }
    }
}

// How angular differences are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleDiffMode {
    /// Signed difference in (-pi, pi]
    Normal,
    /// As `Normal`, but theta and theta + pi are treated as the same direction
    Half,
}

impl FromStr for AngleDiffMode {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(AngleDiffMode::Normal),
            "half" => Ok(AngleDiffMode::Half),
            other => Err(PatternError::InvalidMode {
                kind: "angle difference mode",
                value: other.to_string(),
                expected: "'normal', 'half'",
            }),
        }
    }
}

// Grayscale to binary conversion strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    /// Floyd-Steinberg error diffusion, 1/16 * [[_, #, 7], [3, 5, 1]]
    FloydSteinberg,
    /// Jarvis-Judice-Ninke error diffusion, 1/48 * [[_, _, #, 7, 5], [3, 5, 7, 5, 3], [1, 3, 5, 3, 1]]
    Jjn,
    /// Independent Bernoulli draw per pixel
    Random,
    /// Nearest value, ties to even
    Round,
}

impl FromStr for DitherMode {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floyd-steinberg" => Ok(DitherMode::FloydSteinberg),
            "jjn" => Ok(DitherMode::Jjn),
            "random" => Ok(DitherMode::Random),
            "round" => Ok(DitherMode::Round),
            other => Err(PatternError::InvalidMode {
                kind: "dither mode",
                value: other.to_string(),
                expected: "'floyd-steinberg', 'jjn', 'random', 'round'",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("fft".parse::<OriginMode>().unwrap(), OriginMode::Fft);
        assert_eq!("corner".parse::<OriginMode>().unwrap(), OriginMode::Corner);
        assert_eq!(
            "angular-frequency".parse::<FrequencyUnits>().unwrap(),
            FrequencyUnits::AngularFrequency
        );
        assert_eq!("half".parse::<AngleDiffMode>().unwrap(), AngleDiffMode::Half);
        assert_eq!("jjn".parse::<DitherMode>().unwrap(), DitherMode::Jjn);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = "center".parse::<OriginMode>().unwrap_err();
        assert!(matches!(err, PatternError::InvalidMode { kind: "origin mode", .. }));

        let err = "ordered".parse::<DitherMode>().unwrap_err();
        assert!(err.to_string().contains("ordered"));
    }
}
