//! Band specifications - classify a measurement into a textual range

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BandParseError {
    #[error("empty band specification")]
    Empty,
    #[error("range band must have exactly two bounds: {0:?}")]
    RangeArity(String),
    #[error("invalid number in band {spec:?}: {part:?}")]
    InvalidNumber { spec: String, part: String },
}

/// Parsed band specification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// "low-high", inclusive on both ends
    Between(f64, f64),
    /// ">n", strict
    Above(f64),
    /// "<n", strict
    Below(f64),
    /// "n"
    Exactly(f64),
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Band::Between(low, high) => low <= value && value <= high,
            Band::Above(threshold) => value > threshold,
            Band::Below(threshold) => value < threshold,
            Band::Exactly(exact) => value == exact,
        }
    }
}

fn parse_number(spec: &str, part: &str) -> Result<f64, BandParseError> {
    part.trim()
        .parse::<f64>()
        .map_err(|_| BandParseError::InvalidNumber {
            spec: spec.to_string(),
            part: part.to_string(),
        })
}

impl FromStr for Band {
    type Err = BandParseError;

    // A '-' anywhere makes it a range, checked before the inequality prefixes
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.trim().is_empty() {
            return Err(BandParseError::Empty);
        }

        if spec.contains('-') {
            let parts: Vec<&str> = spec.split('-').collect();
            if parts.len() != 2 {
                return Err(BandParseError::RangeArity(spec.to_string()));
            }
            let low = parse_number(spec, parts[0])?;
            let high = parse_number(spec, parts[1])?;
            return Ok(Band::Between(low, high));
        }

        if let Some(rest) = spec.strip_prefix('>') {
            return Ok(Band::Above(parse_number(spec, rest)?));
        }

        if let Some(rest) = spec.strip_prefix('<') {
            return Ok(Band::Below(parse_number(spec, rest)?));
        }

        Ok(Band::Exactly(parse_number(spec, spec)?))
    }
}

/// Whether `value` falls inside the band described by `spec`.
/// Unparseable specifications never match.
pub fn band_matches(value: f64, spec: &str) -> bool {
    spec.parse::<Band>()
        .map(|band| band.contains(value))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_band() {
        assert!(band_matches(25.0, "20-30"));
        assert!(!band_matches(15.0, "20-30"));
        // inclusive bounds
        assert!(band_matches(20.0, "20-30"));
        assert!(band_matches(30.0, "20-30"));
    }

    #[test]
    fn test_inequality_bands() {
        assert!(band_matches(50.0, ">40"));
        assert!(!band_matches(30.0, ">40"));
        assert!(!band_matches(40.0, ">40"));

        assert!(band_matches(10.0, "<15"));
        assert!(!band_matches(20.0, "<15"));
        assert!(!band_matches(15.0, "<15"));
    }

    #[test]
    fn test_exact_band() {
        assert!(band_matches(25.0, "25"));
        assert!(!band_matches(24.0, "25"));
        assert!(band_matches(12.5, " 12.5 "));
    }

    #[test]
    fn test_malformed_bands_never_match() {
        assert!(!band_matches(0.0, ""));
        assert!(!band_matches(5.0, "   "));
        assert!(!band_matches(5.0, "<10km"));
        assert!(!band_matches(12.0, "10-25km"));
        assert!(!band_matches(3.0, "1-2-3"));
        assert!(!band_matches(1.0, "yes"));
        // leading '-' is read as a range with an empty lower bound
        assert!(!band_matches(-5.0, "-5"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Band>(), Err(BandParseError::Empty));
        assert!(matches!(
            "1-2-3".parse::<Band>(),
            Err(BandParseError::RangeArity(_))
        ));
        assert!(matches!(
            ">far".parse::<Band>(),
            Err(BandParseError::InvalidNumber { .. })
        ));
        assert_eq!("0-12".parse::<Band>(), Ok(Band::Between(0.0, 12.0)));
    }
}
