//! Timescale declaration (`$timescale 10ps $end`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VcdError;

/// Valid timescale numbers
pub const SUPPORTED_MAGNITUDES: [u32; 3] = [1, 10, 100];

/// Unit of a timescale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    S,
    Ms,
    Us,
    Ns,
    Ps,
    Fs,
}

impl TimeUnit {
    /// All units, coarsest first
    pub fn all() -> &'static [TimeUnit] {
        &[
            TimeUnit::S,
            TimeUnit::Ms,
            TimeUnit::Us,
            TimeUnit::Ns,
            TimeUnit::Ps,
            TimeUnit::Fs,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => "us",
            TimeUnit::Ns => "ns",
            TimeUnit::Ps => "ps",
            TimeUnit::Fs => "fs",
        }
    }

    /// Power of ten relative to one second
    pub fn exponent(&self) -> i32 {
        match self {
            TimeUnit::S => 0,
            TimeUnit::Ms => -3,
            TimeUnit::Us => -6,
            TimeUnit::Ns => -9,
            TimeUnit::Ps => -12,
            TimeUnit::Fs => -15,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = VcdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeUnit::all()
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| VcdError::InvalidTimescale(format!("unknown unit {:?}", s)))
    }
}

/// Timescale of a trace: one tick is `magnitude` × `unit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timescale {
    magnitude: u32,
    unit: TimeUnit,
}

impl Timescale {
    /// Create a timescale, rejecting magnitudes other than 1, 10 and 100
    pub fn new(magnitude: u32, unit: TimeUnit) -> Result<Self, VcdError> {
        if !SUPPORTED_MAGNITUDES.contains(&magnitude) {
            return Err(VcdError::InvalidTimescale(format!(
                "magnitude {} not in {:?}",
                magnitude, SUPPORTED_MAGNITUDES
            )));
        }
        Ok(Self { magnitude, unit })
    }

    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Length of one tick in seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.magnitude as f64 * 10f64.powi(self.unit.exponent())
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self {
            magnitude: 1,
            unit: TimeUnit::Ns,
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.as_str())
    }
}

impl FromStr for Timescale {
    type Err = VcdError;

    /// Accepts `10ps` as well as the spaced form `10 ps`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let split = compact
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| VcdError::InvalidTimescale(format!("missing unit in {:?}", s)))?;
        let (digits, unit) = compact.split_at(split);
        let magnitude = digits
            .parse::<u32>()
            .map_err(|_| VcdError::InvalidTimescale(format!("missing magnitude in {:?}", s)))?;
        Timescale::new(magnitude, unit.parse()?)
    }
}

impl TryFrom<String> for Timescale {
    type Error = VcdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timescale> for String {
    fn from(value: Timescale) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_and_spaced() {
        let ts: Timescale = "10ps".parse().unwrap();
        assert_eq!(ts.magnitude(), 10);
        assert_eq!(ts.unit(), TimeUnit::Ps);
        assert_eq!("10 ps".parse::<Timescale>().unwrap(), ts);
        assert_eq!(ts.to_string(), "10ps");
    }

    #[test]
    fn test_rejects_unsupported() {
        assert!("5ns".parse::<Timescale>().is_err());
        assert!("10 minutes".parse::<Timescale>().is_err());
        assert!("ns".parse::<Timescale>().is_err());
        assert!("100".parse::<Timescale>().is_err());
    }

    #[test]
    fn test_seconds_per_tick() {
        let ts: Timescale = "100us".parse().unwrap();
        assert!((ts.as_secs_f64() - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_serde_as_string() {
        let ts: Timescale = "1ms".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1ms\"");
        let back: Timescale = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
        assert!(serde_json::from_str::<Timescale>("\"3ms\"").is_err());
    }
}
