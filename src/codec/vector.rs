//! Bit-vector codec (`vector` and `wire`)

use crate::error::ValueError;
use crate::types::BitValue;

pub const TAG: char = 'b';

/// Widest vector whose full range fits a `u128`
pub const MAX_EXACT_WIDTH: u32 = 128;

/// Encodes unsigned integers up to `2^width - 1`, plus `x` and `z`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorCodec {
    width: u32,
    max: u128,
}

impl VectorCodec {
    pub fn new(width: u32) -> Self {
        let max = if width >= MAX_EXACT_WIDTH {
            u128::MAX
        } else {
            (1u128 << width) - 1
        };
        Self { width, max }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Largest representable value
    pub fn max_value(&self) -> u128 {
        self.max
    }

    pub fn encode(&self, value: &str) -> Result<String, ValueError> {
        match value {
            "x" | "z" => return Ok(format!("{}{}", TAG, value)),
            _ => {}
        }

        let num = self.parse_decimal(value)?;
        Ok(format!("{}{:b}", TAG, num))
    }

    pub fn decode(&self, token: &str) -> Result<BitValue, ValueError> {
        let bits = super::strip_tag(token, TAG, "vector")?;
        let malformed = || ValueError::Malformed {
            kind: "vector",
            token: token.to_string(),
        };

        if bits.is_empty() {
            return Err(malformed());
        }
        if bits.chars().all(|c| c.eq_ignore_ascii_case(&'x')) {
            return Ok(BitValue::Unknown);
        }
        if bits.chars().all(|c| c.eq_ignore_ascii_case(&'z')) {
            return Ok(BitValue::HighImpedance);
        }
        if !bits.chars().all(|c| c == '0' || c == '1') {
            return Err(malformed());
        }

        let num = u128::from_str_radix(bits, 2).map_err(|_| malformed())?;
        if num > self.max {
            return Err(self.out_of_range(num.to_string()));
        }
        Ok(BitValue::Int(num))
    }

    fn parse_decimal(&self, value: &str) -> Result<u128, ValueError> {
        let digits = value.strip_prefix('+').unwrap_or(value);
        let numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

        if let Some(negative) = value.strip_prefix('-') {
            if !negative.is_empty() && negative.chars().all(|c| c.is_ascii_digit()) {
                // Unsigned domain: anything below zero is out of range
                return Err(self.out_of_range(value.to_string()));
            }
        }
        if !numeric {
            return Err(ValueError::InvalidValue {
                value: value.to_string(),
            });
        }

        // All digits but too large for u128 is still a range problem
        let num = digits
            .parse::<u128>()
            .map_err(|_| self.out_of_range(value.to_string()))?;
        if num > self.max {
            return Err(self.out_of_range(value.to_string()));
        }
        Ok(num)
    }

    fn out_of_range(&self, value: String) -> ValueError {
        ValueError::OutOfRange {
            value,
            width: self.width,
            max: self.max,
        }
    }
}
