//! Short identifier codes for value-change records.
//!
//! Codes are drawn from the printable range `!` (33) to `~` (126). The
//! allocator hands out index 0, 1, 2, ... and each index maps to a unique
//! code: the first 94 are single characters, after which codes grow to two
//! characters and so on (bijective base 94, least significant digit first).

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// First code point used for identifiers
pub const ID_BASE: u8 = b'!';

/// Number of printable characters available per digit
pub const ID_RADIX: u64 = (b'~' - b'!' + 1) as u64;

/// Identifier of a variable inside one trace
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdCode(String);

impl IdCode {
    /// Wrap an identifier read from a trace
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Code for the `index`-th allocated variable
    pub fn from_index(index: u64) -> Self {
        let mut n = index;
        let mut code = String::new();
        loop {
            code.push((ID_BASE + (n % ID_RADIX) as u8) as char);
            n /= ID_RADIX;
            if n == 0 {
                break;
            }
            n -= 1;
        }
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for IdCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdCode({:?})", self.0)
    }
}

impl fmt::Display for IdCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential identifier allocation; never reuses a code
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> IdCode {
        let id = IdCode::from_index(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers handed out so far
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
