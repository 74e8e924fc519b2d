//! Type-directed value encoding
//!
//! Every registered variable is bound to a [`Codec`] chosen from its
//! declared [`VarType`]. The writer calls [`Codec::encode`] to turn caller
//! text into a wire token; the reader calls [`Codec::decode`] to turn a
//! token back into a [`Value`].
//!
//! | Type            | Token            | Decoded as                 |
//! |-----------------|------------------|----------------------------|
//! | `vector`/`wire` | `b1010`, `bx`    | [`BitValue`](crate::BitValue) |
//! | `real`          | `r3.14`          | decimal text               |
//! | `string`        | `shello\040world`| unescaped text             |

pub mod text;
pub mod vector;

pub use text::{RealCodec, StringCodec};
pub use vector::VectorCodec;

use crate::error::ValueError;
use crate::types::{Value, VarType};

/// Outcome of a successful encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// Token to write before the identifier
    Token(String),
    /// Repeated empty string; nothing should be written
    Duplicate,
}

impl Encoded {
    pub fn token(&self) -> Option<&str> {
        match self {
            Encoded::Token(t) => Some(t),
            Encoded::Duplicate => None,
        }
    }
}

/// Encoder/decoder bound to one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codec {
    Vector(VectorCodec),
    Real(RealCodec),
    String(StringCodec),
}

impl Codec {
    /// Build the codec for a declared type. `width` only matters for bit-vectors.
    pub fn for_type(var_type: VarType, width: u32) -> Self {
        match var_type {
            VarType::Vector | VarType::Wire => Codec::Vector(VectorCodec::new(width)),
            VarType::Real => Codec::Real(RealCodec),
            VarType::String => Codec::String(StringCodec::new()),
        }
    }

    /// One-character prefix of this codec's tokens
    pub fn type_tag(&self) -> char {
        match self {
            Codec::Vector(_) => vector::TAG,
            Codec::Real(_) => text::REAL_TAG,
            Codec::String(_) => text::STRING_TAG,
        }
    }

    pub fn encode(&mut self, value: &str) -> Result<Encoded, ValueError> {
        match self {
            Codec::Vector(c) => c.encode(value).map(Encoded::Token),
            Codec::Real(c) => c.encode(value).map(Encoded::Token),
            Codec::String(c) => Ok(c.encode(value)),
        }
    }

    pub fn decode(&self, token: &str) -> Result<Value, ValueError> {
        match self {
            Codec::Vector(c) => c.decode(token).map(Value::Vector),
            Codec::Real(c) => c.decode(token).map(Value::Real),
            Codec::String(c) => c.decode(token).map(Value::Text),
        }
    }
}

/// Strip a one-character type prefix, accepting either case
pub(crate) fn strip_tag<'a>(token: &'a str, tag: char, kind: &'static str) -> Result<&'a str, ValueError> {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&tag) => Ok(chars.as_str()),
        _ => Err(ValueError::Malformed {
            kind,
            token: token.to_string(),
        }),
    }
}
