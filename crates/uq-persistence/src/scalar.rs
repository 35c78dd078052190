//! Values exchanged with a storage medium
//!
//! [`Scalar`] is the closed set of leaf values a medium has to know about.
//! [`Storable`] maps Rust types onto it so objects can write
//! `adv.save_attribute("size", &self.size)` without naming the variant.

use num_complex::Complex64;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use uq_core::{Error, Result};

/// Leaf value of a persisted object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    /// Boolean flag
    Bool(bool),
    /// 32-bit unsigned integer
    UnsignedInteger(u32),
    /// 64-bit unsigned integer
    Unsigned64(u64),
    /// Floating point value
    Real(#[serde(with = "real_repr")] f64),
    /// Complex value
    Complex(#[serde(with = "complex_repr")] Complex64),
    /// String value
    String(String),
}

impl Scalar {
    /// Name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::UnsignedInteger(_) => "unsigned integer",
            Scalar::Unsigned64(_) => "unsigned 64-bit integer",
            Scalar::Real(_) => "real",
            Scalar::Complex(_) => "complex",
            Scalar::String(_) => "string",
        }
    }

    fn mismatch(expected: &str, found: &Scalar) -> Error {
        Error::Serialization(format!("expected {expected}, found {}", found.kind()))
    }
}

/// Rust types that round-trip through a [`Scalar`]
pub trait Storable: Sized {
    fn to_scalar(&self) -> Scalar;
    fn from_scalar(scalar: Scalar) -> Result<Self>;
}

impl Storable for bool {
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::Bool(b) => Ok(b),
            other => Err(Scalar::mismatch("bool", &other)),
        }
    }
}

impl Storable for u32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::UnsignedInteger(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::UnsignedInteger(v) => Ok(v),
            Scalar::Unsigned64(v) => v
                .to_u32()
                .ok_or_else(|| Error::Serialization(format!("{v} does not fit in 32 bits"))),
            other => Err(Scalar::mismatch("unsigned integer", &other)),
        }
    }
}

impl Storable for u64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Unsigned64(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::Unsigned64(v) => Ok(v),
            Scalar::UnsignedInteger(v) => Ok(u64::from(v)),
            other => Err(Scalar::mismatch("unsigned 64-bit integer", &other)),
        }
    }
}

impl Storable for usize {
    fn to_scalar(&self) -> Scalar {
        // usize is at most 64 bits on supported targets
        Scalar::Unsigned64(*self as u64)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        let value = u64::from_scalar(scalar)?;
        value
            .to_usize()
            .ok_or_else(|| Error::Serialization(format!("{value} does not fit in usize")))
    }
}

impl Storable for f64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Real(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::Real(v) => Ok(v),
            other => Err(Scalar::mismatch("real", &other)),
        }
    }
}

impl Storable for Complex64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Complex(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::Complex(z) => Ok(z),
            Scalar::Real(re) => Ok(Complex64::new(re, 0.0)),
            other => Err(Scalar::mismatch("complex", &other)),
        }
    }
}

impl Storable for String {
    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }

    fn from_scalar(scalar: Scalar) -> Result<Self> {
        match scalar {
            Scalar::String(s) => Ok(s),
            other => Err(Scalar::mismatch("string", &other)),
        }
    }
}

/// JSON has no representation for non-finite numbers; they travel as text.
mod real_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "nan" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!(
                    "invalid real value {other:?}"
                ))),
            },
        }
    }
}

mod complex_repr {
    use num_complex::Complex64;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Parts(
        #[serde(with = "super::real_repr")] f64,
        #[serde(with = "super::real_repr")] f64,
    );

    pub fn serialize<S: Serializer>(value: &Complex64, serializer: S) -> Result<S::Ok, S::Error> {
        Parts(value.re, value.im).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Complex64, D::Error> {
        let Parts(re, im) = Parts::deserialize(deserializer)?;
        Ok(Complex64::new(re, im))
    }
}
