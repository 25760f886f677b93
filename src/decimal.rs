//! Arbitrary-precision decimal numbers.
//!
//! [`Decimal`] stores an exact unscaled integer plus a base-10 scale, so
//! `123.456` is `123456 × 10⁻³`. No binary floating point is involved at any
//! point: parsing goes from the digit string straight into a [`BigInt`].
//!
//! ## Representation vs value
//!
//! The scale written by the user is kept (`"50.00"` displays and encodes as
//! `50.00`), but equality, ordering and hashing use the canonical reduction
//! that strips trailing fractional zeros, so `50.00 == 50.0 == 50`.
//!
//! Zero has no sign: `"-0.00"` parses to `0.00`, keeping its scale. The
//! unscaled [`BigInt`] has no negative zero and the sign of zero carries no
//! value.
//!
//! ```rust
//! use tytx_bag::Decimal;
//!
//! let price: Decimal = "50.00".parse().unwrap();
//! assert_eq!(price.to_string(), "50.00");
//! assert_eq!(price, "50".parse::<Decimal>().unwrap());
//! assert_eq!(price.normalized().to_string(), "50");
//! ```

use crate::{Error, Result};
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Largest exponent accepted in `1E+n` notation.
const MAX_EXPONENT: i64 = 4096;

/// An exact decimal number: `unscaled × 10^-scale`.
#[derive(Clone, Debug)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal from its unscaled integer and scale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Decimal;
    ///
    /// assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
    /// assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
    /// ```
    #[must_use]
    pub fn new(unscaled: impl Into<BigInt>, scale: u32) -> Self {
        Decimal {
            unscaled: unscaled.into(),
            scale,
        }
    }

    #[must_use]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits after the decimal point, as written.
    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled.sign() == Sign::NoSign
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    /// Returns the canonical reduction: trailing fractional zeros stripped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tytx_bag::Decimal;
    ///
    /// let d: Decimal = "1.2300".parse().unwrap();
    /// assert_eq!(d.normalized().scale(), 2);
    /// let zero: Decimal = "0.000".parse().unwrap();
    /// assert_eq!(zero.normalized().scale(), 0);
    /// ```
    #[must_use]
    pub fn normalized(&self) -> Decimal {
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        if unscaled.sign() == Sign::NoSign {
            return Decimal::new(unscaled, 0);
        }
        while scale > 0 && (&unscaled % 10u32).sign() == Sign::NoSign {
            unscaled /= 10u32;
            scale -= 1;
        }
        Decimal { unscaled, scale }
    }

    /// Brings both operands to a common scale without losing digits.
    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone()),
            Ordering::Less => {
                let factor = BigInt::from(10u32).pow(other.scale - self.scale);
                (&self.unscaled * factor, other.unscaled.clone())
            }
            Ordering::Greater => {
                let factor = BigInt::from(10u32).pow(self.scale - other.scale);
                (self.unscaled.clone(), &other.unscaled * factor)
            }
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::malformed(format!("invalid decimal literal '{}'", s));

        let (mantissa, exponent) = match s.find(['e', 'E']) {
            Some(pos) => {
                let exp: i64 = s[pos + 1..].parse().map_err(|_| invalid())?;
                if exp.abs() > MAX_EXPONENT {
                    return Err(invalid());
                }
                (&s[..pos], exp)
            }
            None => (s, 0),
        };

        let (negative, body) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mut unscaled: BigInt = digits.parse().map_err(|_| invalid())?;
        if negative {
            unscaled = -unscaled;
        }

        let scale = frac_part.len() as i64 - exponent;
        if scale < 0 {
            let factor = BigInt::from(10u32).pow((-scale) as u32);
            Ok(Decimal::new(unscaled * factor, 0))
        } else {
            let scale = u32::try_from(scale).map_err(|_| invalid())?;
            Ok(Decimal::new(unscaled, scale))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = self.aligned(other);
        a == b
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.aligned(other);
        a.cmp(&b)
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let canonical = self.normalized();
        canonical.unscaled.hash(state);
        canonical.scale.hash(state);
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
