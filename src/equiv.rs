//! Tolerant equivalence between Bags.
//!
//! Strict equality (`==`) compares exact representations. Equivalence is the
//! relation round trips are checked against, and it accepts the
//! normalisations a decoder may legally apply:
//!
//! - a naive datetime matches an aware datetime at offset zero with the same
//!   calendar and clock fields;
//! - decimals match on exact value (`50.00` matches `50`);
//! - floats match bit-for-bit on value, and NaN matches NaN;
//! - attribute maps match as unordered maps.
//!
//! Node order and labels must match exactly at every level.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tytx_bag::{bags_equivalent, Bag};
//!
//! let naive = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let mut sent = Bag::new();
//! sent.set("when", naive).unwrap();
//! let mut received = Bag::new();
//! received.set("when", naive.and_utc()).unwrap();
//!
//! assert_ne!(sent, received);
//! assert!(bags_equivalent(&sent, &received));
//! ```

use crate::{AttrMap, Bag, DateTimeValue, Value};

/// Whether two Bags are equivalent, recursively.
#[must_use]
pub fn bags_equivalent(a: &Bag, b: &Bag) -> bool {
    a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(left, right)| {
            left.label() == right.label()
                && values_equivalent(left.value(), right.value())
                && attrs_equivalent(left.attrs(), right.attrs())
        })
}

/// Whether two attribute maps hold equivalent values under the same keys.
#[must_use]
pub fn attrs_equivalent(a: &AttrMap, b: &AttrMap) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| values_equivalent(value, other)))
}

/// Whether two values are equivalent.
#[must_use]
pub fn values_equivalent(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::DateTime(x), Value::DateTime(y)) => datetimes_equivalent(x, y),
        (Value::Bag(x), Value::Bag(y)) => bags_equivalent(x, y),
        // Decimal equality is already value-based.
        _ => a == b,
    }
}

fn datetimes_equivalent(a: &DateTimeValue, b: &DateTimeValue) -> bool {
    match (a, b) {
        (DateTimeValue::Naive(x), DateTimeValue::Naive(y)) => x == y,
        (DateTimeValue::Aware(x), DateTimeValue::Aware(y)) => {
            x == y && x.offset().local_minus_utc() == y.offset().local_minus_utc()
        }
        (DateTimeValue::Naive(naive), aware @ DateTimeValue::Aware(_))
        | (aware @ DateTimeValue::Aware(_), DateTimeValue::Naive(naive)) => {
            aware.offset_seconds() == Some(0) && aware.local_fields() == *naive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decimal;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    fn naive() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap().and_hms_opt(14, 30, 45).unwrap()
    }

    #[test]
    fn test_naive_matches_utc_only() {
        let naive = Value::from(naive());
        let utc = Value::from(self::naive().and_utc());
        let plus_two = Value::from(
            FixedOffset::east_opt(7200)
                .unwrap()
                .with_ymd_and_hms(2025, 6, 15, 14, 30, 45)
                .unwrap(),
        );
        assert!(values_equivalent(&naive, &utc));
        assert!(values_equivalent(&utc, &naive));
        assert!(!values_equivalent(&naive, &plus_two));
    }

    #[test]
    fn test_same_instant_different_offset_is_not_equivalent() {
        let utc = naive().and_utc().fixed_offset();
        let shifted = utc.with_timezone(&FixedOffset::east_opt(3600).unwrap());
        assert!(!values_equivalent(&Value::from(utc), &Value::from(shifted)));
    }

    #[test]
    fn test_decimals_compare_by_value() {
        let a = Value::from("50.00".parse::<Decimal>().unwrap());
        let b = Value::from("50".parse::<Decimal>().unwrap());
        let c = Value::from("50.01".parse::<Decimal>().unwrap());
        assert!(values_equivalent(&a, &b));
        assert!(!values_equivalent(&a, &c));
    }

    #[test]
    fn test_kinds_never_coerce() {
        assert!(!values_equivalent(&Value::from(1), &Value::from(1.0)));
        assert!(!values_equivalent(&Value::from(1), &Value::from(Decimal::from(1))));
        assert!(!values_equivalent(&Value::from("1"), &Value::from(1)));
        assert!(values_equivalent(&Value::from(f64::NAN), &Value::from(f64::NAN)));
    }

    #[test]
    fn test_bag_order_matters() {
        let mut a = Bag::new();
        a.set("x", 1).unwrap();
        a.set("y", 2).unwrap();
        let mut b = Bag::new();
        b.set("y", 2).unwrap();
        b.set("x", 1).unwrap();
        assert!(!bags_equivalent(&a, &b));
    }

    #[test]
    fn test_attribute_order_does_not_matter() {
        let first = AttrMap::from_pairs([("a", Value::from(1)), ("b", Value::from(naive()))]).unwrap();
        let second = AttrMap::from_pairs([("b", Value::from(naive().and_utc())), ("a", Value::from(1))]).unwrap();
        assert!(attrs_equivalent(&first, &second));

        let mut x = Bag::new();
        x.set_with_attrs("n", 1, first).unwrap();
        let mut y = Bag::new();
        y.set_with_attrs("n", 1, second).unwrap();
        assert!(bags_equivalent(&x, &y));
    }

    #[test]
    fn test_nested_bags_recurse() {
        let mut a = Bag::new();
        a.set("outer.inner.when", naive()).unwrap();
        let mut b = Bag::new();
        b.set("outer.inner.when", naive().and_utc()).unwrap();
        assert!(bags_equivalent(&a, &b));
        b.set("outer.inner.extra", 1).unwrap();
        assert!(!bags_equivalent(&a, &b));
    }
}
