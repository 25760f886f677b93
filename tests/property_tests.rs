//! Property-based tests for the round-trip guarantees.
//!
//! Bags are generated with every value kind, attributes and up to three
//! levels of nesting, then pushed through all transport/density pairs.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use proptest::prelude::*;
use tytx_bag::{bags_equivalent, decode, encode, AttrMap, Bag, Decimal, Density, Error, Transport, Value};

const COMBINATIONS: [(Transport, Density); 4] = [
    (Transport::Text, Density::Expanded),
    (Transport::Text, Density::Compact),
    (Transport::Binary, Density::Expanded),
    (Transport::Binary, Density::Compact),
];

fn naive_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1i32..9999, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000).prop_map(
        |(y, mo, d, h, mi, s, n)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .and_then(|date| date.and_hms_nano_opt(h, mi, s, n))
                .unwrap()
        },
    )
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::from),
        "[a-z]{0,3}(::[A-Z]{0,3}){1,2}".prop_map(Value::from),
        (any::<i64>(), 0u32..20).prop_map(|(unscaled, scale)| Value::from(Decimal::new(unscaled, scale))),
        (1i32..9999, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())),
        (0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000)
            .prop_map(|(h, m, s, n)| Value::from(NaiveTime::from_hms_nano_opt(h, m, s, n).unwrap())),
        naive_datetime().prop_map(Value::from),
        (naive_datetime(), -14 * 60..=14 * 60i32).prop_map(|(dt, minutes)| {
            let offset = FixedOffset::east_opt(minutes * 60).unwrap();
            Value::from(offset.from_local_datetime(&dt).unwrap())
        }),
    ]
}

fn attrs() -> impl Strategy<Value = AttrMap> {
    prop::collection::vec(("[a-z]{1,4}", scalar()), 0..3)
        .prop_map(|pairs| AttrMap::from_pairs(pairs).unwrap())
}

fn build(entries: Vec<(String, Value, AttrMap)>) -> Bag {
    let mut bag = Bag::new();
    for (label, value, attrs) in entries {
        bag.set_with_attrs(&label, value, attrs).unwrap();
    }
    bag
}

fn label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn any_bag() -> impl Strategy<Value = Bag> {
    let leaf = prop::collection::vec((label(), scalar(), attrs()), 0..6).prop_map(build);
    leaf.prop_recursive(3, 32, 5, |inner| {
        prop::collection::vec(
            (label(), prop_oneof![scalar(), inner.prop_map(Value::Bag)], attrs()),
            0..5,
        )
        .prop_map(build)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_round_trip_is_equivalent(bag in any_bag()) {
        for (transport, density) in COMBINATIONS {
            let back = decode(&encode(&bag, transport, density).unwrap(), transport).unwrap();
            prop_assert!(bags_equivalent(&bag, &back), "{} {}\n{}\n---\n{}", transport, density, bag, back);
        }
    }

    #[test]
    fn prop_densities_agree(bag in any_bag()) {
        for transport in [Transport::Text, Transport::Binary] {
            let expanded = decode(&encode(&bag, transport, Density::Expanded).unwrap(), transport).unwrap();
            let compact = decode(&encode(&bag, transport, Density::Compact).unwrap(), transport).unwrap();
            prop_assert!(bags_equivalent(&expanded, &compact));
        }
    }

    #[test]
    fn prop_encoding_is_stable_after_one_trip(bag in any_bag()) {
        for (transport, density) in COMBINATIONS {
            let once = decode(&encode(&bag, transport, density).unwrap(), transport).unwrap();
            let first = encode(&once, transport, density).unwrap();
            let second = encode(&decode(&first, transport).unwrap(), transport, density).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_any_offset_round_trips_or_is_refused(dt in naive_datetime(), seconds in -14 * 3600..=14 * 3600i32) {
        let offset = FixedOffset::east_opt(seconds).unwrap();
        let mut bag = Bag::new();
        bag.set("when", offset.from_local_datetime(&dt).unwrap()).unwrap();
        for (transport, density) in COMBINATIONS {
            match encode(&bag, transport, density) {
                Ok(bytes) => {
                    prop_assert_eq!(seconds % 60, 0);
                    let back = decode(&bytes, transport).unwrap();
                    prop_assert!(bags_equivalent(&bag, &back));
                }
                Err(err) => {
                    prop_assert_ne!(seconds % 60, 0);
                    prop_assert!(matches!(err, Error::UnsupportedValueKind { .. }), "{:?}", err);
                }
            }
        }
    }

    #[test]
    fn prop_decimal_text_is_exact(unscaled in any::<i128>(), scale in 0u32..30) {
        let decimal = Decimal::new(unscaled, scale);
        let parsed: Decimal = decimal.to_string().parse().unwrap();
        prop_assert_eq!(parsed.scale(), decimal.scale());
        prop_assert_eq!(parsed.unscaled(), decimal.unscaled());
    }

    #[test]
    fn prop_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode(&data, Transport::Binary);
        let _ = decode(&data, Transport::Text);
    }
}
