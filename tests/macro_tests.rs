use chrono::NaiveDate;
use tytx_bag::{bag, from_str, to_string, Bag, Decimal, Error, Value};

#[test]
fn test_macro_matches_manual_construction() {
    let built = bag! {
        "config.host" => "localhost",
        "config.port" => 5432,
        "config.enabled" => true,
        "users.admin.name" => "Admin",
    }
    .unwrap();

    let mut manual = Bag::new();
    manual.set("config.host", "localhost").unwrap();
    manual.set("config.port", 5432).unwrap();
    manual.set("config.enabled", true).unwrap();
    manual.set("users.admin.name", "Admin").unwrap();

    assert_eq!(built, manual);
}

#[test]
fn test_macro_with_typed_values() {
    let price: Decimal = "29.99".parse().unwrap();
    let joined = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let bag = bag! {
        "price" => price.clone(); { "sku" => "PRD001", "stock" => 100 },
        "joined" => joined,
        "missing" => Value::Null,
        "ratio" => 0.25,
    }
    .unwrap();

    assert_eq!(bag.get("price"), Some(&Value::Decimal(price)));
    assert_eq!(bag.get("joined"), Some(&Value::Date(joined)));
    assert!(bag.get("missing").unwrap().is_null());
    assert_eq!(bag.get_node("price").unwrap().attrs().len(), 2);
}

#[test]
fn test_macro_nesting() {
    let bag = bag! {
        "outer" => bag! {
            "inner" => bag! { "leaf" => 1 }?,
        }?,
    }
    .unwrap();
    assert_eq!(bag.get("outer.inner.leaf"), Some(&Value::Integer(1)));
}

#[test]
fn test_macro_later_paths_overwrite() {
    let bag = bag! { "a" => 1, "b" => 2, "a" => 3 }.unwrap();
    assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(bag.get("a"), Some(&Value::Integer(3)));
}

#[test]
fn test_macro_errors() {
    assert!(matches!(bag! { "a" => 1, "a.b" => 2 }, Err(Error::PathConflict { .. })));
    assert!(matches!(bag! { "a..b" => 1 }, Err(Error::InvalidPath { .. })));
    assert!(matches!(
        bag! { "a" => 1; { "nested" => Value::Bag(Bag::new()) } },
        Err(Error::UnsupportedValueKind { .. })
    ));
}

#[test]
fn test_macro_bag_round_trips() {
    let bag = bag! {
        "version" => "1.0.0",
        "products.item1" => "Widget"; { "stock" => 100 },
    }
    .unwrap();
    assert_eq!(from_str(&to_string(&bag).unwrap()).unwrap(), bag);
}
