//! The five fixture Bags shared by the integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use tytx_bag::{AttrMap, Bag, Decimal, Value};

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn attrs<const N: usize>(pairs: [(&str, Value); N]) -> AttrMap {
    AttrMap::from_pairs(pairs).unwrap()
}

pub fn simple() -> Bag {
    let mut bag = Bag::new();
    bag.set("name", "test").unwrap();
    bag.set("count", 42).unwrap();
    bag.set("price", dec("99.99")).unwrap();
    bag.set("active", true).unwrap();
    bag.set("empty", Value::Null).unwrap();
    bag
}

pub fn nested() -> Bag {
    let mut bag = Bag::new();
    bag.set("config.host", "localhost").unwrap();
    bag.set("config.port", 5432).unwrap();
    bag.set("config.enabled", true).unwrap();
    bag.set("users.admin.name", "Admin").unwrap();
    bag.set("users.admin.email", "admin@example.com").unwrap();
    bag.set("users.guest.name", "Guest").unwrap();
    bag
}

pub fn typed() -> Bag {
    let mut bag = Bag::new();
    bag.set("decimal_value", dec("123.456")).unwrap();
    bag.set("date_value", date(2025, 6, 15)).unwrap();
    bag.set("datetime_value", date(2025, 6, 15).and_hms_opt(14, 30, 45).unwrap())
        .unwrap();
    bag.set("time_value", NaiveTime::from_hms_opt(10, 30, 0).unwrap()).unwrap();
    bag.set("integer", 999).unwrap();
    bag.set("float_val", 1.5).unwrap();
    bag.set("boolean", false).unwrap();
    bag.set("null_val", Value::Null).unwrap();
    bag.set("string", "Hello, World!").unwrap();
    bag
}

pub fn with_attrs() -> Bag {
    let mut bag = Bag::new();
    bag.set_with_attrs(
        "item1",
        "value1",
        attrs([("color", Value::from("red")), ("size", Value::from(10))]),
    )
    .unwrap();
    bag.set_with_attrs("item2", dec("50.00"), attrs([("currency", Value::from("EUR"))]))
        .unwrap();
    bag.set_with_attrs("nested.child", "deep", attrs([("level", Value::from(2))]))
        .unwrap();
    bag
}

pub fn complex() -> Bag {
    let mut bag = Bag::new();
    bag.set("version", "1.0.0").unwrap();
    bag.set("created", date(2025, 1, 15).and_hms_opt(10, 30, 0).unwrap())
        .unwrap();
    bag.set("config.database.host", "db.example.com").unwrap();
    bag.set("config.database.port", 5432).unwrap();
    bag.set("config.database.ssl", true).unwrap();
    bag.set_with_attrs(
        "products.item1",
        dec("29.99"),
        attrs([("sku", Value::from("PRD001")), ("stock", Value::from(100))]),
    )
    .unwrap();
    bag.set_with_attrs(
        "products.item2",
        dec("49.99"),
        attrs([("sku", Value::from("PRD002")), ("stock", Value::from(50))]),
    )
    .unwrap();
    bag.set("users.user1.name", "Alice").unwrap();
    bag.set("users.user1.joined", date(2024, 3, 15)).unwrap();
    bag.set("users.user2.name", "Bob").unwrap();
    bag.set("users.user2.joined", date(2024, 6, 20)).unwrap();
    bag
}

pub fn fixtures() -> Vec<(&'static str, Bag)> {
    vec![
        ("simple", simple()),
        ("nested", nested()),
        ("typed", typed()),
        ("attrs", with_attrs()),
        ("complex", complex()),
    ]
}
