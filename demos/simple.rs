//! Basic Bag construction and a TyTx round trip.
//!
//! Run with: cargo run --example simple

use chrono::NaiveDate;
use std::error::Error;
use tytx_bag::{from_str, to_string, AttrMap, Bag, Decimal, Value};

fn main() -> Result<(), Box<dyn Error>> {
    let mut order = Bag::new();
    order.set("customer.name", "Alice Johnson")?;
    order.set("customer.email", "alice@example.com")?;
    order.set("placed", NaiveDate::from_ymd_opt(2025, 6, 15).ok_or("bad date")?)?;

    let attrs = AttrMap::from_pairs([("currency", Value::from("EUR"))])?;
    order.set_with_attrs("total", "149.90".parse::<Decimal>()?, attrs)?;

    println!("Bag:\n{}\n", order);

    let text = to_string(&order)?;
    println!("TyTx text:\n{}\n", text);

    let back = from_str(&text)?;
    assert_eq!(order, back);
    println!("✓ Round-trip successful");

    Ok(())
}
