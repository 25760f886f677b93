//! Building Bags with the `bag!` macro and walking them.
//!
//! Run with: cargo run --example bag_macro

use std::error::Error;
use tytx_bag::{bag, Position};

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = bag! {
        "database.host" => "db.example.com",
        "database.port" => 5432; { "protocol" => "tcp" },
        "database.ssl" => true,
        "features" => bag! { "search" => true, "export" => false }?,
    }?;

    // Insert a node ahead of an existing sibling.
    config.set_at("name", "production", None, Position::Before("database".into()))?;

    for (path, node) in config.walk() {
        println!("{:<20} {:>8}  {}", path, node.value().kind(), node.value());
    }

    let port = config.get_node("database.port").ok_or("missing port")?;
    println!("\nport attributes: {:?}", port.attrs().keys().collect::<Vec<_>>());

    Ok(())
}
