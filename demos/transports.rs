//! Comparing the four transport/density combinations.
//!
//! Run with: cargo run --example transports

use std::error::Error;
use tytx_bag::{bag, bags_equivalent, decode, encode, Decimal, Density, Transport, TytxOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let catalog = bag! {
        "products.item1" => "29.99".parse::<Decimal>()?; { "sku" => "PRD001", "stock" => 100 },
        "products.item2" => "49.99".parse::<Decimal>()?; { "sku" => "PRD002", "stock" => 50 },
        "users.user1.name" => "Alice",
        "users.user2.name" => "Bob",
    }?;

    println!("{:<9} {:<9} {:>6}  {}", "transport", "density", "bytes", "file");
    for transport in [Transport::Text, Transport::Binary] {
        for density in [Density::Expanded, Density::Compact] {
            let data = encode(&catalog, transport, density)?;
            let back = decode(&data, transport)?;
            assert!(bags_equivalent(&catalog, &back));

            let file = TytxOptions::new()
                .with_transport(transport)
                .with_density(density)
                .file_name("catalog");
            println!("{:<9} {:<9} {:>6}  {}", transport, density, data.len(), file);
        }
    }

    println!("\nCompact text:\n{}", tytx_bag::to_string_compact(&catalog)?);
    Ok(())
}
