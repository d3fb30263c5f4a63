use gamecart::domain::cart::{Cart, LineItem};
use gamecart::domain::money::Price;
use rust_decimal_macros::dec;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub fn sample_cart() -> Cart {
    let mut cart = Cart::new();
    cart.add(
        LineItem::new(
            "pubg:660uc",
            "PUBG Mobile - 660 UC",
            Price::new(dec!(9.99)).unwrap(),
            1,
            "/uploads/games/pubg.jpg",
        )
        .unwrap(),
    );
    cart.add(
        LineItem::new(
            "itunes:25",
            "iTunes Gift Card $25",
            Price::new(dec!(25.00)).unwrap(),
            2,
            "/uploads/cards/itunes.png",
        )
        .unwrap(),
    );
    cart
}

/// Writes a cart CSV with the given data rows under the standard header.
pub fn write_cart_csv(rows: &[&str]) -> Result<NamedTempFile, Error> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "id, name, unit_price, quantity, image_ref")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    file.flush()?;
    Ok(file)
}
