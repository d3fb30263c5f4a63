use crate::domain::cart::LineItem;
use crate::domain::catalog::Catalog;
use crate::domain::money::Price;
use crate::error::{CheckoutError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct LineItemRecord {
    id: String,
    name: String,
    unit_price: Decimal,
    quantity: u32,
    #[serde(default)]
    image_ref: String,
}

/// A `game,package,quantity` row, resolved against a [`Catalog`].
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct PackageSelection {
    pub game: String,
    pub package: String,
    pub quantity: u32,
}

impl PackageSelection {
    pub fn resolve(&self, catalog: &Catalog) -> Result<LineItem> {
        catalog.line_item(&self.game, &self.package, self.quantity)
    }
}

/// Reads cart contents from a CSV source.
///
/// This reader wraps `csv::Reader` and yields one `Result` per row, so a bad row
/// can be reported and skipped without losing the rest of the cart.
pub struct CartReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CartReader<R> {
    /// Creates a new `CartReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Rows with the header `id,name,unit_price,quantity,image_ref`.
    pub fn line_items(self) -> impl Iterator<Item = Result<LineItem>> {
        self.reader
            .into_deserialize::<LineItemRecord>()
            .map(|record| {
                let record = record?;
                LineItem::new(
                    record.id,
                    record.name,
                    Price::new(record.unit_price)?,
                    record.quantity,
                    record.image_ref,
                )
            })
    }

    /// Rows with the header `game,package,quantity`.
    pub fn package_selections(self) -> impl Iterator<Item = Result<PackageSelection>> {
        self.reader
            .into_deserialize::<PackageSelection>()
            .map(|result| result.map_err(CheckoutError::from))
    }
}
