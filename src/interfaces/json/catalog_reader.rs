use crate::domain::catalog::{Catalog, Game};
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    games: Vec<Game>,
}

/// Loads the storefront catalog from a JSON document of the form
/// `{"games": [{"id", "name", "image_ref", "packages": [{"id", "label", "price"}]}]}`.
pub struct CatalogReader<R: Read> {
    source: R,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<Catalog> {
        let document: CatalogDocument = serde_json::from_reader(self.source)?;
        Catalog::new(document.games)
    }
}
