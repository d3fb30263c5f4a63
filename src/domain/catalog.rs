use crate::domain::cart::LineItem;
use crate::domain::money::Price;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};

/// A purchasable denomination of a game or gift card, e.g. "660 UC".
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Package {
    pub id: String,
    pub label: String,
    pub price: Price,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Game {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_ref: String,
    pub packages: Vec<Package>,
}

impl Game {
    pub fn package(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == package_id)
    }
}

/// The storefront catalog. Games are priced per package rather than per title.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Default)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    pub fn new(games: Vec<Game>) -> Result<Self> {
        for game in &games {
            if game.packages.is_empty() {
                return Err(CheckoutError::ValidationError(format!(
                    "Game {} has no packages",
                    game.id
                )));
            }
        }
        Ok(Self { games })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, game_id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }

    /// Builds a cart line for `quantity` units of a game package.
    pub fn line_item(&self, game_id: &str, package_id: &str, quantity: u32) -> Result<LineItem> {
        let game = self.game(game_id).ok_or_else(|| {
            CheckoutError::ValidationError(format!("Unknown game: {game_id}"))
        })?;
        let package = game.package(package_id).ok_or_else(|| {
            CheckoutError::ValidationError(format!(
                "Unknown package {package_id} for game {game_id}"
            ))
        })?;

        LineItem::new(
            format!("{}:{}", game.id, package.id),
            format!("{} - {}", game.name, package.label),
            package.price,
            quantity,
            game.image_ref.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::Cart;
    use crate::domain::money::Money;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::new(vec![Game {
            id: "pubg".to_string(),
            name: "PUBG Mobile".to_string(),
            image_ref: "/uploads/pubg.jpg".to_string(),
            packages: vec![
                Package {
                    id: "60uc".to_string(),
                    label: "60 UC".to_string(),
                    price: Price::new(dec!(0.99)).unwrap(),
                },
                Package {
                    id: "660uc".to_string(),
                    label: "660 UC".to_string(),
                    price: Price::new(dec!(9.99)).unwrap(),
                },
            ],
        }])
        .unwrap()
    }

    #[test]
    fn test_line_item_from_package() {
        let item = catalog().line_item("pubg", "660uc", 2).unwrap();
        assert_eq!(item.id, "pubg:660uc");
        assert_eq!(item.name, "PUBG Mobile - 660 UC");
        assert_eq!(item.unit_price.value(), dec!(9.99));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.image_ref, "/uploads/pubg.jpg");
    }

    #[test]
    fn test_unknown_game_or_package() {
        let catalog = catalog();
        assert!(matches!(
            catalog.line_item("fortnite", "60uc", 1),
            Err(CheckoutError::ValidationError(_))
        ));
        assert!(matches!(
            catalog.line_item("pubg", "1800uc", 1),
            Err(CheckoutError::ValidationError(_))
        ));
    }

    #[test]
    fn test_same_package_merges_in_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add(catalog.line_item("pubg", "60uc", 1).unwrap());
        cart.add(catalog.line_item("pubg", "60uc", 1).unwrap());
        cart.add(catalog.line_item("pubg", "660uc", 1).unwrap());

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.subtotal().unwrap(), Money::new(dec!(11.97)));
    }

    #[test]
    fn test_game_without_packages_is_rejected() {
        let result = Catalog::new(vec![Game {
            id: "empty".to_string(),
            name: "Empty".to_string(),
            image_ref: String::new(),
            packages: vec![],
        }]);
        assert!(matches!(result, Err(CheckoutError::ValidationError(_))));
    }
}
