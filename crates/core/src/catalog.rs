use serde::{Deserialize, Serialize};

/// A purchasable package as identified by the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub package_id: u64,
    pub name: String,
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.package_id, self.name)
    }
}

/// Ordered, read-only list of products to check.
///
/// Entries are fixed at construction; iteration follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        Self {
            products: entries
                .into_iter()
                .map(|(package_id, name)| Product {
                    package_id,
                    name: name.into(),
                })
                .collect(),
        }
    }

    /// The refurbished Steam Deck packages.
    pub fn steam_deck_refurbished() -> Self {
        Self::new([
            (903905, "Steam Deck 64GB LCD (Refurb)"),
            (903906, "Steam Deck 256GB LCD (Refurb)"),
            (903907, "Steam Deck 512GB LCD (Refurb)"),
            (1202542, "Steam Deck 512GB OLED (Refurb)"),
            (1202547, "Steam Deck 1TB OLED (Refurb)"),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
