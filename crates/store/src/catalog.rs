//! Static product catalog.
//!
//! The catalog is configuration data: a read-only list of products loaded
//! once and never mutated by the stores. Cart lines and order lines refer to
//! products by id; product records are never duplicated into the cart.

use serde::{Deserialize, Serialize};

use farine_core::{Price, ProductId};

/// Product category, a fixed enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bread,
    Viennoiserie,
    Patisserie,
    Seasonal,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bread => write!(f, "bread"),
            Self::Viennoiserie => write!(f, "viennoiserie"),
            Self::Patisserie => write!(f, "patisserie"),
            Self::Seasonal => write!(f, "seasonal"),
        }
    }
}

/// A catalog product record, immutable at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product id, the foreign key used by cart and order lines.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Fixed category.
    pub category: Category,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub stock: u32,
    /// Display token shown next to the name.
    pub emoji: String,
    /// Short description.
    pub description: String,
}

/// Read-only product catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from a product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the document is not a valid catalog.
    pub fn from_json(doc: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(doc)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in the given category, in catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.id != product.id && p.category == product.category)
            .take(limit)
            .collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products. Never true in normal operation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The built-in demo catalog.
    #[must_use]
    pub fn demo() -> Self {
        fn product(
            id: &str,
            name: &str,
            category: Category,
            cents: i64,
            stock: u32,
            emoji: &str,
            description: &str,
        ) -> Product {
            Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                category,
                price: Price::eur_cents(cents),
                stock,
                emoji: emoji.to_owned(),
                description: description.to_owned(),
            }
        }

        Self::new(vec![
            product(
                "pain-de-campagne",
                "Pain de Campagne",
                Category::Bread,
                480,
                12,
                "🍞",
                "Slow-fermented country loaf with a thick, caramelized crust.",
            ),
            product(
                "baguette-tradition",
                "Baguette Tradition",
                Category::Bread,
                160,
                40,
                "🥖",
                "Classic French baguette, baked three times a day.",
            ),
            product(
                "croissant-beurre",
                "Croissant au Beurre",
                Category::Viennoiserie,
                190,
                30,
                "🥐",
                "All-butter croissant laminated over two days.",
            ),
            product(
                "pain-au-chocolat",
                "Pain au Chocolat",
                Category::Viennoiserie,
                210,
                24,
                "🍫",
                "Two batons of dark chocolate in flaky pastry.",
            ),
            product(
                "eclair-cafe",
                "Éclair au Café",
                Category::Patisserie,
                350,
                16,
                "☕",
                "Choux pastry filled with coffee crème pâtissière.",
            ),
            product(
                "tarte-citron",
                "Tarte au Citron",
                Category::Patisserie,
                420,
                10,
                "🍋",
                "Lemon curd tart with torched Italian meringue.",
            ),
            product(
                "mille-feuille",
                "Mille-Feuille",
                Category::Patisserie,
                450,
                8,
                "🍰",
                "A thousand layers of caramelized puff and vanilla cream.",
            ),
            product(
                "galette-des-rois",
                "Galette des Rois",
                Category::Seasonal,
                1800,
                6,
                "👑",
                "Frangipane galette for Epiphany, fève included.",
            ),
            product(
                "buche-de-noel",
                "Bûche de Noël",
                Category::Seasonal,
                2400,
                4,
                "🪵",
                "Chocolate-chestnut yule log, serves eight.",
            ),
        ])
    }
}
