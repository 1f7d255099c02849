//! Built-in storefront catalog
//!
//! The eight chairs the shop sells, priced in USD.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::USD};

use crate::{
    catalog::{Catalog, CatalogError},
    products::{Category, Product, ProductError, ProductId},
};

struct Entry {
    id: u32,
    name: &'static str,
    category: Category,
    retail: i64,
    wholesale: i64,
    original: Option<i64>,
    moq: u32,
    rating: i64,
    reviews: u32,
    in_stock: bool,
    is_new: bool,
    description: &'static str,
    features: [&'static str; 4],
}

const ENTRIES: [Entry; 8] = [
    Entry {
        id: 1,
        name: "Executive Office Chair",
        category: Category::Executive,
        retail: 89_999,
        wholesale: 64_999,
        original: Some(119_999),
        moq: 10,
        rating: 48,
        reviews: 124,
        in_stock: true,
        is_new: false,
        description: "Premium leather executive chair with lumbar support, adjustable height, and ergonomic design.",
        features: [
            "Leather upholstery",
            "Lumbar support",
            "Height adjustable",
            "360° swivel",
        ],
    },
    Entry {
        id: 2,
        name: "Ergonomic Task Chair",
        category: Category::Ergonomic,
        retail: 64_999,
        wholesale: 44_999,
        original: None,
        moq: 15,
        rating: 49,
        reviews: 89,
        in_stock: true,
        is_new: true,
        description: "Advanced ergonomic task chair with mesh back, adjustable armrests, and lumbar support.",
        features: [
            "Mesh back",
            "Adjustable armrests",
            "Lumbar support",
            "Breathable fabric",
        ],
    },
    Entry {
        id: 3,
        name: "Gaming Chair Pro",
        category: Category::Gaming,
        retail: 54_999,
        wholesale: 37_999,
        original: Some(69_999),
        moq: 12,
        rating: 47,
        reviews: 156,
        in_stock: true,
        is_new: false,
        description: "High-performance gaming chair with RGB lighting, memory foam padding, and full recline.",
        features: ["RGB lighting", "Memory foam", "Full recline", "Racing style"],
    },
    Entry {
        id: 4,
        name: "Mesh Office Chair",
        category: Category::Ergonomic,
        retail: 44_999,
        wholesale: 29_999,
        original: None,
        moq: 20,
        rating: 46,
        reviews: 73,
        in_stock: true,
        is_new: false,
        description: "Breathable mesh office chair with modern design and excellent ventilation.",
        features: [
            "Full mesh design",
            "Breathable",
            "Modern style",
            "Lightweight",
        ],
    },
    Entry {
        id: 5,
        name: "Conference Room Chair",
        category: Category::Conference,
        retail: 34_999,
        wholesale: 22_999,
        original: None,
        moq: 25,
        rating: 45,
        reviews: 45,
        in_stock: false,
        is_new: false,
        description: "Professional conference room chair with sleek design and comfortable padding.",
        features: [
            "Professional design",
            "Comfortable padding",
            "Stackable",
            "Durable frame",
        ],
    },
    Entry {
        id: 6,
        name: "Premium Gaming Chair",
        category: Category::Gaming,
        retail: 124_999,
        wholesale: 89_999,
        original: None,
        moq: 8,
        rating: 49,
        reviews: 201,
        in_stock: true,
        is_new: true,
        description: "Ultimate gaming chair with premium materials, advanced ergonomics, and customizable features.",
        features: [
            "Premium materials",
            "Advanced ergonomics",
            "Customizable",
            "Professional grade",
        ],
    },
    Entry {
        id: 7,
        name: "Standing Desk Chair",
        category: Category::Ergonomic,
        retail: 79_999,
        wholesale: 54_999,
        original: Some(99_999),
        moq: 10,
        rating: 47,
        reviews: 67,
        in_stock: true,
        is_new: false,
        description: "Innovative standing desk chair that promotes active sitting and better posture.",
        features: [
            "Active sitting",
            "Height adjustable",
            "Posture support",
            "Innovative design",
        ],
    },
    Entry {
        id: 8,
        name: "Luxury Executive Chair",
        category: Category::Executive,
        retail: 159_999,
        wholesale: 114_999,
        original: None,
        moq: 5,
        rating: 48,
        reviews: 92,
        in_stock: true,
        is_new: true,
        description: "Top-tier luxury executive chair with premium leather and advanced comfort features.",
        features: [
            "Premium leather",
            "Luxury design",
            "Advanced comfort",
            "Executive style",
        ],
    },
];

impl Entry {
    fn build(&self) -> Result<Product, ProductError> {
        let product = Product::new(
            ProductId::new(self.id),
            self.name,
            self.category,
            Money::from_minor(self.retail, USD),
            Money::from_minor(self.wholesale, USD),
        )?
        .with_minimum_order_quantity(self.moq)?
        .with_rating(Decimal::new(self.rating, 1), self.reviews)?
        .with_stock(self.in_stock)
        .with_new_badge(self.is_new)
        .with_description(self.description)
        .with_features(self.features);

        match self.original {
            Some(original) => product.with_original_price(Money::from_minor(original, USD)),
            None => Ok(product),
        }
    }
}

impl Catalog {
    /// The shop's built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an entry violates a product invariant.
    pub fn storefront() -> Result<Self, CatalogError> {
        let products = ENTRIES
            .iter()
            .map(Entry::build)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::with_products(products, USD)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        catalog::filter::{CategoryFilter, PriceRange, ProductFilter},
        pricing::PricingMode,
    };

    use super::*;

    #[test]
    fn storefront_catalog_has_eight_chairs() -> TestResult {
        let catalog = Catalog::storefront()?;

        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.currency(), USD);

        let executive = catalog.product(ProductId::new(1))?;
        assert_eq!(executive.name(), "Executive Office Chair");
        assert_eq!(executive.minimum_order_quantity(), 10);
        assert!(executive.is_on_sale());

        assert!(!catalog.product(ProductId::new(5))?.in_stock());

        Ok(())
    }

    #[test]
    fn storefront_category_counts() -> TestResult {
        let catalog = Catalog::storefront()?;

        let counts: Vec<usize> = catalog
            .category_counts()
            .iter()
            .map(|(_, count)| *count)
            .collect();

        assert_eq!(counts, vec![8, 2, 3, 2, 1]);

        Ok(())
    }

    #[test]
    fn default_listing_hides_only_chairs_above_two_thousand() -> TestResult {
        let catalog = Catalog::storefront()?;
        let filter = ProductFilter::default_for(USD);

        assert_eq!(catalog.filter(&filter, PricingMode::Retail).len(), 8);

        let narrow = ProductFilter::new(
            CategoryFilter::Only(Category::Executive),
            PriceRange::new(Money::from_minor(0, USD), Money::from_minor(120_000, USD))?,
        );

        let retail: Vec<u32> = catalog
            .filter(&narrow, PricingMode::Retail)
            .iter()
            .map(|product| product.id().get())
            .collect();

        let wholesale: Vec<u32> = catalog
            .filter(&narrow, PricingMode::Wholesale)
            .iter()
            .map(|product| product.id().get())
            .collect();

        assert_eq!(retail, vec![1]);
        assert_eq!(wholesale, vec![1, 8]);

        Ok(())
    }
}
