use std::cmp::Ordering;
use crate::models::{FilterCriteria, PriceOrder, Product};
use crate::core::{
    filters::{check_radius, matches_category, matches_text_query, RadiusCheck},
    markers::MarkerLayout,
};

/// Result of the filtering process
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub products: Vec<Product>,
    pub total_candidates: usize,
    /// Products dropped by the radius stage because they had no coordinates
    pub missing_location: usize,
}

/// Product browsing orchestrator - implements the filtering pipeline and
/// map marker layout used by the catalog views
///
/// # Pipeline Stages
/// 1. Category
/// 2. Text search
/// 3. Location radius
/// 4. Price sort
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    layout: MarkerLayout,
}

impl Catalog {
    pub fn new(layout: MarkerLayout) -> Self {
        Self { layout }
    }

    /// Filter and sort `products` according to `criteria`
    ///
    /// The input is never modified; retained products are cloned into the
    /// result in their original relative order, unless a price order is set.
    pub fn filter(&self, products: &[Product], criteria: &FilterCriteria) -> FilterResult {
        let total_candidates = products.len();
        let query = criteria.name_query.to_lowercase();
        let mut missing_location = 0;

        let mut filtered: Vec<Product> = products
            .iter()
            // Stage 1: Category
            .filter(|product| matches_category(product, &criteria.category))
            // Stage 2: Text search
            .filter(|product| matches_text_query(product, &query))
            // Stage 3: Location radius
            .filter(|product| match criteria.location {
                None => true,
                Some(center) => match check_radius(product, &center, criteria.radius_km) {
                    RadiusCheck::Inside => true,
                    RadiusCheck::Outside => false,
                    RadiusCheck::MissingLocation => {
                        missing_location += 1;
                        false
                    }
                },
            })
            .cloned()
            .collect();

        // Stage 4: Price sort (stable, ties keep their order)
        if criteria.price_order != PriceOrder::None {
            filtered.sort_by(|a, b| compare_prices(a.price, b.price, criteria.price_order));
        }

        if missing_location > 0 {
            tracing::debug!(
                "Excluded {} products without a location from radius filter",
                missing_location
            );
        }

        FilterResult {
            products: filtered,
            total_candidates,
            missing_location,
        }
    }

    /// Nudge products sharing a location apart for map display
    pub fn layout_markers(&self, products: &[Product]) -> Vec<Product> {
        self.layout.apply(products)
    }
}

/// Price ordering for the sort stage
///
/// NaN prices sort last in either direction, so the remaining prices stay
/// ordered.
fn compare_prices(a: f64, b: f64, order: PriceOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match order {
            PriceOrder::HighToLow => b.total_cmp(&a),
            _ => a.total_cmp(&b),
        },
    }
}

/// Filter and sort a product list; see [`Catalog::filter`]
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    Catalog::default().filter(products, criteria).products
}
