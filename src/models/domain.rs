use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Produce category, as stored by the marketplace backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Vegetables,
    Fruits,
    DairyProducts,
    HerbsAndSpices,
    DryFruits,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Vegetables,
        Category::Fruits,
        Category::DairyProducts,
        Category::HerbsAndSpices,
        Category::DryFruits,
    ];

    /// Wire name of the category (`dairyProducts`, `herbsAndSpices`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetables => "vegetables",
            Category::Fruits => "fruits",
            Category::DairyProducts => "dairyProducts",
            Category::HerbsAndSpices => "herbsAndSpices",
            Category::DryFruits => "dryFruits",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Category names are internal enum values, so matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category selector for filtering; `"All"` on the wire disables the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl TryFrom<String> for CategoryFilter {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(category) => category.as_str().to_string(),
        }
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both values lie within terrestrial ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Marketplace product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub name: String,
    pub category: Category,
    pub price: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl Product {
    /// Location of the product, if both coordinates are present
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

fn default_true() -> bool { true }

/// Price ordering applied as the last filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceOrder {
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

/// User-selected constraints for narrowing a product list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(rename = "nameQuery", default)]
    pub name_query: String,
    #[serde(rename = "priceOrder", default)]
    pub price_order: PriceOrder,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(rename = "radiusKm", default = "default_radius_km")]
    pub radius_km: f64,
}

pub fn default_radius_km() -> f64 { 10.0 }

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            name_query: String::new(),
            price_order: PriceOrder::None,
            location: None,
            radius_km: default_radius_km(),
        }
    }
}

impl FilterCriteria {
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = query.into();
        self
    }

    pub fn with_price_order(mut self, order: PriceOrder) -> Self {
        self.price_order = order;
        self
    }

    pub fn within(mut self, location: GeoPoint, radius_km: f64) -> Self {
        self.location = Some(location);
        self.radius_km = radius_km;
        self
    }
}

/// Identity of the caller, passed explicitly to anything that talks to the
/// marketplace backend on their behalf
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// True when no identity at all is attached to the caller
    pub fn is_anonymous(&self) -> bool {
        self.token.is_none() && self.user_id.is_none()
    }
}
