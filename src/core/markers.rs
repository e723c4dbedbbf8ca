use std::collections::HashMap;
use std::f64::consts::PI;
use crate::models::Product;

/// Equatorial Earth radius in meters, used for marker offsets
pub const MARKER_EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Scale used to round coordinates to 6 decimal places (~0.11 m)
const KEY_SCALE: f64 = 1e6;

/// How duplicate markers are spread around their shared point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerLayout {
    /// Distance of each displaced marker from the original point
    pub radius_m: f64,
    /// Number of evenly spaced angles before positions repeat
    pub slots: u32,
}

impl Default for MarkerLayout {
    fn default() -> Self {
        Self {
            radius_m: 10.0,
            slots: 10,
        }
    }
}

impl MarkerLayout {
    /// Offset `(lat, lng)` for the `k`-th duplicate at a location
    ///
    /// `k = 0` is the first product at the location and is never moved.
    pub fn offset(&self, lat: f64, lng: f64, k: u32) -> (f64, f64) {
        if k == 0 {
            return (lat, lng);
        }

        let slots = self.slots.max(1) as f64;
        let angle = k as f64 * 2.0 * PI / slots;
        let dx = self.radius_m * angle.cos() / MARKER_EARTH_RADIUS_M;
        let dy = self.radius_m * angle.sin() / MARKER_EARTH_RADIUS_M;

        let new_lat = lat + dy * 180.0 / PI;
        let new_lng = lng + dx * 180.0 / PI / (lat * PI / 180.0).cos();

        (new_lat, new_lng)
    }

    /// Return a copy of `products` with overlapping markers nudged apart
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut seen: HashMap<(i64, i64), u32> = HashMap::new();

        products
            .iter()
            .map(|product| {
                let (Some(lat), Some(lng)) = (product.latitude, product.longitude) else {
                    return product.clone();
                };
                let Some(key) = location_key(lat, lng) else {
                    return product.clone();
                };

                let count = seen.entry(key).or_insert(0);
                let k = *count;
                *count += 1;

                if k == 0 {
                    return product.clone();
                }

                let (new_lat, new_lng) = self.offset(lat, lng, k);
                Product {
                    latitude: Some(new_lat),
                    longitude: Some(new_lng),
                    ..product.clone()
                }
            })
            .collect()
    }
}

/// Grouping key: coordinates rounded to 6 decimal places
///
/// Non-finite coordinates have no key.
#[inline]
fn location_key(lat: f64, lng: f64) -> Option<(i64, i64)> {
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some(((lat * KEY_SCALE).round() as i64, (lng * KEY_SCALE).round() as i64))
}

/// Spread products sharing a location on a 10 m circle so every pin stays visible
pub fn adjust_overlapping_markers(products: &[Product]) -> Vec<Product> {
    MarkerLayout::default().apply(products)
}
