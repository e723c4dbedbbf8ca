// Unit tests for Harvest Map

use harvest_map::core::{
    distance::{distance_meters, haversine_distance, is_within_radius},
    filters::{check_radius, matches_category, matches_text_query, RadiusCheck},
    markers::{adjust_overlapping_markers, MarkerLayout},
};
use harvest_map::models::{Category, CategoryFilter, GeoPoint, Product};

fn product(id: i64, name: &str, category: Category, address: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> Product {
    Product {
        product_id: id,
        name: name.to_string(),
        category,
        price: 10.0,
        address: address.map(str::to_string),
        latitude: lat,
        longitude: lng,
        available: true,
    }
}

#[test]
fn test_distance_zero() {
    let distance = distance_meters(20.0, 80.0, 20.0, 80.0);
    assert_eq!(distance, 0.0);
}

#[test]
fn test_distance_symmetry() {
    let points = [
        (20.0, 80.0),
        (25.0, 85.0),
        (-33.8688, 151.2093),
        (51.5074, -0.1278),
        (0.0, 179.9),
    ];

    for &(lat1, lon1) in &points {
        for &(lat2, lon2) in &points {
            let ab = distance_meters(lat1, lon1, lat2, lon2);
            let ba = distance_meters(lat2, lon2, lat1, lon1);
            assert!((ab - ba).abs() < 1e-6, "Asymmetric: {} vs {}", ab, ba);
        }
    }
}

#[test]
fn test_distance_matches_geo_crate() {
    use geo::{HaversineDistance, Point};

    let pune = (18.5204, 73.8567);
    let nagpur = (21.1458, 79.0882);

    let ours = distance_meters(pune.0, pune.1, nagpur.0, nagpur.1);
    let theirs = Point::new(pune.1, pune.0).haversine_distance(&Point::new(nagpur.1, nagpur.0));

    // geo uses the 6371008.8 m mean radius
    let relative = ((ours - theirs) / theirs).abs();
    assert!(relative < 1e-5, "ours={} geo={}", ours, theirs);
}

#[test]
fn test_kilometers_and_meters_agree() {
    let km = haversine_distance(20.0, 80.0, 25.0, 85.0);
    let m = distance_meters(20.0, 80.0, 25.0, 85.0);
    assert!((m / 1000.0 - km).abs() < 1e-9);
}

#[test]
fn test_within_radius_boundary() {
    let d = distance_meters(20.0, 80.0, 20.05, 80.05);
    let radius_km = d / 1000.0;

    assert!(is_within_radius(20.0, 80.0, 20.05, 80.05, radius_km + 1e-9));
    assert!(!is_within_radius(20.0, 80.0, 20.05, 80.05, radius_km - 1e-6));
}

#[test]
fn test_category_stage_is_exact() {
    let mango = product(1, "Mango", Category::Fruits, None, None, None);

    assert!(matches_category(&mango, &CategoryFilter::All));
    assert!(matches_category(&mango, &CategoryFilter::Only(Category::Fruits)));
    assert!(!matches_category(&mango, &CategoryFilter::Only(Category::DryFruits)));
}

#[test]
fn test_text_stage_case_insensitive() {
    let saffron = product(1, "Kashmiri Saffron", Category::HerbsAndSpices, Some("Pampore, J&K"), None, None);

    assert!(matches_text_query(&saffron, "saffron"));
    assert!(matches_text_query(&saffron, "spices"));
    assert!(matches_text_query(&saffron, "pampore"));
    assert!(!matches_text_query(&saffron, "almond"));
}

#[test]
fn test_radius_stage_outcomes() {
    let center = GeoPoint::new(20.0, 80.0);

    let here = product(1, "A", Category::Fruits, None, Some(20.0), Some(80.0));
    let far = product(2, "B", Category::Fruits, None, Some(25.0), Some(85.0));
    let nowhere = product(3, "C", Category::Fruits, None, None, Some(85.0));

    assert_eq!(check_radius(&here, &center, 10.0), RadiusCheck::Inside);
    assert_eq!(check_radius(&far, &center, 10.0), RadiusCheck::Outside);
    assert_eq!(check_radius(&nowhere, &center, 10.0), RadiusCheck::MissingLocation);
}

#[test]
fn test_dedup_preserves_size() {
    for n in [0usize, 1, 2, 5, 25] {
        let products: Vec<Product> = (0..n)
            .map(|i| product(i as i64, "P", Category::Vegetables, None, Some(20.0), Some(80.0)))
            .collect();

        assert_eq!(adjust_overlapping_markers(&products).len(), n);
    }
}

#[test]
fn test_dedup_first_wins_per_group() {
    let products = vec![
        product(1, "A", Category::Fruits, None, Some(20.0), Some(80.0)),
        product(2, "B", Category::Fruits, None, Some(25.0), Some(85.0)),
        product(3, "C", Category::Fruits, None, Some(20.0), Some(80.0)),
        product(4, "D", Category::Fruits, None, Some(25.0), Some(85.0)),
    ];

    let adjusted = adjust_overlapping_markers(&products);

    assert_eq!(adjusted[0].latitude, Some(20.0));
    assert_eq!(adjusted[0].longitude, Some(80.0));
    assert_eq!(adjusted[1].latitude, Some(25.0));
    assert_eq!(adjusted[1].longitude, Some(85.0));
    assert_ne!(adjusted[2].latitude, Some(20.0));
    assert_ne!(adjusted[3].latitude, Some(25.0));
}

#[test]
fn test_dedup_other_fields_untouched() {
    let products = vec![
        product(1, "A", Category::Fruits, Some("Nashik"), Some(20.0), Some(80.0)),
        product(2, "B", Category::DairyProducts, Some("Anand"), Some(20.0), Some(80.0)),
    ];

    let adjusted = adjust_overlapping_markers(&products);

    assert_eq!(adjusted[1].product_id, 2);
    assert_eq!(adjusted[1].name, "B");
    assert_eq!(adjusted[1].category, Category::DairyProducts);
    assert_eq!(adjusted[1].address.as_deref(), Some("Anand"));
}

#[test]
fn test_marker_offset_at_high_latitude() {
    let layout = MarkerLayout::default();

    // k = 10 lands back at angle 0 (due east); longitude stretches with latitude
    let (lat, lng) = layout.offset(60.0, 10.0, 10);
    let d = distance_meters(60.0, 10.0, lat, lng);

    assert!((d - 10.0).abs() < 0.1, "Expected ~10m, got {}", d);
}
