//! Tests for the great-circle distance math behind the nearby feed.

use mandi_core::GeoPoint;

/// The discovery radius the API uses.
const NEARBY_RADIUS_METERS: f64 = 150_000.0;

fn point(longitude: f64, latitude: f64) -> GeoPoint {
    GeoPoint::new(longitude, latitude).expect("valid coordinates")
}

#[test]
fn city_scale_distances_are_plausible() {
    // Pune city center to Pimpri-Chinchwad, roughly 15 km.
    let pune = point(73.8567, 18.5204);
    let pimpri = point(73.8037, 18.6298);

    let d = pune.distance_meters(&pimpri);
    assert!((10_000.0..20_000.0).contains(&d), "got {d}");
}

#[test]
fn radius_separates_local_from_distant_farms() {
    let buyer = point(73.8567, 18.5204); // Pune
    let nearby_farm = point(73.75, 18.65); // outskirts, ~20 km
    let nashik_farm = point(73.7898, 19.9975); // Nashik, ~165 km
    let delhi_farm = point(77.1025, 28.7041); // Delhi, ~1200 km

    assert!(buyer.distance_meters(&nearby_farm) <= NEARBY_RADIUS_METERS);
    assert!(buyer.distance_meters(&nashik_farm) > NEARBY_RADIUS_METERS);
    assert!(buyer.distance_meters(&delhi_farm) > NEARBY_RADIUS_METERS);
}

#[test]
fn distance_is_symmetric() {
    let a = point(73.8567, 18.5204);
    let b = point(77.1025, 28.7041);
    let forward = a.distance_meters(&b);
    let backward = b.distance_meters(&a);
    assert!((forward - backward).abs() < 1e-6);
}

#[test]
fn sorting_by_distance_orders_listings_nearest_first() {
    let buyer = point(73.8567, 18.5204);
    let mut farms = vec![
        ("nashik", point(73.7898, 19.9975)),
        ("next_door", point(73.86, 18.53)),
        ("satara", point(74.0183, 17.6805)),
    ];

    farms.sort_by(|a, b| {
        buyer
            .distance_meters(&a.1)
            .total_cmp(&buyer.distance_meters(&b.1))
    });

    let order: Vec<&str> = farms.iter().map(|(name, _)| *name).collect();
    assert_eq!(order, ["next_door", "satara", "nashik"]);
}
