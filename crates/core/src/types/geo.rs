//! Geolocation point type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, used for great-circle distance.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Errors that can occur when constructing a [`GeoPoint`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum GeoError {
    /// Longitude outside [-180, 180].
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Latitude outside [-90, 90].
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Not a finite number.
    #[error("coordinates must be finite numbers")]
    NotFinite,
    /// GeoJSON payload with a type other than "Point".
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),
}

/// A well-formed (longitude, latitude) pair.
///
/// Serializes as a GeoJSON Point, matching the wire format clients send on
/// registration:
///
/// ```json
/// { "type": "Point", "coordinates": [77.1, 28.6] }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Construct a point, validating coordinate ranges.
    ///
    /// # Errors
    ///
    /// Returns a `GeoError` if either coordinate is non-finite or out of
    /// range.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Great-circle (haversine) distance to another point, in metres.
    ///
    /// This mirrors the SQL expression the listing store uses for nearby
    /// queries, so tests can cross-check ordering against the database.
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_METERS * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

/// GeoJSON wire representation of a point.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    /// `[longitude, latitude]`
    coordinates: [f64; 2],
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(GeoError::UnsupportedGeometry(value.kind));
        }
        let [longitude, latitude] = value.coordinates;
        Self::new(longitude, latitude)
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point".to_owned(),
            coordinates: [point.longitude, point.latitude],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_ranges() {
        assert!(GeoPoint::new(77.1, 28.6).is_ok());
        assert!(matches!(
            GeoPoint::new(181.0, 0.0),
            Err(GeoError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -91.0),
            Err(GeoError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(GeoError::NotFinite)
        ));
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(77.1, 28.6).unwrap();
        assert!(p.distance_meters(&p) < f64::EPSILON);
    }

    #[test]
    fn test_distance_delhi_region() {
        // 0.1 degrees of longitude at latitude 28.6 is roughly 9.8 km,
        // comfortably inside the 150 km nearby radius.
        let farm = GeoPoint::new(77.1, 28.6).unwrap();
        let buyer = GeoPoint::new(77.2, 28.6).unwrap();
        let d = farm.distance_meters(&buyer);
        assert!(d > 9_000.0 && d < 11_000.0, "distance was {d}");
    }

    #[test]
    fn test_distance_symmetric() {
        let a = GeoPoint::new(72.88, 19.07).unwrap(); // Mumbai
        let b = GeoPoint::new(77.21, 28.61).unwrap(); // Delhi
        let ab = a.distance_meters(&b);
        let ba = b.distance_meters(&a);
        assert!((ab - ba).abs() < 1e-6);
        // Mumbai-Delhi is about 1,150 km as the crow flies.
        assert!(ab > 1_100_000.0 && ab < 1_200_000.0, "distance was {ab}");
    }

    #[test]
    fn test_geojson_roundtrip() {
        let p = GeoPoint::new(77.1, 28.6).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"type":"Point","coordinates":[77.1,28.6]}"#);
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_geojson_rejects_non_point() {
        let err = serde_json::from_str::<GeoPoint>(
            r#"{"type":"Polygon","coordinates":[0.0,0.0]}"#,
        );
        assert!(err.is_err());
    }
}
