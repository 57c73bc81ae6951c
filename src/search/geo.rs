//! Spherical-earth geometry: haversine distance and the bounding envelope
//! that pre-filters radius searches.
//!
//! Both functions use the same earth radius so that every point inside the
//! geodesic circle also falls inside its envelope.

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Slack added to envelope edges so that rounding never excludes a point
/// that the exact distance check would accept.
const ENVELOPE_EPSILON_DEG: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within the WGS84 coordinate ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Axis-aligned latitude/longitude rectangle, edges inclusive.
///
/// The operating region never straddles the antimeridian, so
/// `min_lon <= max_lon` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }

    /// Corners are valid coordinates and the rectangle has positive area.
    pub fn is_well_formed(&self) -> bool {
        GeoPoint::new(self.min_lat, self.min_lon).is_valid()
            && GeoPoint::new(self.max_lat, self.max_lon).is_valid()
            && self.min_lat < self.max_lat
            && self.min_lon < self.max_lon
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
            && self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
    }
}

/// Great-circle distance in kilometers (haversine formula).
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Smallest lat/lon rectangle that contains the circle of `radius_km`
/// around `center`.
///
/// Longitude half-width uses the tangent-meridian bound
/// `asin(sin(r) / cos(lat))`; when the circle reaches a pole the box spans
/// every longitude.
pub fn envelope(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat = center.latitude.to_radians();

    let mut min_lat = lat - angular;
    let mut max_lat = lat + angular;
    let (min_lon, max_lon);

    let pole = std::f64::consts::FRAC_PI_2;
    if min_lat > -pole && max_lat < pole {
        let dlon = (angular.sin() / lat.cos()).min(1.0).asin();
        let lon = center.longitude.to_radians();
        min_lon = (lon - dlon).to_degrees();
        max_lon = (lon + dlon).to_degrees();
    } else {
        min_lat = min_lat.max(-pole);
        max_lat = max_lat.min(pole);
        min_lon = -180.0;
        max_lon = 180.0;
    }

    BoundingBox {
        min_lat: (min_lat.to_degrees() - ENVELOPE_EPSILON_DEG).max(-90.0),
        max_lat: (max_lat.to_degrees() + ENVELOPE_EPSILON_DEG).min(90.0),
        min_lon: (min_lon - ENVELOPE_EPSILON_DEG).max(-180.0),
        max_lon: (max_lon + ENVELOPE_EPSILON_DEG).min(180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINSK: GeoPoint = GeoPoint::new(53.90, 27.56);

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_km(&MINSK, &MINSK), 0.0);
    }

    #[test]
    fn test_distance_minsk_brest() {
        // Brest is roughly 325 km from Minsk along the great circle.
        let brest = GeoPoint::new(52.0976, 23.7341);
        let d = haversine_km(&MINSK, &brest);
        assert!((d - 325.0).abs() < 3.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let other = GeoPoint::new(53.95, 27.70);
        let d1 = haversine_km(&MINSK, &other);
        let d2 = haversine_km(&other, &MINSK);
        assert!((d1 - d2).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_contains_circle_edge() {
        let radius = 5.0;
        let bbox = envelope(&MINSK, radius);

        // Sample points on (just inside) the circle in every direction.
        for step in 0..360 {
            let bearing = (step as f64).to_radians();
            let angular = (radius * 0.999_999) / EARTH_RADIUS_KM;
            let lat1 = MINSK.latitude.to_radians();
            let lon1 = MINSK.longitude.to_radians();
            let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
            let lon2 = lon1
                + (bearing.sin() * angular.sin() * lat1.cos())
                    .atan2(angular.cos() - lat1.sin() * lat2.sin());
            let p = GeoPoint::new(lat2.to_degrees(), lon2.to_degrees());

            assert!(haversine_km(&MINSK, &p) <= radius);
            assert!(bbox.contains(&p), "point at bearing {} escaped envelope", step);
        }
    }

    #[test]
    fn test_envelope_near_pole_spans_all_longitudes() {
        let bbox = envelope(&GeoPoint::new(89.99, 10.0), 50.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert_eq!(bbox.max_lat, 90.0);
    }

    #[test]
    fn test_bounding_box_well_formed() {
        assert!(BoundingBox::new(53.0, 54.0, 27.0, 28.0).is_well_formed());
        assert!(!BoundingBox::new(54.0, 53.0, 27.0, 28.0).is_well_formed());
        assert!(!BoundingBox::new(53.0, 53.0, 27.0, 28.0).is_well_formed());
        assert!(!BoundingBox::new(53.0, 54.0, 27.0, 190.0).is_well_formed());
    }

    #[test]
    fn test_point_validity() {
        assert!(MINSK.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
