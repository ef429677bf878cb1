//! Proximity ranking and the geolocation/reverse-geocoding collaborators.
//!
//! Collaborator failures never escape this module as core errors: a missing position
//! leaves reports in insertion order and a failed address lookup falls back to the
//! `"lat, lng"` display string.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Report};
use crate::error::AppError;
use crate::normalize::location::{coordinates_of, format_coordinates};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in kilometers.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

/// `"350m"` below one kilometer, `"2.3km"` otherwise.
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.1}km")
    }
}

pub fn distance_to(report: &Report, origin: Coordinates) -> Option<f64> {
    coordinates_of(&report.location).map(|c| distance_km(origin, c))
}

/// Ascending by distance from `origin`; reports without coordinates keep their relative
/// order after all located ones.
pub fn sort_by_distance(reports: &[Report], origin: Coordinates) -> Vec<Report> {
    let mut keyed = reports
        .iter()
        .map(|r| (distance_to(r, origin), r))
        .collect::<Vec<_>>();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Located reports within `radius_km` of `origin`, nearest first.
pub fn within_radius(reports: &[Report], origin: Coordinates, radius_km: f64) -> Vec<Report> {
    sort_by_distance(reports, origin)
        .into_iter()
        .filter(|r| distance_to(r, origin).is_some_and(|d| d <= radius_km))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionUnavailable {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unsupported,
}

impl fmt::Display for PositionUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PositionUnavailable::PermissionDenied => "location permission denied",
            PositionUnavailable::Unavailable => "location information unavailable",
            PositionUnavailable::Timeout => "location request timed out",
            PositionUnavailable::Unsupported => "location services not supported",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PositionUnavailable {}

pub trait Geolocator {
    fn current_position(&self) -> Result<Coordinates, PositionUnavailable>;
}

pub trait ReverseGeocoder {
    fn resolve_address(&self, at: Coordinates) -> Result<String, AppError>;
}

/// Geolocator that never has a position; ranking degrades to insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl Geolocator for NoGeolocation {
    fn current_position(&self) -> Result<Coordinates, PositionUnavailable> {
        Err(PositionUnavailable::Unsupported)
    }
}

/// Reverse geocoder used when no lookup service is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateFallback;

impl ReverseGeocoder for CoordinateFallback {
    fn resolve_address(&self, at: Coordinates) -> Result<String, AppError> {
        Ok(format_coordinates(at))
    }
}

/// Rank by distance from the current position, or keep insertion order without one.
pub fn rank_from(reports: &[Report], locator: &dyn Geolocator) -> Vec<Report> {
    match locator.current_position() {
        Ok(origin) => sort_by_distance(reports, origin),
        Err(reason) => {
            log::debug!("no reference position ({reason}); keeping insertion order");
            reports.to_vec()
        }
    }
}

/// Best-effort display address: the geocoder's answer, else `"lat, lng"`.
pub fn resolve_display_address(at: Coordinates, geocoder: &dyn ReverseGeocoder) -> String {
    match geocoder.resolve_address(at) {
        Ok(address) if !address.trim().is_empty() => address.trim().to_string(),
        Ok(_) => format_coordinates(at),
        Err(e) => {
            log::warn!("reverse geocoding failed, using coordinates: {e}");
            format_coordinates(at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_zero_for_same_point_and_symmetric() {
        let nyc = Coordinates::new(40.7128, -74.006);
        let delhi = Coordinates::new(28.6139, 77.209);
        assert!(distance_km(nyc, nyc).abs() < 1e-9);
        assert!((distance_km(nyc, delhi) - distance_km(delhi, nyc)).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodes_do_not_produce_nan() {
        let d = distance_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn distance_formatting_is_exact() {
        assert_eq!(format_distance(0.35), "350m");
        assert_eq!(format_distance(2.34), "2.3km");
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(1.0), "1.0km");
    }

    struct Failing;

    impl ReverseGeocoder for Failing {
        fn resolve_address(&self, _at: Coordinates) -> Result<String, AppError> {
            Err(AppError::new("GEOCODE_FAILED", "lookup failed"))
        }
    }

    #[test]
    fn failed_geocoding_falls_back_to_coordinates() {
        let at = Coordinates::new(40.7128, -74.006);
        assert_eq!(resolve_display_address(at, &Failing), "40.7128, -74.0060");
        assert_eq!(resolve_display_address(at, &CoordinateFallback), "40.7128, -74.0060");
    }
}
