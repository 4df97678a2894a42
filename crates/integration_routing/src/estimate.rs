//! Local route estimation
//!
//! Used whenever the directions API cannot produce a route. Distances are
//! great-circle distances between consecutive waypoints, durations assume a
//! constant average speed, and the geometry is the straight-line path
//! through the waypoints encoded with the same codec as provider geometry.

use domain::{GeoPoint, Route, Waypoint, ensure_routable};
use rand::Rng;

use crate::error::RoutingError;
use crate::polyline::encode_polyline;

/// Great-circle distance between two points in miles
#[must_use]
pub fn calculate_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    from.distance_miles(to)
}

/// Estimate a route through the waypoints without calling the provider
///
/// Distance and duration are summed per leg and rounded once at the end.
///
/// # Errors
///
/// Returns `RoutingError::Validation` if fewer than two waypoints are given.
pub fn estimate_route(
    waypoints: &[Waypoint],
    average_speed_mph: f64,
) -> Result<Route, RoutingError> {
    ensure_routable(waypoints)?;

    let (distance, duration) = waypoints
        .windows(2)
        .map(|leg| calculate_distance(&leg[0].position, &leg[1].position))
        .fold((0.0, 0.0), |(distance, duration), leg_miles| {
            (
                distance + leg_miles,
                duration + leg_miles / average_speed_mph * 60.0,
            )
        });

    let path: Vec<GeoPoint> = waypoints.iter().map(|w| w.position).collect();

    Route::new(
        waypoints.to_vec(),
        distance.round(),
        duration.round(),
        encode_polyline(&path),
    )
    .map_err(RoutingError::from)
}

/// Perturb a base route into a plausible alternative
///
/// Distance varies within ±5% and duration within ±10%, from independent
/// draws. The result gets a fresh id.
pub fn vary_route<R: Rng + ?Sized>(base: &Route, rng: &mut R) -> Route {
    let distance_factor = rng.random::<f64>().mul_add(0.1, 0.95);
    let duration_factor = rng.random::<f64>().mul_add(0.2, 0.9);

    base.variation(
        (base.distance * distance_factor).round(),
        (base.duration * duration_factor).round(),
    )
}
