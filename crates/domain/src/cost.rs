//! Trip cost estimation

use serde::{Deserialize, Serialize};

use crate::entities::Route;
use crate::errors::DomainError;

/// Driving minutes per day before an overnight stop is assumed
pub const DRIVING_MINUTES_PER_DAY: f64 = 8.0 * 60.0;

/// Price and consumption assumptions for a trip estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostFactors {
    /// Fuel price in dollars per gallon
    pub fuel_price_per_gallon: f64,
    /// Vehicle fuel economy in miles per gallon
    pub mpg: f64,
    /// Lodging cost per night
    pub lodging_per_night: f64,
    /// Food budget per day
    pub meals_per_day: f64,
    /// Flat budget for park passes and entrance fees
    pub attraction_fees: f64,
}

impl CostFactors {
    /// Typical prices for a CA/NV/AZ/UT road trip
    #[must_use]
    pub const fn southwest() -> Self {
        Self {
            fuel_price_per_gallon: 4.5,
            mpg: 25.0,
            lodging_per_night: 150.0,
            meals_per_day: 75.0,
            attraction_fees: 100.0,
        }
    }
}

impl Default for CostFactors {
    fn default() -> Self {
        Self::southwest()
    }
}

/// Breakdown of an estimated trip cost, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Fuel for the whole distance
    pub fuel: f64,
    /// Lodging for every night between driving days
    pub lodging: f64,
    /// Meals for every driving day
    pub food: f64,
    /// Entrance fees
    pub attractions: f64,
    /// Number of driving days
    pub driving_days: u32,
}

impl CostEstimate {
    /// Total rounded to whole dollars
    #[must_use]
    pub fn total(&self) -> f64 {
        (self.fuel + self.lodging + self.food + self.attractions).round()
    }
}

/// Estimate the cost of driving a route
///
/// One night of lodging is assumed per eight hours of driving, except after
/// the last day.
///
/// # Errors
///
/// Returns `DomainError::ValidationError` if `mpg` is not positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_trip_cost(route: &Route, factors: &CostFactors) -> Result<CostEstimate, DomainError> {
    if factors.mpg <= 0.0 {
        return Err(DomainError::validation("mpg must be greater than 0"));
    }

    let fuel = route.distance / factors.mpg * factors.fuel_price_per_gallon;
    // Non-negative and far below u32::MAX for any real route
    let driving_days = (route.duration.max(0.0) / DRIVING_MINUTES_PER_DAY).ceil() as u32;
    let nights = driving_days.saturating_sub(1);

    Ok(CostEstimate {
        fuel,
        lodging: f64::from(nights) * factors.lodging_per_night,
        food: f64::from(driving_days) * factors.meals_per_day,
        attractions: factors.attraction_fees,
        driving_days,
    })
}
