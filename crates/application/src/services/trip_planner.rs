//! Trip planning service
//!
//! Owns the trip being edited. Every waypoint change recalculates the
//! route and the estimated cost.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{CostEstimate, CostFactors, MIN_ROUTE_WAYPOINTS, Route, Waypoint, estimate_trip_cost};
use integration_routing::RoutingClient;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApplicationError;

const DEFAULT_TRIP_NAME: &str = "My Southwest Adventure";
const DEFAULT_TRIP_DESCRIPTION: &str = "A new journey through the American Southwest";

/// A planned road trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Unique trip identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Stops in travel order
    pub waypoints: Vec<Waypoint>,
    /// Route through the waypoints, once there are at least two
    pub route: Option<Route>,
    /// Estimated total cost in whole dollars
    pub estimated_cost: f64,
    /// When the trip was created
    pub created_at: DateTime<Utc>,
    /// When the trip was last changed
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Create an empty trip
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: format!("trip_{}", Uuid::new_v4().simple()),
            name: DEFAULT_TRIP_NAME.to_string(),
            description: DEFAULT_TRIP_DESCRIPTION.to_string(),
            waypoints: Vec::new(),
            route: None,
            estimated_cost: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Trip {
    fn default() -> Self {
        Self::new()
    }
}

struct TripState {
    trip: Trip,
    cost_factors: CostFactors,
    is_loading: bool,
}

/// Service managing the trip being planned
pub struct TripPlanner {
    routing: Arc<dyn RoutingClient>,
    state: RwLock<TripState>,
}

impl fmt::Debug for TripPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("TripPlanner")
            .field("trip_id", &state.trip.id)
            .field("cost_factors", &state.cost_factors)
            .finish_non_exhaustive()
    }
}

impl TripPlanner {
    /// Start planning a new trip with southwest cost factors
    pub fn new(routing: Arc<dyn RoutingClient>) -> Self {
        Self::with_trip(routing, Trip::new())
    }

    /// Continue planning an existing trip
    pub fn with_trip(routing: Arc<dyn RoutingClient>, trip: Trip) -> Self {
        Self {
            routing,
            state: RwLock::new(TripState {
                trip,
                cost_factors: CostFactors::southwest(),
                is_loading: false,
            }),
        }
    }

    /// Snapshot of the trip
    pub fn trip(&self) -> Trip {
        self.state.read().trip.clone()
    }

    /// Cost factors in use
    pub fn cost_factors(&self) -> CostFactors {
        self.state.read().cost_factors
    }

    /// Whether a recalculation is in flight
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    /// Itemized cost of the current route, if there is one
    ///
    /// # Errors
    ///
    /// Returns a validation error if the cost factors are unusable.
    pub fn cost_breakdown(&self) -> Result<Option<CostEstimate>, ApplicationError> {
        let state = self.state.read();
        state
            .trip
            .route
            .as_ref()
            .map(|route| estimate_trip_cost(route, &state.cost_factors))
            .transpose()
            .map_err(Into::into)
    }

    /// Append a waypoint
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn add_waypoint(&self, waypoint: Waypoint) -> Result<Trip, ApplicationError> {
        let mut waypoints = self.state.read().trip.waypoints.clone();
        waypoints.push(waypoint);
        self.recalculate(waypoints).await
    }

    /// Remove a waypoint by id
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn remove_waypoint(&self, waypoint_id: &str) -> Result<Trip, ApplicationError> {
        let mut waypoints = self.state.read().trip.waypoints.clone();
        waypoints.retain(|w| w.id != waypoint_id);
        self.recalculate(waypoints).await
    }

    /// Replace the waypoint order
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn reorder_waypoints(&self, waypoints: Vec<Waypoint>) -> Result<Trip, ApplicationError> {
        self.recalculate(waypoints).await
    }

    /// Remove every waypoint
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the recalculation path.
    pub async fn clear_waypoints(&self) -> Result<Trip, ApplicationError> {
        self.recalculate(Vec::new()).await
    }

    /// Change the trip's name and/or description
    pub fn update_details(&self, name: Option<String>, description: Option<String>) -> Trip {
        let mut state = self.state.write();
        if let Some(name) = name {
            state.trip.name = name;
        }
        if let Some(description) = description {
            state.trip.description = description;
        }
        state.trip.updated_at = Utc::now();
        state.trip.clone()
    }

    /// Use new cost factors and re-estimate the current route
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the previous factors in place,
    /// if `mpg` is not positive.
    pub fn update_cost_factors(&self, factors: CostFactors) -> Result<Trip, ApplicationError> {
        if factors.mpg <= 0.0 {
            return Err(domain::DomainError::validation("mpg must be greater than 0").into());
        }

        let mut state = self.state.write();
        let estimated_cost = total_cost(state.trip.route.as_ref(), &factors)?;

        state.cost_factors = factors;
        state.trip.estimated_cost = estimated_cost;
        state.trip.updated_at = Utc::now();
        debug!(estimated_cost, "Cost factors updated");
        Ok(state.trip.clone())
    }

    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    async fn recalculate(&self, waypoints: Vec<Waypoint>) -> Result<Trip, ApplicationError> {
        let route = if waypoints.len() >= MIN_ROUTE_WAYPOINTS {
            self.state.write().is_loading = true;
            let result = self.routing.calculate_route(&waypoints).await;
            self.state.write().is_loading = false;
            Some(result?)
        } else {
            None
        };

        let mut state = self.state.write();
        let estimated_cost = total_cost(route.as_ref(), &state.cost_factors)?;

        state.trip.waypoints = waypoints;
        state.trip.route = route;
        state.trip.estimated_cost = estimated_cost;
        state.trip.updated_at = Utc::now();

        info!(
            waypoints = state.trip.waypoints.len(),
            estimated_cost, "Trip recalculated"
        );
        Ok(state.trip.clone())
    }
}

fn total_cost(route: Option<&Route>, factors: &CostFactors) -> Result<f64, ApplicationError> {
    match route {
        Some(route) => Ok(estimate_trip_cost(route, factors)?.total()),
        None => Ok(0.0),
    }
}
