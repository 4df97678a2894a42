//! Route planning service
//!
//! Holds the waypoints being planned, the active route and any loaded
//! alternatives, and recalculates through a [`RoutingClient`] whenever the
//! waypoint list changes.

use std::{fmt, sync::Arc};

use domain::{MIN_ROUTE_WAYPOINTS, Route, Waypoint};
use integration_routing::RoutingClient;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;

/// Message recorded when routing is attempted with too few waypoints
pub const TOO_FEW_WAYPOINTS: &str = "At least 2 waypoints are required";

const SUMMARY_MPG: f64 = 25.0;
const SUMMARY_FUEL_PRICE: f64 = 3.5;

/// Snapshot of the route planner
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteState {
    /// Waypoints in travel order
    pub waypoints: Vec<Waypoint>,
    /// Currently displayed route
    pub route: Option<Route>,
    /// Alternatives from the last `load_alternatives`
    pub alternatives: Vec<Route>,
    /// A calculation is in flight
    pub is_loading: bool,
    /// Last error message, cleared by the next calculation
    pub error: Option<String>,
}

/// Figures shown next to the active route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Miles
    pub distance: f64,
    /// Minutes
    pub duration: f64,
    /// Number of planned waypoints
    pub waypoints: usize,
    /// Dollars, at 25 mpg and $3.50 per gallon
    pub estimated_fuel_cost: f64,
    /// Whole hours behind the wheel
    pub estimated_driving_hours: f64,
}

impl RouteSummary {
    /// Summarize a route (or the lack of one) for a waypoint count
    #[must_use]
    pub fn new(route: Option<&Route>, waypoints: usize) -> Self {
        let distance = route.map_or(0.0, |r| r.distance);
        let duration = route.map_or(0.0, |r| r.duration);

        Self {
            distance,
            duration,
            waypoints,
            estimated_fuel_cost: (distance / SUMMARY_MPG * SUMMARY_FUEL_PRICE).round(),
            estimated_driving_hours: (duration / 60.0).round(),
        }
    }
}

/// Service managing the route being planned
pub struct RoutePlanner {
    routing: Arc<dyn RoutingClient>,
    state: RwLock<RouteState>,
}

impl fmt::Debug for RoutePlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePlanner")
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl RoutePlanner {
    /// Create a planner with no waypoints
    pub fn new(routing: Arc<dyn RoutingClient>) -> Self {
        Self {
            routing,
            state: RwLock::new(RouteState::default()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RouteState {
        self.state.read().clone()
    }

    /// Summary of the active route
    pub fn summary(&self) -> RouteSummary {
        let state = self.state.read();
        RouteSummary::new(state.route.as_ref(), state.waypoints.len())
    }

    /// Replace the waypoints and calculate a route through them
    ///
    /// # Errors
    ///
    /// Returns a validation error, without calling the routing client, if
    /// fewer than two waypoints are given.
    #[instrument(skip(self, waypoints), fields(waypoints = waypoints.len()))]
    pub async fn calculate_route(&self, waypoints: Vec<Waypoint>) -> Result<Route, ApplicationError> {
        if waypoints.len() < MIN_ROUTE_WAYPOINTS {
            self.state.write().error = Some(TOO_FEW_WAYPOINTS.to_string());
            return Err(domain::DomainError::validation(TOO_FEW_WAYPOINTS).into());
        }

        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
            state.waypoints.clone_from(&waypoints);
        }

        let result = self.routing.calculate_route(&waypoints).await;

        let mut state = self.state.write();
        state.is_loading = false;
        match result {
            Ok(route) => {
                info!(
                    distance_mi = route.distance,
                    duration_min = route.duration,
                    "Route calculated"
                );
                state.route = Some(route.clone());
                Ok(route)
            },
            Err(e) => {
                warn!(error = %e, "Route calculation failed");
                state.error = Some(e.to_string());
                Err(e.into())
            },
        }
    }

    /// Load up to `max_alternatives` routes for the current waypoints
    ///
    /// Does nothing while fewer than two waypoints are planned.
    ///
    /// # Errors
    ///
    /// Returns the routing client's error, which is recorded in the state.
    #[instrument(skip(self))]
    pub async fn load_alternatives(&self, max_alternatives: usize) -> Result<Vec<Route>, ApplicationError> {
        let waypoints = {
            let mut state = self.state.write();
            if state.waypoints.len() < MIN_ROUTE_WAYPOINTS {
                debug!("Not enough waypoints for alternatives");
                return Ok(Vec::new());
            }
            state.is_loading = true;
            state.waypoints.clone()
        };

        let result = self
            .routing
            .route_alternatives(&waypoints, max_alternatives)
            .await;

        let mut state = self.state.write();
        state.is_loading = false;
        match result {
            Ok(alternatives) => {
                info!(count = alternatives.len(), "Route alternatives loaded");
                state.alternatives.clone_from(&alternatives);
                Ok(alternatives)
            },
            Err(e) => {
                warn!(error = %e, "Loading route alternatives failed");
                state.error = Some(e.to_string());
                Err(e.into())
            },
        }
    }

    /// Make one of the loaded alternatives the active route
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if no loaded alternative has
    /// the given id.
    pub fn select_alternative(&self, route_id: &str) -> Result<Route, ApplicationError> {
        let mut state = self.state.write();
        let route = state
            .alternatives
            .iter()
            .find(|r| r.id == route_id)
            .cloned()
            .ok_or_else(|| ApplicationError::NotFound(format!("route alternative {route_id}")))?;

        debug!(route_id, "Switched to alternative route");
        state.route = Some(route.clone());
        Ok(route)
    }

    /// Insert a waypoint (appended when `index` is `None` or past the end)
    /// and recalculate once two or more are planned
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn add_waypoint(
        &self,
        waypoint: Waypoint,
        index: Option<usize>,
    ) -> Result<Option<Route>, ApplicationError> {
        let waypoints = {
            let mut state = self.state.write();
            let at = index.map_or(state.waypoints.len(), |i| i.min(state.waypoints.len()));
            state.waypoints.insert(at, waypoint);
            state.waypoints.clone()
        };

        self.recalculate(waypoints).await
    }

    /// Remove a waypoint by id, recalculating or clearing the route
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn remove_waypoint(&self, waypoint_id: &str) -> Result<Option<Route>, ApplicationError> {
        let waypoints = {
            let mut state = self.state.write();
            state.waypoints.retain(|w| w.id != waypoint_id);
            if state.waypoints.len() < MIN_ROUTE_WAYPOINTS {
                state.route = None;
            }
            state.waypoints.clone()
        };

        self.recalculate(waypoints).await
    }

    /// Replace the waypoint order and recalculate
    ///
    /// # Errors
    ///
    /// Returns the error of the recalculation.
    pub async fn reorder_waypoints(&self, waypoints: Vec<Waypoint>) -> Result<Option<Route>, ApplicationError> {
        self.state.write().waypoints.clone_from(&waypoints);
        self.recalculate(waypoints).await
    }

    /// Forget waypoints, routes and errors
    pub fn clear(&self) {
        *self.state.write() = RouteState::default();
        debug!("Route cleared");
    }

    async fn recalculate(&self, waypoints: Vec<Waypoint>) -> Result<Option<Route>, ApplicationError> {
        if waypoints.len() < MIN_ROUTE_WAYPOINTS {
            return Ok(None);
        }
        self.calculate_route(waypoints).await.map(Some)
    }
}
