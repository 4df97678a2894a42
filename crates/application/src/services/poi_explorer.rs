//! POI exploration service
//!
//! Keeps the POIs discovered around the last search location, the user's
//! selection and the active category filter.

use std::{collections::BTreeMap, fmt, sync::Arc};

use domain::{GeoPoint, PoiCategory, PointOfInterest};
use integration_poi::{PoiClient, PoiSearch};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ApplicationError;

/// Search radius used when the caller gives none
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 10_000;

/// Categories searched and shown until the user picks others
pub const DEFAULT_ACTIVE_CATEGORIES: [PoiCategory; 3] = [
    PoiCategory::NationalPark,
    PoiCategory::Camping,
    PoiCategory::Dining,
];

/// Snapshot of the explorer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiState {
    /// Results of the last discovery
    pub discovered: Vec<PointOfInterest>,
    /// POIs picked by the user, unique by id
    pub selected: Vec<PointOfInterest>,
    /// Category filter applied to `discovered`
    pub active_categories: Vec<PoiCategory>,
    /// Center of the last search
    pub search_location: Option<GeoPoint>,
    /// Radius of the last search
    pub search_radius_m: u32,
    /// A discovery is in flight
    pub is_loading: bool,
    /// Last error message
    pub error: Option<String>,
}

impl Default for PoiState {
    fn default() -> Self {
        Self {
            discovered: Vec::new(),
            selected: Vec::new(),
            active_categories: DEFAULT_ACTIVE_CATEGORIES.to_vec(),
            search_location: None,
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            is_loading: false,
            error: None,
        }
    }
}

/// Service managing discovered and selected points of interest
pub struct PoiExplorer {
    pois: Arc<dyn PoiClient>,
    state: RwLock<PoiState>,
}

impl fmt::Debug for PoiExplorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PoiExplorer")
            .field("discovered", &state.discovered.len())
            .field("selected", &state.selected.len())
            .field("active_categories", &state.active_categories)
            .finish_non_exhaustive()
    }
}

impl PoiExplorer {
    /// Create an explorer with the default category filter
    pub fn new(pois: Arc<dyn PoiClient>) -> Self {
        Self {
            pois,
            state: RwLock::new(PoiState::default()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> PoiState {
        self.state.read().clone()
    }

    /// Discover POIs around a location, replacing previous results
    ///
    /// Missing radius and categories default to 10 km and national parks,
    /// camping and dining.
    ///
    /// # Errors
    ///
    /// Returns the POI client's error, which is recorded in the state.
    #[instrument(skip(self, search), fields(location = %search.location))]
    pub async fn discover(&self, search: PoiSearch) -> Result<Vec<PointOfInterest>, ApplicationError> {
        let radius_m = search.radius_m.unwrap_or(DEFAULT_SEARCH_RADIUS_M);
        let categories = search
            .categories
            .clone()
            .unwrap_or_else(|| DEFAULT_ACTIVE_CATEGORIES.to_vec());
        let search = search.with_radius(radius_m).with_categories(categories);

        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
            state.search_location = Some(search.location);
            state.search_radius_m = radius_m;
        }

        let result = self.pois.discover_pois(&search).await;

        let mut state = self.state.write();
        state.is_loading = false;
        match result {
            Ok(pois) => {
                info!(count = pois.len(), "POIs discovered");
                state.discovered.clone_from(&pois);
                Ok(pois)
            },
            Err(e) => {
                warn!(error = %e, "POI discovery failed");
                state.error = Some(e.to_string());
                Err(e.into())
            },
        }
    }

    /// Add a POI to the selection; selecting it again has no effect
    pub fn select(&self, poi: PointOfInterest) {
        let mut state = self.state.write();
        if !state.selected.iter().any(|p| p.id == poi.id) {
            debug!(poi_id = %poi.id, "POI selected");
            state.selected.push(poi);
        }
    }

    /// Remove a POI from the selection
    pub fn deselect(&self, poi_id: &str) {
        self.state.write().selected.retain(|p| p.id != poi_id);
    }

    /// Empty the selection
    pub fn clear_selection(&self) {
        self.state.write().selected.clear();
    }

    /// Replace the category filter
    pub fn set_categories(&self, categories: Vec<PoiCategory>) {
        self.state.write().active_categories = categories;
    }

    /// Turn a category on or off in the filter
    pub fn toggle_category(&self, category: PoiCategory) {
        let mut state = self.state.write();
        if let Some(pos) = state.active_categories.iter().position(|c| *c == category) {
            state.active_categories.remove(pos);
        } else {
            state.active_categories.push(category);
        }
    }

    /// Discovered POIs whose category is active
    pub fn filtered(&self) -> Vec<PointOfInterest> {
        let state = self.state.read();
        state
            .discovered
            .iter()
            .filter(|p| state.active_categories.contains(&p.category))
            .cloned()
            .collect()
    }

    /// Number of discovered POIs per category, every category present
    pub fn stats(&self) -> BTreeMap<PoiCategory, usize> {
        let mut stats: BTreeMap<PoiCategory, usize> =
            PoiCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        for poi in &self.state.read().discovered {
            *stats.entry(poi.category).or_default() += 1;
        }
        stats
    }

    /// Drop discovered POIs and the last error
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.discovered.clear();
        state.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integration_poi::PoiError;
    use mockall::mock;

    mock! {
        pub Pois {}

        #[async_trait::async_trait]
        impl PoiClient for Pois {
            async fn discover_pois(&self, search: &PoiSearch) -> Result<Vec<PointOfInterest>, PoiError>;
        }
    }

    fn poi(id: &str, category: PoiCategory) -> PointOfInterest {
        PointOfInterest {
            id: id.to_string(),
            name: format!("POI {id}"),
            lat: 36.1,
            lng: -115.1,
            category,
            rating: Some(4.2),
            description: None,
            website: None,
        }
    }

    fn sample_pois() -> Vec<PointOfInterest> {
        vec![
            poi("1", PoiCategory::NationalPark),
            poi("2", PoiCategory::Dining),
            poi("3", PoiCategory::Dining),
            poi("4", PoiCategory::Fuel),
        ]
    }

    fn explorer_with_results() -> PoiExplorer {
        let mut mock = MockPois::new();
        mock.expect_discover_pois()
            .returning(|_| Ok(sample_pois()));
        PoiExplorer::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn discover_applies_defaults() {
        let mut mock = MockPois::new();
        mock.expect_discover_pois()
            .withf(|search| {
                search.radius_m == Some(DEFAULT_SEARCH_RADIUS_M)
                    && search.categories.as_deref() == Some(&DEFAULT_ACTIVE_CATEGORIES[..])
            })
            .times(1)
            .returning(|_| Ok(sample_pois()));
        let explorer = PoiExplorer::new(Arc::new(mock));

        let pois = explorer
            .discover(PoiSearch::around(GeoPoint::las_vegas()))
            .await
            .unwrap();

        assert_eq!(pois.len(), 4);
        let state = explorer.state();
        assert_eq!(state.discovered, pois);
        assert_eq!(state.search_location, Some(GeoPoint::las_vegas()));
        assert_eq!(state.search_radius_m, DEFAULT_SEARCH_RADIUS_M);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn discover_keeps_explicit_parameters() {
        let mut mock = MockPois::new();
        mock.expect_discover_pois()
            .withf(|search| {
                search.radius_m == Some(50_000)
                    && search.categories.as_deref() == Some(&[PoiCategory::Fuel][..])
            })
            .returning(|_| Ok(Vec::new()));
        let explorer = PoiExplorer::new(Arc::new(mock));

        let search = PoiSearch::around(GeoPoint::phoenix())
            .with_radius(50_000)
            .with_categories([PoiCategory::Fuel]);
        explorer.discover(search).await.unwrap();

        assert_eq!(explorer.state().search_radius_m, 50_000);
    }

    #[tokio::test]
    async fn discover_error_is_recorded() {
        let mut mock = MockPois::new();
        mock.expect_discover_pois()
            .returning(|_| Err(PoiError::Validation("search radius must be greater than 0 meters".to_string())));
        let explorer = PoiExplorer::new(Arc::new(mock));

        let err = explorer
            .discover(PoiSearch::around(GeoPoint::phoenix()).with_radius(0))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(explorer.state().error.unwrap().contains("radius"));
    }

    #[tokio::test]
    async fn filtered_uses_active_categories() {
        let explorer = explorer_with_results();
        explorer
            .discover(PoiSearch::around(GeoPoint::las_vegas()))
            .await
            .unwrap();

        // national park, camping, dining
        assert_eq!(explorer.filtered().len(), 3);

        explorer.toggle_category(PoiCategory::Dining);
        assert_eq!(explorer.filtered().len(), 1);

        explorer.toggle_category(PoiCategory::Fuel);
        let ids: Vec<String> = explorer.filtered().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["1", "4"]);

        explorer.set_categories(vec![]);
        assert!(explorer.filtered().is_empty());
    }

    #[tokio::test]
    async fn stats_cover_every_category() {
        let explorer = explorer_with_results();
        explorer
            .discover(PoiSearch::around(GeoPoint::las_vegas()))
            .await
            .unwrap();

        let stats = explorer.stats();
        assert_eq!(stats.len(), 7);
        assert_eq!(stats[&PoiCategory::Dining], 2);
        assert_eq!(stats[&PoiCategory::Fuel], 1);
        assert_eq!(stats[&PoiCategory::Lodging], 0);
    }

    #[test]
    fn select_is_idempotent() {
        let explorer = PoiExplorer::new(Arc::new(MockPois::new()));

        explorer.select(poi("1", PoiCategory::Camping));
        explorer.select(poi("1", PoiCategory::Camping));
        explorer.select(poi("2", PoiCategory::Dining));
        assert_eq!(explorer.state().selected.len(), 2);

        explorer.deselect("1");
        assert_eq!(explorer.state().selected[0].id, "2");

        explorer.clear_selection();
        assert!(explorer.state().selected.is_empty());
    }

    #[tokio::test]
    async fn clear_drops_results_but_keeps_selection() {
        let explorer = explorer_with_results();
        explorer
            .discover(PoiSearch::around(GeoPoint::las_vegas()))
            .await
            .unwrap();
        explorer.select(poi("9", PoiCategory::Lodging));

        explorer.clear();

        let state = explorer.state();
        assert!(state.discovered.is_empty());
        assert_eq!(state.selected.len(), 1);
    }
}
