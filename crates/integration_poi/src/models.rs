//! POI search parameters and Overpass response models

use std::collections::HashMap;

use domain::{GeoPoint, PoiCategory};
use serde::Deserialize;

/// Parameters of a POI discovery request
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSearch {
    /// Center of the search area
    pub location: GeoPoint,
    /// Radius in meters, the client default when `None`
    pub radius_m: Option<u32>,
    /// Categories to search, the starter set when `None`
    pub categories: Option<Vec<PoiCategory>>,
}

impl PoiSearch {
    /// Search around a point with default radius and categories
    #[must_use]
    pub const fn around(location: GeoPoint) -> Self {
        Self {
            location,
            radius_m: None,
            categories: None,
        }
    }

    /// Set the radius in meters
    #[must_use]
    pub const fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    /// Set the categories
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = PoiCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Categories to search, falling back to the starter set
    #[must_use]
    pub fn categories_or_default(&self) -> Vec<PoiCategory> {
        self.categories
            .clone()
            .unwrap_or_else(|| PoiCategory::DEFAULT_SEARCH.to_vec())
    }
}

// ============================================================================
// Raw Overpass response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawElement {
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let search = PoiSearch::around(GeoPoint::las_vegas());
        assert!(search.radius_m.is_none());
        assert_eq!(
            search.categories_or_default(),
            vec![
                PoiCategory::NationalPark,
                PoiCategory::Camping,
                PoiCategory::Dining,
                PoiCategory::Attraction
            ]
        );
    }

    #[test]
    fn test_search_builder() {
        let search = PoiSearch::around(GeoPoint::phoenix())
            .with_radius(2500)
            .with_categories([PoiCategory::Fuel]);
        assert_eq!(search.radius_m, Some(2500));
        assert_eq!(search.categories_or_default(), vec![PoiCategory::Fuel]);
    }

    #[test]
    fn test_explicit_empty_categories_are_kept() {
        let search = PoiSearch::around(GeoPoint::phoenix()).with_categories([]);
        assert!(search.categories_or_default().is_empty());
    }

    #[test]
    fn test_element_without_tags() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"version":0.6,"elements":[{"type":"node","id":42,"lat":36.1,"lon":-115.2}]}"#,
        )
        .unwrap();
        assert_eq!(response.elements.len(), 1);
        assert!(response.elements[0].tags.is_empty());
    }

    #[test]
    fn test_element_without_coordinates() {
        let response: OverpassResponse =
            serde_json::from_str(r#"{"elements":[{"type":"way","id":7,"nodes":[1,2]}]}"#).unwrap();
        assert!(response.elements[0].lat.is_none());
    }
}
