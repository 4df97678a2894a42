//! Tag to category classification

use std::collections::HashMap;

use domain::PoiCategory;

use crate::query::clauses_for;

/// Classify an element by its tags
///
/// Categories are tried in a fixed precedence order (national park, state
/// park, camping, dining, attraction, lodging, fuel) and the first one with
/// a matching clause wins. Anything else is an attraction.
#[must_use]
pub fn map_category(tags: &HashMap<String, String>) -> PoiCategory {
    PoiCategory::ALL
        .into_iter()
        .find(|category| {
            clauses_for(*category)
                .iter()
                .any(|clause| clause.iter().all(|filter| filter.matches(tags)))
        })
        .unwrap_or(PoiCategory::Attraction)
}
