//! Overpass QL query construction
//!
//! Every category is described by a small table of tag clauses. A clause
//! is a conjunction of tag filters; a category matches when any one of its
//! clauses does. The same table drives both the outbound query and the
//! classification of returned elements (see [`crate::map_category`]).

use std::collections::HashMap;

use domain::{GeoPoint, PoiCategory};

/// A single Overpass tag filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    /// `["key"="value"]`
    Equals(&'static str, &'static str),
    /// `["key"]`
    Exists(&'static str),
    /// `["key"~"text"]`, matched as a substring when classifying
    Contains(&'static str, &'static str),
}

impl TagFilter {
    /// Overpass QL rendering of the filter
    #[must_use]
    pub fn to_overpass(&self) -> String {
        match self {
            Self::Equals(key, value) => format!("[\"{key}\"=\"{value}\"]"),
            Self::Exists(key) => format!("[\"{key}\"]"),
            Self::Contains(key, text) => format!("[\"{key}\"~\"{text}\"]"),
        }
    }

    /// Check the filter against an element's tags
    #[must_use]
    pub fn matches(&self, tags: &HashMap<String, String>) -> bool {
        match self {
            Self::Equals(key, value) => tags.get(*key).is_some_and(|v| v == value),
            Self::Exists(key) => tags.contains_key(*key),
            Self::Contains(key, text) => tags.get(*key).is_some_and(|v| v.contains(text)),
        }
    }
}

/// Conjunction of tag filters
pub type TagClause = &'static [TagFilter];

use TagFilter::{Contains, Equals, Exists};

const NATIONAL_PARK: &[TagClause] = &[
    &[Equals("boundary", "national_park")],
    &[Equals("leisure", "park"), Exists("protection_title")],
    &[Equals("leisure", "nature_reserve"), Contains("name", "National")],
];

const STATE_PARK: &[TagClause] = &[
    &[Equals("leisure", "park"), Equals("park_type", "state_park")],
    &[Equals("leisure", "park"), Contains("name", "State Park")],
    &[Equals("boundary", "protected_area"), Equals("protect_class", "5")],
];

const CAMPING: &[TagClause] = &[
    &[Equals("tourism", "camp_site")],
    &[Equals("tourism", "caravan_site")],
    &[Equals("amenity", "camping")],
    &[Equals("tourism", "wilderness_hut")],
];

const DINING: &[TagClause] = &[
    &[Equals("amenity", "restaurant")],
    &[Equals("amenity", "cafe")],
    &[Equals("amenity", "fast_food")],
    &[Equals("amenity", "food_court")],
    &[Equals("amenity", "bar")],
    &[Equals("amenity", "pub")],
];

const ATTRACTION: &[TagClause] = &[
    &[Equals("tourism", "attraction")],
    &[Equals("tourism", "viewpoint")],
    &[Equals("tourism", "museum")],
    &[Equals("tourism", "theme_park")],
    &[Exists("historic")],
    &[Equals("natural", "peak")],
];

const LODGING: &[TagClause] = &[
    &[Equals("tourism", "hotel")],
    &[Equals("tourism", "motel")],
    &[Equals("tourism", "guest_house")],
    &[Equals("tourism", "hostel")],
    &[Equals("tourism", "apartment")],
    &[Equals("tourism", "resort")],
];

const FUEL: &[TagClause] = &[
    &[Equals("amenity", "fuel")],
    &[Equals("shop", "gas")],
    &[Equals("amenity", "charging_station")],
];

/// Tag clauses that select a category
#[must_use]
pub const fn clauses_for(category: PoiCategory) -> &'static [TagClause] {
    match category {
        PoiCategory::NationalPark => NATIONAL_PARK,
        PoiCategory::StatePark => STATE_PARK,
        PoiCategory::Camping => CAMPING,
        PoiCategory::Dining => DINING,
        PoiCategory::Attraction => ATTRACTION,
        PoiCategory::Lodging => LODGING,
        PoiCategory::Fuel => FUEL,
    }
}

/// Build the Overpass query for nodes within `radius_m` of `location`
///
/// Each distinct category contributes its clauses once, in the order the
/// categories were given. Output is the element body followed by a
/// skeleton recursion.
#[must_use]
pub fn build_query(
    location: &GeoPoint,
    radius_m: u32,
    categories: &[PoiCategory],
    timeout_secs: u64,
) -> String {
    let area = format!("(around:{radius_m},{},{})", location.lat(), location.lng());

    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    let mut seen = Vec::with_capacity(categories.len());

    for category in categories {
        if seen.contains(category) {
            continue;
        }
        seen.push(*category);

        for clause in clauses_for(*category) {
            let filters: String = clause.iter().map(TagFilter::to_overpass).collect();
            query.push_str(&format!("  node{filters}{area};\n"));
        }
    }

    query.push_str(");\nout body;\n>;\nout skel qt;");
    query
}
