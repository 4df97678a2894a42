//! Local POI generation
//!
//! Produces representative points of interest around a location when the
//! Overpass service is unavailable.

use domain::{GeoPoint, PoiCategory, PointOfInterest};
use rand::Rng;
use uuid::Uuid;

const MOCK_DESCRIPTION: &str = "A must-see for any Southwest roadtripper.";
const MOCK_WEBSITE: &str = "https://example.com/southwest-poi";

/// Degrees a mock POI may be offset from the search center on each axis
pub const MOCK_JITTER_DEGREES: f64 = 0.05;

/// Well-known places used to name mock POIs
#[must_use]
pub const fn mock_names(category: PoiCategory) -> &'static [&'static str] {
    match category {
        PoiCategory::NationalPark => &["Red Rock Canyon", "Valley of Fire", "Death Valley"],
        PoiCategory::StatePark => &["Antelope Canyon", "Goblin Valley", "Valley of the Gods"],
        PoiCategory::Camping => &[
            "Desert Oasis Campground",
            "Starlight Mesa",
            "Cactus Flats RV Park",
        ],
        PoiCategory::Dining => &["Southwest Grill", "Route 66 Diner", "Canyon Coffee House"],
        PoiCategory::Attraction => &["Hoover Dam", "Area 51 Gateway", "Meteor Crater"],
        PoiCategory::Lodging => &["The Oasis Motel", "Desert Rose Inn", "Canyon View Lodge"],
        PoiCategory::Fuel => &["Last Chance Gas", "Desert Fuel Stop", "Route 66 Gas & Go"],
    }
}

fn mock_name(category: PoiCategory, index: usize) -> String {
    mock_names(category)
        .get(index)
        .map_or_else(|| format!("Generic {category}"), |name| (*name).to_string())
}

/// Generate `per_category` mock POIs for each category, in order
pub fn mock_pois<R: Rng + ?Sized>(
    location: &GeoPoint,
    categories: &[PoiCategory],
    per_category: usize,
    rng: &mut R,
) -> Vec<PointOfInterest> {
    let batch = Uuid::new_v4().simple().to_string();
    let mut pois = Vec::with_capacity(categories.len() * per_category);

    for (i, category) in categories.iter().enumerate() {
        for j in 0..per_category {
            let lat = (rng.random::<f64>() - 0.5).mul_add(2.0 * MOCK_JITTER_DEGREES, location.lat());
            let lng = (rng.random::<f64>() - 0.5).mul_add(2.0 * MOCK_JITTER_DEGREES, location.lng());
            let rating = (rng.random::<f64>().mul_add(2.0, 3.0) * 10.0).round() / 10.0;

            pois.push(PointOfInterest {
                id: format!("poi_{}_{i}_{j}", &batch[..12]),
                name: mock_name(*category, j),
                lat,
                lng,
                category: *category,
                rating: Some(rating),
                description: Some(MOCK_DESCRIPTION.to_string()),
                website: Some(MOCK_WEBSITE.to_string()),
            });
        }
    }

    pois
}
