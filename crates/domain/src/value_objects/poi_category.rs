//! Point-of-interest category value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of point-of-interest categories
///
/// Provider-specific tags are always mapped onto one of these variants;
/// anything unrecognised becomes [`PoiCategory::Attraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    /// National parks and similar federally protected areas
    NationalPark,
    /// State parks and regional protected areas
    StatePark,
    /// Campgrounds, RV parks and backcountry huts
    Camping,
    /// Restaurants, cafés and bars
    Dining,
    /// Sights, viewpoints, museums and landmarks
    Attraction,
    /// Hotels, motels and other overnight stays
    Lodging,
    /// Gas stations and EV charging
    Fuel,
}

impl PoiCategory {
    /// Every category, in declaration order
    pub const ALL: [Self; 7] = [
        Self::NationalPark,
        Self::StatePark,
        Self::Camping,
        Self::Dining,
        Self::Attraction,
        Self::Lodging,
        Self::Fuel,
    ];

    /// Categories searched when the caller does not choose any
    pub const DEFAULT_SEARCH: [Self; 4] = [
        Self::NationalPark,
        Self::Camping,
        Self::Dining,
        Self::Attraction,
    ];

    /// Wire name of the category (`national_park`, `dining`, ...)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NationalPark => "national_park",
            Self::StatePark => "state_park",
            Self::Camping => "camping",
            Self::Dining => "dining",
            Self::Attraction => "attraction",
            Self::Lodging => "lodging",
            Self::Fuel => "fuel",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NationalPark => "National Park",
            Self::StatePark => "State Park",
            Self::Camping => "Camping",
            Self::Dining => "Dining",
            Self::Attraction => "Attraction",
            Self::Lodging => "Lodging",
            Self::Fuel => "Fuel",
        }
    }

    /// Parse a list of category names, dropping the ones that are not known
    pub fn parse_lenient<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| name.as_ref().parse().ok())
            .collect()
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not part of the closed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown POI category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for PoiCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
