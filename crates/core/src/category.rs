//! Donation categories.
//!
//! The set of categories is closed. Adding one is a compile-visible change:
//! every lookup below is an exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;

/// The kind of donor offering a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DonationCategory {
    Bakery,
    Restaurant,
    Grocery,
    Individual,
}

/// Category shown for stored rows whose label is not recognised.
pub const FALLBACK_DISPLAY_CATEGORY: DonationCategory = DonationCategory::Bakery;

/// Category preselected on the submission form.
pub const DEFAULT_SUBMISSION_CATEGORY: DonationCategory = DonationCategory::Restaurant;

impl DonationCategory {
    pub const ALL: [DonationCategory; 4] = [
        DonationCategory::Bakery,
        DonationCategory::Restaurant,
        DonationCategory::Grocery,
        DonationCategory::Individual,
    ];

    /// Canonical label, as stored in the `donations.category` column.
    pub fn as_str(self) -> &'static str {
        match self {
            DonationCategory::Bakery => "Bakery",
            DonationCategory::Restaurant => "Restaurant",
            DonationCategory::Grocery => "Grocery",
            DonationCategory::Individual => "Individual",
        }
    }

    /// Stock image used on donation cards.
    pub fn image_url(self) -> &'static str {
        match self {
            DonationCategory::Bakery => {
                "https://images.unsplash.com/photo-1509440159596-0249088772ff?auto=format&fit=crop&w=1740&q=80"
            }
            DonationCategory::Restaurant => {
                "https://images.unsplash.com/photo-1579684947550-22e945225d9a?auto=format&fit=crop&w=1740&q=80"
            }
            DonationCategory::Grocery => {
                "https://images.unsplash.com/photo-1610348725531-843dff563e2c?auto=format&fit=crop&w=1740&q=80"
            }
            DonationCategory::Individual => {
                "https://images.unsplash.com/photo-1592419391068-9bd09e10990d?auto=format&fit=crop&w=1740&q=80"
            }
        }
    }

    /// Map position used when a donor opts into the category default
    /// instead of supplying coordinates.
    pub fn default_location(self) -> GeoPoint {
        match self {
            DonationCategory::Bakery => GeoPoint::new(40.712776, -74.005974),
            DonationCategory::Restaurant => GeoPoint::new(40.715076, -74.009974),
            DonationCategory::Grocery => GeoPoint::new(40.710776, -74.002974),
            DonationCategory::Individual => GeoPoint::new(40.713776, -74.006974),
        }
    }

    /// Lenient lookup for stored labels: unknown values resolve to `None`
    /// rather than failing.
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }

    /// Image for a stored label, falling back to the default category image.
    pub fn image_for_label(label: &str) -> &'static str {
        Self::from_label(label)
            .unwrap_or(FALLBACK_DISPLAY_CATEGORY)
            .image_url()
    }
}

impl FromStr for DonationCategory {
    type Err = CoreError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::Validation(format!("Unknown donation category: '{needle}'")))
    }
}

impl fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("bakery".parse::<DonationCategory>().unwrap(), DonationCategory::Bakery);
        assert_eq!(" GROCERY ".parse::<DonationCategory>().unwrap(), DonationCategory::Grocery);
        assert_eq!(
            "Individual".parse::<DonationCategory>().unwrap(),
            DonationCategory::Individual
        );
    }

    #[test]
    fn unknown_label_is_an_error_but_lenient_lookup_is_none() {
        assert!("Cafeteria".parse::<DonationCategory>().is_err());
        assert_eq!(DonationCategory::from_label("Cafeteria"), None);
    }

    #[test]
    fn unknown_label_falls_back_to_bakery_image() {
        assert_eq!(
            DonationCategory::image_for_label("Cafeteria"),
            DonationCategory::Bakery.image_url()
        );
        assert_eq!(
            DonationCategory::image_for_label("Grocery"),
            DonationCategory::Grocery.image_url()
        );
    }

    #[test]
    fn labels_round_trip_through_display() {
        for category in DonationCategory::ALL {
            assert_eq!(category.to_string().parse::<DonationCategory>().unwrap(), category);
        }
    }

    #[test]
    fn serde_uses_canonical_labels() {
        let json = serde_json::to_string(&DonationCategory::Restaurant).unwrap();
        assert_eq!(json, "\"Restaurant\"");
    }
}
