//! Donation discovery: filter, search and sort over enriched records.
//!
//! [`discover`] is a pure function of its inputs. It never mutates the input
//! slice and uses a stable sort, so identical inputs always produce an
//! identical output order.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::DonationCategory;
use crate::enrichment::EnrichedDonation;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sort key
// ---------------------------------------------------------------------------

/// Ordering applied to discovery results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Nearest first; records without a distance go last.
    #[default]
    Distance,
    /// Soonest-expiring first.
    Expiry,
    /// Newest listing first.
    Recent,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Distance => "distance",
            SortKey::Expiry => "expiry",
            SortKey::Recent => "recent",
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortKey::Distance),
            "expiry" => Ok(SortKey::Expiry),
            "recent" => Ok(SortKey::Recent),
            other => Err(CoreError::Validation(format!("Unknown sort key: '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Category-filter spellings that mean "no filter".
const NO_FILTER_LABELS: &[&str] = &["", "all", "none"];

/// A fully-resolved discovery configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryQuery {
    pub category: Option<DonationCategory>,
    /// Trimmed and lowercased search text; empty means no text filter.
    search_text: String,
    pub sort_key: SortKey,
    /// Optional radius. Records with an unknown distance are kept.
    pub max_distance_miles: Option<f64>,
    /// Cap on the number of results, applied after sorting.
    pub limit: Option<usize>,
}

impl DiscoveryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: DonationCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_search(mut self, text: &str) -> Self {
        self.search_text = text.trim().to_lowercase();
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Set a radius. Non-finite or non-positive values are ignored.
    pub fn with_max_distance(mut self, miles: f64) -> Self {
        if miles.is_finite() && miles > 0.0 {
            self.max_distance_miles = Some(miles);
        }
        self
    }

    /// Keep at most `limit` results. Zero is ignored.
    pub fn with_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.limit = Some(limit);
        }
        self
    }

    /// Build a query from raw, possibly malformed request values.
    ///
    /// Unrecognised category or sort values fall back to their defaults
    /// (no filter, distance) rather than failing the request.
    pub fn from_raw(
        category: Option<&str>,
        search: Option<&str>,
        sort: Option<&str>,
        max_distance_miles: Option<f64>,
    ) -> Self {
        let mut query = Self::new();

        if let Some(raw) = category {
            let trimmed = raw.trim();
            if !NO_FILTER_LABELS
                .iter()
                .any(|label| label.eq_ignore_ascii_case(trimmed))
            {
                if let Some(parsed) = DonationCategory::from_label(trimmed) {
                    query = query.with_category(parsed);
                }
            }
        }

        if let Some(text) = search {
            query = query.with_search(text);
        }

        if let Some(sort_key) = sort.and_then(|raw| raw.parse().ok()) {
            query = query.with_sort(sort_key);
        }

        if let Some(miles) = max_distance_miles {
            query = query.with_max_distance(miles);
        }

        query
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whether a record passes every filter predicate.
    pub fn matches(&self, donation: &EnrichedDonation) -> bool {
        self.matches_category(donation) && self.matches_text(donation) && self.within_radius(donation)
    }

    fn matches_category(&self, donation: &EnrichedDonation) -> bool {
        match self.category {
            None => true,
            Some(wanted) => donation.category == Some(wanted),
        }
    }

    fn matches_text(&self, donation: &EnrichedDonation) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.as_str();
        donation.record.title.to_lowercase().contains(needle)
            || donation
                .record
                .items
                .iter()
                .any(|item| item.to_lowercase().contains(needle))
    }

    fn within_radius(&self, donation: &EnrichedDonation) -> bool {
        match (self.max_distance_miles, donation.distance) {
            (Some(limit), Some(distance)) => distance.value <= limit,
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter and order `donations` according to `query`.
pub fn discover(donations: &[EnrichedDonation], query: &DiscoveryQuery) -> Vec<EnrichedDonation> {
    let mut selected: Vec<EnrichedDonation> = donations
        .iter()
        .filter(|d| query.matches(d))
        .cloned()
        .collect();

    // `sort_by` is stable: equal keys keep their input order.
    match query.sort_key {
        SortKey::Distance => selected.sort_by(compare_distance),
        SortKey::Expiry => selected.sort_by(|a, b| a.expiry_timestamp.cmp(&b.expiry_timestamp)),
        SortKey::Recent => selected.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at)),
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }

    selected
}

fn compare_distance(a: &EnrichedDonation, b: &EnrichedDonation) -> Ordering {
    match (a.distance, b.distance) {
        (Some(x), Some(y)) => x.value.total_cmp(&y.value),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
