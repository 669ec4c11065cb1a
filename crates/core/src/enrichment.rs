//! Per-record enrichment: expiry timestamp, display distance, card image.
//!
//! Enrichment is a pure transform. A record whose expiry cannot be derived
//! is dropped from the output instead of failing the whole listing.

use chrono::Duration;
use serde::Serialize;

use crate::category::DonationCategory;
use crate::donation::DonationRecord;
use crate::geo::{Distance, GeoPoint};
use crate::types::Timestamp;

/// A donation plus the fields derived for display. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedDonation {
    #[serde(flatten)]
    pub record: DonationRecord,
    /// Parsed category; `None` when the stored label is unrecognised.
    #[serde(skip)]
    pub category: Option<DonationCategory>,
    pub expiry_timestamp: Timestamp,
    /// Distance from the caller's reference point, when both sides have
    /// coordinates.
    pub distance: Option<Distance>,
    pub image_url: &'static str,
}

/// `created_at + expiry_days` days.
///
/// Returns `None` for non-positive durations or timestamps that overflow.
pub fn expiry_timestamp(created_at: Timestamp, expiry_days: i32) -> Option<Timestamp> {
    if expiry_days <= 0 {
        return None;
    }
    let span = Duration::try_days(i64::from(expiry_days))?;
    created_at.checked_add_signed(span)
}

/// Enrich a single record. Returns `None` when the record is malformed.
pub fn enrich(record: DonationRecord, reference: Option<&GeoPoint>) -> Option<EnrichedDonation> {
    let expiry = expiry_timestamp(record.created_at, record.expiry_days)?;

    let distance = match (reference, record.location.as_ref()) {
        (Some(from), Some(to)) => Some(Distance::between(from, to)),
        _ => None,
    };

    let category = DonationCategory::from_label(&record.category);
    let image_url = DonationCategory::image_for_label(&record.category);

    Some(EnrichedDonation {
        record,
        category,
        expiry_timestamp: expiry,
        distance,
        image_url,
    })
}

/// Enrich every record, preserving order.
///
/// Returns the enriched records and the number of malformed records skipped.
pub fn enrich_all<I>(records: I, reference: Option<&GeoPoint>) -> (Vec<EnrichedDonation>, usize)
where
    I: IntoIterator<Item = DonationRecord>,
{
    let mut skipped = 0;
    let enriched = records
        .into_iter()
        .filter_map(|record| {
            let out = enrich(record, reference);
            if out.is_none() {
                skipped += 1;
            }
            out
        })
        .collect();
    (enriched, skipped)
}

/// Human label for how long until `expiry`, relative to `now`.
///
/// Hours are rounded to the nearest whole hour (halves round up).
pub fn time_remaining_label(expiry: Timestamp, now: Timestamp) -> String {
    let millis = (expiry - now).num_milliseconds() as f64;
    let hours = (millis / 3_600_000.0 + 0.5).floor() as i64;

    if hours < 0 {
        "Expired".to_string()
    } else if hours < 1 {
        "Less than 1 hour".to_string()
    } else if hours < 24 {
        format!("{hours} hours")
    } else {
        format!("{} days", hours / 24)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
