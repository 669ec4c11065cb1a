//! Donation records and their status lifecycle.
//!
//! A record is created once as `available` and moves to `claimed` or
//! `expired`. Both of those are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Claimed,
    Expired,
}

impl DonationStatus {
    /// Value stored in the `donations.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            DonationStatus::Available => "available",
            DonationStatus::Claimed => "claimed",
            DonationStatus::Expired => "expired",
        }
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        matches!(
            (self, next),
            (DonationStatus::Available, DonationStatus::Claimed)
                | (DonationStatus::Available, DonationStatus::Expired)
        )
    }

    /// Check a transition, producing a conflict error when it is illegal.
    pub fn transition_to(self, next: DonationStatus) -> Result<DonationStatus, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Donation cannot move from '{self}' to '{next}'"
            )))
        }
    }
}

impl FromStr for DonationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(DonationStatus::Available),
            "claimed" => Ok(DonationStatus::Claimed),
            "expired" => Ok(DonationStatus::Expired),
            other => Err(CoreError::Validation(format!(
                "Unknown donation status: '{other}'"
            ))),
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DonationRecord
// ---------------------------------------------------------------------------

/// A donation as read from the store.
///
/// `category` keeps the stored label verbatim; unrecognised labels are
/// tolerated and only affect display (see
/// [`DonationCategory::image_for_label`](crate::category::DonationCategory::image_for_label)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRecord {
    pub id: DbId,
    pub donor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub items: Vec<String>,
    pub created_at: Timestamp,
    pub expiry_days: i32,
    pub status: DonationStatus,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub contact_mobile: Option<String>,
}
