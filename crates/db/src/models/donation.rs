//! Donation entity model and DTOs.

use foodshare_core::donation::{DonationRecord, DonationStatus};
use foodshare_core::error::CoreError;
use foodshare_core::geo::GeoPoint;
use foodshare_core::submission::ValidatedDonation;
use foodshare_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `donations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub donor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Stored label; not guaranteed to be a known category.
    pub category: String,
    pub items: Vec<String>,
    pub expiry_days: i32,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub contact_mobile: Option<String>,
    pub claimed_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<Donation> for DonationRecord {
    type Error = CoreError;

    /// Fails only on an unknown status. Unusable coordinates become `None`.
    fn try_from(row: Donation) -> Result<Self, Self::Error> {
        let status: DonationStatus = row.status.parse()?;
        let location = GeoPoint::from_parts(row.latitude, row.longitude)
            .ok()
            .flatten();

        Ok(DonationRecord {
            id: row.id,
            donor_id: row.donor_id,
            title: row.title,
            description: row.description,
            category: row.category,
            items: row.items,
            created_at: row.created_at,
            expiry_days: row.expiry_days,
            status,
            location,
            address: row.address,
            contact_mobile: row.contact_mobile,
        })
    }
}

/// DTO for inserting a donation. New rows always start as `available`.
#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub donor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub items: Vec<String>,
    pub expiry_days: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub contact_mobile: Option<String>,
}

impl CreateDonation {
    pub fn from_validated(donor_id: DbId, input: ValidatedDonation) -> Self {
        Self {
            donor_id,
            title: input.title,
            description: Some(input.description),
            category: input.category.as_str().to_string(),
            items: input.items,
            expiry_days: input.expiry_days,
            latitude: input.location.map(|p| p.latitude),
            longitude: input.location.map(|p| p.longitude),
            address: input.address,
            contact_mobile: input.contact_mobile,
        }
    }
}
