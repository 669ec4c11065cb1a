//! Repository for the `donations` table.

use foodshare_core::donation::DonationStatus;
use foodshare_core::types::DbId;
use sqlx::PgPool;

use crate::models::donation::{CreateDonation, Donation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, donor_id, title, description, category, items, expiry_days, \
                        status, latitude, longitude, address, contact_mobile, claimed_by, \
                        created_at, updated_at";

/// Provides persistence for donations. Rows are never deleted.
pub struct DonationRepo;

impl DonationRepo {
    /// Insert a new donation with status `available`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDonation) -> Result<Donation, sqlx::Error> {
        let query = format!(
            "INSERT INTO donations
                (donor_id, title, description, category, items, expiry_days,
                 latitude, longitude, address, contact_mobile)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(input.donor_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.items)
            .bind(input.expiry_days)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.address)
            .bind(&input.contact_mobile)
            .fetch_one(pool)
            .await
    }

    /// Find a donation by internal ID, regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All `available` donations, most recently created first.
    pub async fn list_available(pool: &PgPool) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations
             WHERE status = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(DonationStatus::Available.as_str())
            .fetch_all(pool)
            .await
    }

    /// Every donation submitted by `donor_id`, most recently created first.
    pub async fn list_by_donor(pool: &PgPool, donor_id: DbId) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations
             WHERE donor_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(donor_id)
            .fetch_all(pool)
            .await
    }

    /// Move a donation from `from` to `to`, recording the claimant if any.
    ///
    /// The update is conditional on the current status, so concurrent
    /// transitions cannot both succeed. Returns `None` if no row with the
    /// given `id` currently has status `from`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: DonationStatus,
        to: DonationStatus,
        claimed_by: Option<DbId>,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!(
            "UPDATE donations SET
                status = $3,
                claimed_by = COALESCE($4, claimed_by)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(claimed_by)
            .fetch_optional(pool)
            .await
    }
}
