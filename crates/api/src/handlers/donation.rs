//! Handlers for the `/donations` resource.
//!
//! Listing and lookup are public. Submitting requires a signed-in user;
//! claiming requires a recipient and expiring requires the owning donor.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use foodshare_core::discovery::discover;
use foodshare_core::donation::{DonationRecord, DonationStatus};
use foodshare_core::enrichment::{
    enrich, enrich_all, expiry_timestamp, time_remaining_label, EnrichedDonation,
};
use foodshare_core::error::CoreError;
use foodshare_core::geo::GeoPoint;
use foodshare_core::notification::{
    DonationListedNotice, EVENT_DONATION_CLAIMED, EVENT_DONATION_EXPIRED, EVENT_DONATION_LISTED,
};
use foodshare_core::profile::UserType;
use foodshare_core::submission::DonationSubmission;
use foodshare_core::types::{DbId, Timestamp};
use foodshare_db::models::donation::{CreateDonation, Donation};
use foodshare_db::models::user::UpdateProfile;
use foodshare_db::repositories::{DonationRepo, UserRepo};
use foodshare_events::DomainEvent;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DiscoveryParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A donation as shown on a listing card.
#[derive(Debug, Serialize)]
pub struct DonationCard {
    #[serde(flatten)]
    pub donation: EnrichedDonation,
    /// e.g. `"5 hours"`, `"2 days"`, `"Expired"`.
    pub time_remaining: String,
}

impl DonationCard {
    fn new(donation: EnrichedDonation, now: Timestamp) -> Self {
        let time_remaining = time_remaining_label(donation.expiry_timestamp, now);
        Self {
            donation,
            time_remaining,
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// GET /api/v1/donations
///
/// Available donations filtered by category, text and radius, then sorted
/// by distance (default), expiry or recency, then capped by `limit`.
pub async fn list_donations(
    State(state): State<AppState>,
    Query(params): Query<DiscoveryParams>,
) -> AppResult<Json<DataResponse<Vec<DonationCard>>>> {
    let rows = DonationRepo::list_available(&state.pool).await?;
    let reference = params.reference_point();
    let query = params.to_query(state.config.default_search_radius_miles);

    let (enriched, skipped) = enrich_all(to_records(rows), reference.as_ref());
    if skipped > 0 {
        tracing::debug!(skipped, "Skipped donations with unusable expiry");
    }

    let now = Utc::now();
    let cards = discover(&enriched, &query)
        .into_iter()
        .map(|d| DonationCard::new(d, now))
        .collect();

    Ok(Json(DataResponse { data: cards }))
}

/// GET /api/v1/donations/{id}
///
/// A single donation in any status. Accepts the same `lat`/`lng` as the
/// listing to report a distance.
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DiscoveryParams>,
) -> AppResult<Json<DataResponse<DonationCard>>> {
    let row = find_donation(&state, id).await?;
    let record = DonationRecord::try_from(row)?;
    let reference = params.reference_point();

    let enriched = enrich(record, reference.as_ref()).ok_or_else(|| {
        AppError::InternalError(format!("Donation {id} has an unusable expiry"))
    })?;

    Ok(Json(DataResponse {
        data: DonationCard::new(enriched, Utc::now()),
    }))
}

/// GET /api/v1/donations/mine
///
/// Every donation the caller submitted, newest first, in any status.
pub async fn list_mine(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Donation>>>> {
    let rows = DonationRepo::list_by_donor(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/v1/donations
///
/// Validate and store a new donation, then queue the donor confirmation.
/// Nothing is written when validation fails.
pub async fn create_donation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<DonationSubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<Donation>>)> {
    let validated = input.validate(Utc::now())?;

    let donor = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let donation =
        DonationRepo::create(&state.pool, &CreateDonation::from_validated(donor.id, validated))
            .await?;

    tracing::info!(
        donation_id = donation.id,
        donor_id = donor.id,
        category = %donation.category,
        "Donation listed"
    );

    // The contact number on the listing becomes the donor's profile number.
    if let Some(mobile) = donation.contact_mobile.as_deref() {
        if donor.mobile.as_deref() != Some(mobile) {
            let update = UpdateProfile {
                full_name: None,
                mobile: Some(mobile.to_string()),
            };
            if let Err(e) = UserRepo::update_profile(&state.pool, donor.id, &update).await {
                tracing::warn!(error = %e, user_id = donor.id, "Failed to update donor mobile");
            }
        }
    }

    let notice = listed_notice(&donation, &donor.email, &donor.full_name);
    match serde_json::to_value(&notice) {
        Ok(payload) => state.event_bus.publish(
            DomainEvent::new(EVENT_DONATION_LISTED)
                .with_donation(donation.id)
                .with_actor(donor.id)
                .with_payload(payload),
        ),
        Err(e) => tracing::error!(error = %e, donation_id = donation.id, "Failed to encode notice"),
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/donations/{id}/claim
///
/// A recipient takes an available donation. Donors cannot claim their own.
pub async fn claim_donation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Donation>>> {
    auth_user.require(UserType::Recipient, "claim donations")?;

    let current = find_donation(&state, id).await?;
    if current.donor_id == auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot claim your own donation".into(),
        )));
    }

    let donation = transition(&state, current, DonationStatus::Claimed, Some(auth_user.user_id))
        .await?;

    tracing::info!(donation_id = id, recipient_id = auth_user.user_id, "Donation claimed");
    state.event_bus.publish(
        DomainEvent::new(EVENT_DONATION_CLAIMED)
            .with_donation(id)
            .with_actor(auth_user.user_id),
    );

    Ok(Json(DataResponse { data: donation }))
}

/// POST /api/v1/donations/{id}/expire
///
/// The owning donor withdraws an available donation.
pub async fn expire_donation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Donation>>> {
    let current = find_donation(&state, id).await?;
    if current.donor_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the donor can expire this donation".into(),
        )));
    }

    let donation = transition(&state, current, DonationStatus::Expired, None).await?;

    tracing::info!(donation_id = id, donor_id = auth_user.user_id, "Donation expired");
    state.event_bus.publish(
        DomainEvent::new(EVENT_DONATION_EXPIRED)
            .with_donation(id)
            .with_actor(auth_user.user_id),
    );

    Ok(Json(DataResponse { data: donation }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_donation(state: &AppState, id: DbId) -> AppResult<Donation> {
    DonationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Donation",
            id,
        }))
}

/// Check the transition against the current status, then apply it only if
/// the row still has that status.
async fn transition(
    state: &AppState,
    current: Donation,
    to: DonationStatus,
    claimed_by: Option<DbId>,
) -> AppResult<Donation> {
    let from: DonationStatus = current.status.parse()?;
    from.transition_to(to)?;

    DonationRepo::transition_status(&state.pool, current.id, from, to, claimed_by)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Donation is no longer available".into(),
            ))
        })
}

/// Convert rows, dropping any whose status is not recognised.
fn to_records(rows: Vec<Donation>) -> Vec<DonationRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match DonationRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::debug!(donation_id = id, error = %e, "Skipping malformed donation");
                    None
                }
            }
        })
        .collect()
}

fn listed_notice(donation: &Donation, donor_email: &str, donor_name: &str) -> DonationListedNotice {
    let expires_at =
        expiry_timestamp(donation.created_at, donation.expiry_days).unwrap_or(donation.created_at);

    let name = if donor_name.trim().is_empty() {
        donor_email
    } else {
        donor_name
    };

    DonationListedNotice {
        donation_id: donation.id,
        donor_email: donor_email.to_string(),
        donor_name: name.to_string(),
        title: donation.title.clone(),
        category: donation.category.clone(),
        items: donation.items.clone(),
        description: donation.description.clone().unwrap_or_default(),
        address: donation.address.clone(),
        location: GeoPoint::from_parts(donation.latitude, donation.longitude)
            .ok()
            .flatten(),
        contact_mobile: donation.contact_mobile.clone(),
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> Donation {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        Donation {
            id: 12,
            donor_id: 4,
            title: "Rolls".into(),
            description: Some("Fresh".into()),
            category: "Bakery".into(),
            items: vec!["Kaiser".into()],
            expiry_days: 2,
            status: "available".into(),
            latitude: Some(40.7),
            longitude: None,
            address: None,
            contact_mobile: Some("555-0199".into()),
            claimed_by: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn notice_uses_email_when_name_blank() {
        let notice = listed_notice(&row(), "d@example.com", "  ");
        assert_eq!(notice.donor_name, "d@example.com");
        assert_eq!(notice.expires_at, Utc.with_ymd_and_hms(2026, 5, 3, 9, 0, 0).unwrap());
        assert!(notice.location.is_none());
    }

    #[test]
    fn unknown_status_rows_are_dropped() {
        let mut bad = row();
        bad.status = "archived".into();
        let records = to_records(vec![row(), bad]);
        assert_eq!(records.len(), 1);
    }
}
