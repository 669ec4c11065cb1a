//! Donor confirmation messages for newly listed donations.
//!
//! The message body is composed here so that it can be tested without a
//! mail transport; the events crate only delivers it.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::types::{DbId, Timestamp};

/// Event type published after a donation is persisted.
pub const EVENT_DONATION_LISTED: &str = "donation.listed";
pub const EVENT_DONATION_CLAIMED: &str = "donation.claimed";
pub const EVENT_DONATION_EXPIRED: &str = "donation.expired";

/// Everything needed to thank a donor for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationListedNotice {
    pub donation_id: DbId,
    /// Recipient address.
    pub donor_email: String,
    /// Greeting name; the email address when the profile has no name.
    pub donor_name: String,
    pub title: String,
    pub category: String,
    pub items: Vec<String>,
    pub description: String,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub contact_mobile: Option<String>,
    pub expires_at: Timestamp,
}

impl DonationListedNotice {
    pub fn subject(&self) -> String {
        format!("Your donation \"{}\" is listed", self.title)
    }

    /// Plain-text body sent to the donor.
    pub fn compose_message(&self) -> String {
        let location = match self.location {
            Some(p) => format!("{} at coordinates ({}, {})", self.category, p.latitude, p.longitude),
            None => format!("{} (no coordinates provided)", self.category),
        };

        format!(
            "Thank you for your food donation!\n\
             \n\
             Donation Details:\n\
             Title: {title}\n\
             Type: {category}\n\
             Items: {items}\n\
             Description: {description}\n\
             Address: {address}\n\
             Location: {location}\n\
             Contact: {contact}\n\
             Expiry: {expiry}\n\
             \n\
             Your generosity helps reduce food waste and supports our community!",
            title = self.title,
            category = self.category,
            items = self.items.join(", "),
            description = self.description,
            address = self.address.as_deref().unwrap_or("Not provided"),
            contact = self.contact_mobile.as_deref().unwrap_or("Not provided"),
            expiry = self.expires_at.format("%Y-%m-%d"),
        )
    }
}
