//! Donation submission validation.
//!
//! [`DonationSubmission::validate`] runs every guard before the store is
//! touched and reports all violations in a single error.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::category::{DonationCategory, DEFAULT_SUBMISSION_CATEGORY};
use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Items as sent by a client: either a JSON list or one comma-separated
/// string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for ItemsInput {
    fn default() -> Self {
        ItemsInput::List(Vec::new())
    }
}

impl ItemsInput {
    /// Trimmed, non-blank entries in input order.
    pub fn normalized(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ItemsInput::List(items) => items.iter().map(String::as_str).collect(),
            ItemsInput::Text(text) => text.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Expiry as sent by a client: a full RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` date, which means midnight UTC of that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpiryInput {
    At(Timestamp),
    Date(NaiveDate),
    /// Anything else; reported as a validation violation.
    Text(String),
}

impl ExpiryInput {
    /// The moment this input names, or `None` for unparseable text.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            ExpiryInput::At(at) => Some(*at),
            ExpiryInput::Date(date) => Some(date.and_time(NaiveTime::MIN).and_utc()),
            ExpiryInput::Text(_) => None,
        }
    }
}

impl From<Timestamp> for ExpiryInput {
    fn from(at: Timestamp) -> Self {
        ExpiryInput::At(at)
    }
}

/// Postal address pieces entered on the submission form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressParts {
    /// `"{street}, {city}, {state} {zip}"`, or `None` when every part is
    /// blank.
    pub fn format(&self) -> Option<String> {
        let street = self.street.trim();
        let city = self.city.trim();
        let state = self.state.trim();
        let zip = self.zip.trim();

        if [street, city, state, zip].iter().all(|s| s.is_empty()) {
            return None;
        }
        let region = format!("{state} {zip}");
        Some(format!("{street}, {city}, {}", region.trim()))
    }
}

/// A donation as submitted by a donor, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Category label; omitted means the form default.
    pub category: Option<String>,
    #[serde(default)]
    pub items: ItemsInput,
    pub expiry: Option<ExpiryInput>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Use the category's default coordinates when none are supplied.
    #[serde(default)]
    pub use_default_location: bool,
    pub address: Option<AddressParts>,
    pub mobile: Option<String>,
}

/// A submission that passed every guard and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDonation {
    pub title: String,
    pub description: String,
    pub category: DonationCategory,
    pub items: Vec<String>,
    pub expiry_days: i32,
    pub location: Option<GeoPoint>,
    pub address: Option<String>,
    pub contact_mobile: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Whole days from `now` until `expiry`, rounded up.
///
/// A moment already passed (or exactly now) yields a value `<= 0`.
pub fn expiry_days_until(expiry: Timestamp, now: Timestamp) -> i64 {
    let day_ms = Duration::days(1).num_milliseconds();
    let diff_ms = (expiry - now).num_milliseconds();
    let whole = diff_ms.div_euclid(day_ms);
    if diff_ms.rem_euclid(day_ms) > 0 {
        whole + 1
    } else {
        whole
    }
}

impl DonationSubmission {
    /// Check every guard. On failure the error lists each violation,
    /// separated by `"; "`.
    pub fn validate(&self, now: Timestamp) -> Result<ValidatedDonation, CoreError> {
        let mut errors: Vec<String> = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("Title is required".to_string());
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.push("Description is required".to_string());
        }

        let items = self.items.normalized();
        if items.is_empty() {
            errors.push("At least one item is required".to_string());
        }

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => Some(DEFAULT_SUBMISSION_CATEGORY),
            Some(label) => match label.parse::<DonationCategory>() {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.push(error_text(e));
                    None
                }
            },
        };

        let expiry_days = match self.expiry.as_ref().map(ExpiryInput::timestamp) {
            None => {
                errors.push("Expiry date is required".to_string());
                None
            }
            Some(None) => {
                errors.push("Expiry date is not a valid date".to_string());
                None
            }
            Some(Some(expiry)) => {
                let days = expiry_days_until(expiry, now);
                if days <= 0 {
                    errors.push("Expiry date must be in the future".to_string());
                    None
                } else {
                    match i32::try_from(days) {
                        Ok(d) => Some(d),
                        Err(_) => {
                            errors.push("Expiry date is too far in the future".to_string());
                            None
                        }
                    }
                }
            }
        };

        let location = match GeoPoint::from_parts(self.latitude, self.longitude) {
            Ok(Some(point)) => Some(point),
            Ok(None) if self.use_default_location => category.map(|c| c.default_location()),
            Ok(None) => None,
            Err(e) => {
                errors.push(error_text(e));
                None
            }
        };

        let contact_mobile = self
            .mobile
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        match (category, expiry_days) {
            (Some(category), Some(expiry_days)) if errors.is_empty() => Ok(ValidatedDonation {
                title: title.to_string(),
                description: description.to_string(),
                category,
                items,
                expiry_days,
                location,
                address: self.address.as_ref().and_then(AddressParts::format),
                contact_mobile,
            }),
            _ => Err(CoreError::Validation(errors.join("; "))),
        }
    }
}

fn error_text(err: CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 6, 10, 8, 0, 0).unwrap()
    }

    fn valid() -> DonationSubmission {
        DonationSubmission {
            title: "Day-old bread".to_string(),
            description: "Assorted loaves".to_string(),
            category: Some("Bakery".to_string()),
            items: ItemsInput::Text("Sourdough, Rye ,  ,Baguette".to_string()),
            expiry: Some((now() + Duration::hours(30)).into()),
            ..Default::default()
        }
    }

    fn validation_message(result: Result<ValidatedDonation, CoreError>) -> String {
        match result {
            Err(CoreError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    // -- expiry ---------------------------------------------------------------

    #[test]
    fn expiry_days_round_up() {
        assert_eq!(expiry_days_until(now() + Duration::hours(30), now()), 2);
        assert_eq!(expiry_days_until(now() + Duration::days(1), now()), 1);
        assert_eq!(expiry_days_until(now() + Duration::minutes(1), now()), 1);
        assert_eq!(expiry_days_until(now(), now()), 0);
        assert_eq!(expiry_days_until(now() - Duration::hours(5), now()), 0);
        assert_eq!(expiry_days_until(now() - Duration::hours(30), now()), -1);
    }

    #[test]
    fn zero_expiry_days_is_rejected() {
        let mut sub = valid();
        sub.expiry = Some(now().into());
        let msg = validation_message(sub.validate(now()));
        assert!(msg.contains("Expiry date must be in the future"), "{msg}");
    }

    #[test]
    fn missing_expiry_is_rejected() {
        let mut sub = valid();
        sub.expiry = None;
        let msg = validation_message(sub.validate(now()));
        assert!(msg.contains("Expiry date is required"), "{msg}");
    }

    #[test]
    fn expiry_deserializes_from_timestamp_or_date() {
        let at: ExpiryInput = serde_json::from_str(r#""2026-06-12T17:30:00Z""#).unwrap();
        assert_eq!(
            at.timestamp(),
            Some(Utc.with_ymd_and_hms(2026, 6, 12, 17, 30, 0).unwrap())
        );

        let date: ExpiryInput = serde_json::from_str(r#""2026-06-12""#).unwrap();
        assert_matches!(date, ExpiryInput::Date(_));
        assert_eq!(
            date.timestamp(),
            Some(Utc.with_ymd_and_hms(2026, 6, 12, 0, 0, 0).unwrap())
        );

        let text: ExpiryInput = serde_json::from_str(r#""next week""#).unwrap();
        assert_eq!(text.timestamp(), None);
    }

    #[test]
    fn date_only_expiry_counts_from_midnight_utc() {
        let mut sub = valid();
        // 2026-06-12T00:00Z is 40 hours after now().
        sub.expiry = Some(ExpiryInput::Date(NaiveDate::from_ymd_opt(2026, 6, 12).unwrap()));
        assert_eq!(sub.validate(now()).unwrap().expiry_days, 2);

        // Today's midnight has already passed.
        sub.expiry = Some(ExpiryInput::Date(NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()));
        let msg = validation_message(sub.validate(now()));
        assert!(msg.contains("Expiry date must be in the future"), "{msg}");
    }

    #[test]
    fn unparseable_expiry_is_a_violation() {
        let mut sub = valid();
        sub.expiry = Some(ExpiryInput::Text("soon".into()));
        let msg = validation_message(sub.validate(now()));
        assert!(msg.contains("Expiry date is not a valid date"), "{msg}");
    }

    // -- fields ---------------------------------------------------------------

    #[test]
    fn valid_submission_normalizes_fields() {
        let v = valid().validate(now()).unwrap();
        assert_eq!(v.title, "Day-old bread");
        assert_eq!(v.category, DonationCategory::Bakery);
        assert_eq!(v.items, vec!["Sourdough", "Rye", "Baguette"]);
        assert_eq!(v.expiry_days, 2);
        assert_eq!(v.location, None);
        assert_eq!(v.address, None);
    }

    #[test]
    fn items_accept_a_list() {
        let mut sub = valid();
        sub.items = ItemsInput::List(vec![" Apples ".into(), "".into(), "Pears".into()]);
        assert_eq!(sub.validate(now()).unwrap().items, vec!["Apples", "Pears"]);
    }

    #[test]
    fn items_deserialize_from_string_or_list() {
        let text: ItemsInput = serde_json::from_str("\"a, b\"").unwrap();
        assert_eq!(text.normalized(), vec!["a", "b"]);
        let list: ItemsInput = serde_json::from_str("[\"a\", \" b \"]").unwrap();
        assert_eq!(list.normalized(), vec!["a", "b"]);
    }

    #[test]
    fn all_violations_are_reported() {
        let sub = DonationSubmission {
            title: "  ".to_string(),
            items: ItemsInput::Text(" , ".to_string()),
            latitude: Some(10.0),
            ..Default::default()
        };
        let msg = validation_message(sub.validate(now()));
        assert!(msg.contains("Title is required"), "{msg}");
        assert!(msg.contains("Description is required"), "{msg}");
        assert!(msg.contains("At least one item is required"), "{msg}");
        assert!(msg.contains("Expiry date is required"), "{msg}");
        assert!(msg.contains("latitude and longitude must be provided together"), "{msg}");
    }

    // -- category -------------------------------------------------------------

    #[test]
    fn missing_category_defaults_to_restaurant() {
        let mut sub = valid();
        sub.category = None;
        assert_eq!(sub.validate(now()).unwrap().category, DonationCategory::Restaurant);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut sub = valid();
        sub.category = Some("Cafeteria".to_string());
        assert_matches!(sub.validate(now()), Err(CoreError::Validation(_)));
    }

    // -- location -------------------------------------------------------------

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut sub = valid();
        sub.latitude = Some(95.0);
        sub.longitude = Some(0.0);
        assert_matches!(sub.validate(now()), Err(CoreError::Validation(_)));
    }

    #[test]
    fn explicit_coordinates_win_over_default() {
        let mut sub = valid();
        sub.latitude = Some(41.0);
        sub.longitude = Some(-73.0);
        sub.use_default_location = true;
        assert_eq!(sub.validate(now()).unwrap().location, Some(GeoPoint::new(41.0, -73.0)));
    }

    #[test]
    fn default_location_follows_category() {
        let mut sub = valid();
        sub.category = Some("grocery".to_string());
        sub.use_default_location = true;
        assert_eq!(
            sub.validate(now()).unwrap().location,
            Some(DonationCategory::Grocery.default_location())
        );
    }

    // -- address --------------------------------------------------------------

    #[test]
    fn address_is_formatted() {
        let parts = AddressParts {
            street: "12 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
        };
        assert_eq!(parts.format().as_deref(), Some("12 Main St, Springfield, IL 62701"));
        assert_eq!(AddressParts::default().format(), None);
    }

    #[test]
    fn blank_mobile_is_dropped() {
        let mut sub = valid();
        sub.mobile = Some("   ".to_string());
        assert_eq!(sub.validate(now()).unwrap().contact_mobile, None);
        sub.mobile = Some(" 555-0100 ".to_string());
        assert_eq!(sub.validate(now()).unwrap().contact_mobile.as_deref(), Some("555-0100"));
    }
}
