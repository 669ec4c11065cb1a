//! FoodShare domain logic.
//!
//! Everything in this crate is pure: no database, no network, no clock
//! reads except where a `now` is passed in by the caller. The db, events
//! and api crates all build on these types.

pub mod category;
pub mod discovery;
pub mod donation;
pub mod enrichment;
pub mod error;
pub mod geo;
pub mod notification;
pub mod profile;
pub mod submission;
pub mod types;
