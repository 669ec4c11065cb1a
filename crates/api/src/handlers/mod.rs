pub mod auth;
pub mod donation;
pub mod profile;
pub mod users;
