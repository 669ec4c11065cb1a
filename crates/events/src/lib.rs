//! FoodShare event bus and notification delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`]: the event envelope published after a write commits.
//! - [`delivery`]: outbound channels (SMTP email).
//! - [`NotificationDispatcher`]: background task turning events into
//!   donor emails.

pub mod bus;
pub mod delivery;
pub mod dispatcher;

pub use bus::{DomainEvent, EventBus};
pub use delivery::email::{EmailConfig, EmailError, EmailMessage, Mailer, SmtpMailer};
pub use dispatcher::{DispatchError, NotificationDispatcher};
