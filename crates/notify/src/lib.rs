//! Notification channels for stock alerts.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Telegram and email notifier implementations
//! - Minijinja template rendering for the alert subject and body
//! - Dispatcher that fans a notification out to every configured channel

pub mod dispatcher;
pub mod email;
pub mod telegram;
pub mod templating;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use traits::{DispatchResult, Notification, Notifier, NotifyError};
