//! Notification formatting and Telegram delivery.

pub mod message;
pub mod telegram;

pub use message::{format_message, AlertConfig};
pub use telegram::{DeliveryOutcome, TelegramNotifier};
