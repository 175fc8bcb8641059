//! Core data types for the DESCO balance bot.

pub mod balance;
pub mod error;

pub use balance::*;
pub use error::*;
