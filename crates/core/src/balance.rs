//! Balance value produced by a retrieval attempt.

use crate::error::RetrievalError;

/// Remaining prepaid credit, in BDT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub amount: f64,
}

impl Balance {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

/// Outcome of exactly one retrieval attempt.
///
/// A successful result always carries a numeric amount; every failure
/// carries a classified reason with a diagnostic detail. Nothing else
/// escapes the retrieval stage.
pub type BalanceResult = Result<Balance, RetrievalError>;
