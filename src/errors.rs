//! Unified error type for Budget Buddy.
//!
//! Every fallible operation in the crate returns [`Result`]. Aggregation functions never
//! fail; service and checkout operations surface storage failures and validation errors
//! through the variants below.

use std::fmt;
use thiserror::Error;

/// The step of a grocery checkout that failed before anything was recorded.
///
/// A failure after the list was completed is reported as [`Error::PartialCompletion`]
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Marking the grocery list as completed with its paid total
    CompleteList,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompleteList => write!(f, "mark grocery list completed"),
        }
    }
}

/// Errors produced by Budget Buddy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The persistence layer rejected a query or write
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An amount was negative, zero where not allowed, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Input failed validation (empty names, bad quantities, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// A referenced row does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of row that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A grocery list has been checked out and is read-only
    #[error("Grocery list {list_id} is already completed")]
    ListCompleted {
        /// The completed list
        list_id: i64,
    },

    /// A checkout write failed before anything was recorded
    #[error("Failed to {step}: {source}")]
    UpstreamWriteFailure {
        /// Which write failed
        step: CheckoutStep,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The list was marked completed but its expense transaction was not created
    #[error("Grocery list {list_id} was completed but its expense was not recorded: {source}")]
    PartialCompletion {
        /// The list that is now completed without a matching transaction
        list_id: i64,
        /// Underlying failure of the transaction write
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Builds a [`Error::NotFound`] for the given entity kind and identifier.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
