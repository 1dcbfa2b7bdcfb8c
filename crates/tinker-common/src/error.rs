//! Error types for Tinker.

use thiserror::Error;

use crate::ids::ItemId;

/// Top-level error type for Tinker operations.
#[derive(Debug, Error)]
pub enum TinkerError {
    /// Crafting and move rejections
    #[error("Crafting error: {0}")]
    Craft(#[from] CraftError),

    /// Persistence errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// Rejections raised by the crafting core.
///
/// None of these are faults: the operation was refused before any state
/// changed and the player can simply retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// Item id is not in the catalog
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    /// Move references an out-of-range or empty slot
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// Confirm called while no result is pending
    #[error("Nothing to craft")]
    InvalidConfirm,

    /// Bounded inventory has no empty slot
    #[error("Inventory full: capacity {capacity}")]
    InventoryFull {
        /// Inventory capacity
        capacity: usize,
    },
}

impl CraftError {
    /// Shorthand for an `InvalidMove` with a formatted reason.
    #[must_use]
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove(reason.into())
    }
}

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Document written by an incompatible version
    #[error("Incompatible document version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Found version
        found: String,
    },
}

/// Result type for crafting operations.
pub type CraftResult<T> = Result<T, CraftError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for Tinker operations.
pub type TinkerResult<T> = Result<T, TinkerError>;
