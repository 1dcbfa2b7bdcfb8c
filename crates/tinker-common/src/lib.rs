//! # Tinker Common
//!
//! Common types and shared abstractions for the Tinker crafting engine.
//!
//! This crate provides foundational types used across all Tinker crates:
//! - ID types (`ItemId`, `RecipeId`)
//! - The tagged `Slot` type shared by the inventory and the crafting grid
//! - The error taxonomy for crafting and persistence
//! - Version information for persisted documents
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod slot;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::slot::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_take_leaves_empty() {
        let mut slot = Slot::occupied("wood");
        assert_eq!(slot.take(), Some(ItemId::new("wood")));
        assert!(slot.is_empty());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        assert!(v1.can_read(&v2));
        assert!(v2.can_read(&v1));
        assert!(!v1.can_read(&v3));
        assert!(!v3.can_read(&v1));
    }

    #[test]
    fn test_craft_error_converts_to_top_level() {
        let err: TinkerError = CraftError::InvalidConfirm.into();
        assert!(matches!(err, TinkerError::Craft(CraftError::InvalidConfirm)));
    }
}
