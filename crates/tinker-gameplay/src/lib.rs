//! # Tinker Gameplay
//!
//! Crafting gameplay for Tinker.
//!
//! This crate provides the stateful side of the crafting minigame:
//! - Catalog of base resources and shaped recipes
//! - Inventory with an explicit overflow policy
//! - Discovery tracking and the "discoverable now" view
//! - Crafting session state machine
//! - Persisted documents and the storage seam
//! - Event bus for presentation layers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod discovery;
pub mod events;
pub mod inventory;
pub mod session;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::discovery::*;
    pub use crate::events::*;
    pub use crate::inventory::*;
    pub use crate::session::*;
    pub use crate::store::*;
}

pub use prelude::*;
