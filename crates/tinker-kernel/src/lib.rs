//! # Tinker Kernel
//!
//! Pure crafting computation for Tinker.
//!
//! This crate owns the 3x3 crafting grid and the shaped-recipe matcher. It
//! has no knowledge of inventories, persistence or sessions; callers hand
//! it a grid and an ordered recipe list and get back the winning match.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod crafting_grid;

pub use crafting_grid::{
    find_first_match, CraftingGrid, GridOffset, PatternMatch, Shaped, ShapedPattern, GRID_SIZE,
    GRID_SLOTS,
};
