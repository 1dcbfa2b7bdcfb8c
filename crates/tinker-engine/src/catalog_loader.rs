//! Catalog asset loading.
//!
//! This module provides:
//! - Loading `resources.json` and `recipes.json` from a data directory
//! - Validation of items and recipe patterns on load
//! - Load statistics
//!
//! By default invalid or duplicate entries are skipped with a warning.
//! A strict loader fails on the first one instead.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use tinker_gameplay::{Catalog, Item, Recipe};
use tinker_kernel::GRID_SIZE;

/// Default directory for catalog files.
pub const DEFAULT_CATALOG_PATH: &str = "assets/catalog";

/// Base resources file name.
pub const RESOURCES_FILE: &str = "resources.json";

/// Recipes file name.
pub const RECIPES_FILE: &str = "recipes.json";

/// Errors that can occur during catalog loading.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// File not found.
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON.
    #[error("Failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Validation error.
    #[error("Catalog validation error: {0}")]
    Validation(String),

    /// Duplicate resource or recipe ID.
    #[error("Duplicate catalog ID: {0}")]
    DuplicateId(String),
}

/// Result type for catalog loading operations.
pub type CatalogLoadResult<T> = Result<T, CatalogLoadError>;

/// Checks that an item has an id and a name.
pub fn validate_item(item: &Item) -> CatalogLoadResult<()> {
    if item.id.is_blank() {
        return Err(CatalogLoadError::Validation(format!(
            "Item '{}' has blank id",
            item.name
        )));
    }
    if item.name.trim().is_empty() {
        return Err(CatalogLoadError::Validation(format!(
            "Item {} has empty name",
            item.id
        )));
    }
    Ok(())
}

/// Checks a recipe's id, result and pattern shape.
///
/// Patterns larger than the grid pass validation; the matcher never
/// selects them.
pub fn validate_recipe(recipe: &Recipe) -> CatalogLoadResult<()> {
    if recipe.id.as_str().trim().is_empty() {
        return Err(CatalogLoadError::Validation(
            "Recipe has blank id".to_string(),
        ));
    }
    validate_item(&recipe.result)?;

    let pattern = &recipe.pattern;
    if pattern.ingredient_count() == 0 {
        return Err(CatalogLoadError::Validation(format!(
            "Recipe {} has no ingredients",
            recipe.id
        )));
    }
    if pattern.is_ragged() {
        return Err(CatalogLoadError::Validation(format!(
            "Recipe {} has rows of different lengths",
            recipe.id
        )));
    }
    if pattern.ingredients().any(|id| id.is_blank()) {
        return Err(CatalogLoadError::Validation(format!(
            "Recipe {} has a blank ingredient id",
            recipe.id
        )));
    }
    Ok(())
}

/// Statistics for the catalog loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of resources accepted.
    pub resources_loaded: u32,
    /// Number of recipes accepted.
    pub recipes_loaded: u32,
    /// Number of rejected entries.
    pub validation_errors: u32,
    /// Number of recipes too large for the grid.
    pub oversized_patterns: u32,
}

/// Catalog asset loader.
#[derive(Debug)]
pub struct CatalogLoader {
    /// Directory holding the catalog files.
    base_path: PathBuf,
    /// Fail on the first invalid entry instead of skipping it.
    strict: bool,
    /// Statistics.
    stats: CatalogLoaderStats,
}

impl CatalogLoader {
    /// Creates a new catalog loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing catalog loader at: {}", base_path.display());

        Self {
            base_path,
            strict: false,
            stats: CatalogLoaderStats::default(),
        }
    }

    /// Enables or disables strict validation.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &CatalogLoaderStats {
        &self.stats
    }

    /// Loads the catalog from the base path.
    pub fn load(&mut self) -> CatalogLoadResult<Catalog> {
        let resources = self.read_file(RESOURCES_FILE)?;
        let recipes = self.read_file(RECIPES_FILE)?;
        self.load_from_str(&resources, &recipes)
    }

    /// Builds a catalog from the two JSON documents.
    pub fn load_from_str(&mut self, resources: &str, recipes: &str) -> CatalogLoadResult<Catalog> {
        let resources: Vec<Item> = serde_json::from_str(resources)?;
        let recipes: Vec<Recipe> = serde_json::from_str(recipes)?;
        self.build(resources, recipes)
    }

    fn read_file(&mut self, name: &str) -> CatalogLoadResult<String> {
        let path = self.base_path.join(name);
        if !path.exists() {
            return Err(CatalogLoadError::NotFound(path));
        }

        debug!("Loading catalog file: {}", path.display());
        let content = fs::read_to_string(&path)?;
        self.stats.files_loaded += 1;
        Ok(content)
    }

    fn build(&mut self, resources: Vec<Item>, recipes: Vec<Recipe>) -> CatalogLoadResult<Catalog> {
        let mut seen = HashSet::new();
        let mut accepted_resources = Vec::with_capacity(resources.len());
        for item in resources {
            let checked = validate_item(&item).and_then(|()| {
                if seen.insert(item.id.clone()) {
                    Ok(())
                } else {
                    Err(CatalogLoadError::DuplicateId(item.id.to_string()))
                }
            });
            if self.accept(checked)? {
                accepted_resources.push(item);
            }
        }

        let mut seen = HashSet::new();
        let mut accepted_recipes = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let checked = validate_recipe(&recipe).and_then(|()| {
                if seen.insert(recipe.id.clone()) {
                    Ok(())
                } else {
                    Err(CatalogLoadError::DuplicateId(recipe.id.to_string()))
                }
            });
            if !self.accept(checked)? {
                continue;
            }

            if !recipe.pattern.fits_grid() {
                warn!(
                    "Recipe {} is {}x{}, larger than the {GRID_SIZE}x{GRID_SIZE} grid; it will never match",
                    recipe.id,
                    recipe.pattern.height(),
                    recipe.pattern.width()
                );
                self.stats.oversized_patterns += 1;
            }
            accepted_recipes.push(recipe);
        }

        self.stats.resources_loaded += u32::try_from(accepted_resources.len()).unwrap_or(u32::MAX);
        self.stats.recipes_loaded += u32::try_from(accepted_recipes.len()).unwrap_or(u32::MAX);

        let catalog = Catalog::new(accepted_resources, accepted_recipes);
        for recipe in catalog.recipes() {
            for id in recipe.pattern.ingredients() {
                if catalog.find_by_id(id.as_str()).is_none() {
                    warn!("Recipe {} uses unknown ingredient '{id}'", recipe.id);
                }
            }
        }

        info!(
            "Loaded catalog: {} resources, {} recipes",
            catalog.resources().len(),
            catalog.recipes().len()
        );
        Ok(catalog)
    }

    /// Returns whether to keep an entry, or the error in strict mode.
    fn accept(&mut self, checked: CatalogLoadResult<()>) -> CatalogLoadResult<bool> {
        match checked {
            Ok(()) => Ok(true),
            Err(e) if self.strict => Err(e),
            Err(e) => {
                warn!("Skipping catalog entry: {e}");
                self.stats.validation_errors += 1;
                Ok(false)
            },
        }
    }
}
