//! Menu and inventory catalog data model.
//!
//! These are the records the stock ledger reads: stocked ingredients with a
//! portions-per-unit conversion factor, and dishes whose recipes reference
//! them. Catalog editing itself (create/rename/delete) is a collaborator
//! concern; this crate only defines the types and read-side reports.

pub mod dish;
pub mod ingredient;

pub use dish::{Dish, DishId, RecipeLine};
pub use ingredient::{Ingredient, IngredientCatalog, IngredientId};
