use serde::{Deserialize, Serialize};

use comanda_core::{AggregateId, DomainError, DomainResult, Entity, ValueObject};

use crate::ingredient::IngredientId;

/// Dish identifier (stable, never reused).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(pub AggregateId);

impl DishId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DishId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One ingredient requirement within a dish's recipe.
///
/// `ingredient_id` is a weak reference: the ingredient may have been deleted
/// from the catalog since the recipe was written. A dangling line means the
/// dish cannot be prepared; it is never a crash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient_id: IngredientId,
    /// Portions of the ingredient consumed per single unit of the dish.
    /// Must be positive; a non-positive value is catalog data corruption and
    /// is rejected at read time, not defaulted.
    pub portions_required: f64,
}

impl RecipeLine {
    pub fn new(ingredient_id: IngredientId, portions_required: f64) -> Self {
        Self {
            ingredient_id,
            portions_required,
        }
    }
}

impl ValueObject for RecipeLine {}

/// A sellable menu item with an optional recipe.
///
/// An empty recipe means the dish consumes no tracked stock (bought-in
/// drinks in the original menu work this way) and is always orderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: String,
    recipe: Vec<RecipeLine>,
}

impl Dish {
    pub fn new(id: DishId, name: impl Into<String>, recipe: Vec<RecipeLine>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("dish name cannot be empty"));
        }
        Ok(Self { id, name, recipe })
    }

    pub fn id_typed(&self) -> DishId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recipe(&self) -> &[RecipeLine] {
        &self.recipe
    }

    pub fn has_recipe(&self) -> bool {
        !self.recipe.is_empty()
    }

    /// Replace the recipe (the recipe editor's write path).
    pub fn set_recipe(&mut self, recipe: Vec<RecipeLine>) {
        self.recipe = recipe;
    }
}

impl Entity for Dish {
    type Id = DishId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dish_id() -> DishId {
        DishId::new(AggregateId::new())
    }

    fn test_ingredient_id() -> IngredientId {
        IngredientId::new(AggregateId::new())
    }

    #[test]
    fn rejects_blank_name() {
        let err = Dish::new(test_dish_id(), "", vec![]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn recipe_less_dish_has_no_recipe() {
        let soda = Dish::new(test_dish_id(), "Soda", vec![]).unwrap();
        assert!(!soda.has_recipe());
    }

    #[test]
    fn set_recipe_replaces_lines() {
        let mut dish = Dish::new(test_dish_id(), "Grilled Fish", vec![]).unwrap();
        let line = RecipeLine::new(test_ingredient_id(), 1.0);
        dish.set_recipe(vec![line]);
        assert_eq!(dish.recipe(), &[line]);
    }
}
