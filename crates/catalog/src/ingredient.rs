use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use comanda_core::{AggregateId, DomainError, DomainResult, Entity};

/// Ingredient identifier (stable, never reused).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub AggregateId);

impl IngredientId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for IngredientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A stocked raw material.
///
/// `quantity_on_hand` is expressed in the ingredient's stocking unit (kg,
/// liters, pieces); `portions_per_unit` converts one stocking unit into the
/// recipe portions it yields, which is what makes heterogeneous units
/// comparable across a dish's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    id: IngredientId,
    name: String,
    quantity_on_hand: f64,
    portions_per_unit: f64,
    /// Low-stock threshold, in stocking units.
    reorder_level: f64,
    /// Cost per stocking unit in the smallest currency unit (e.g., cents).
    unit_cost: u64,
}

impl Ingredient {
    pub fn new(
        id: IngredientId,
        name: impl Into<String>,
        quantity_on_hand: f64,
        portions_per_unit: f64,
        reorder_level: f64,
        unit_cost: u64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("ingredient name cannot be empty"));
        }
        if !quantity_on_hand.is_finite() || quantity_on_hand < 0.0 {
            return Err(DomainError::validation(
                "quantity_on_hand must be a non-negative finite number",
            ));
        }
        if !portions_per_unit.is_finite() || portions_per_unit <= 0.0 {
            return Err(DomainError::validation(
                "portions_per_unit must be a positive finite number",
            ));
        }
        if !reorder_level.is_finite() || reorder_level < 0.0 {
            return Err(DomainError::validation(
                "reorder_level must be a non-negative finite number",
            ));
        }
        Ok(Self {
            id,
            name,
            quantity_on_hand,
            portions_per_unit,
            reorder_level,
            unit_cost,
        })
    }

    pub fn id_typed(&self) -> IngredientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity_on_hand(&self) -> f64 {
        self.quantity_on_hand
    }

    pub fn portions_per_unit(&self) -> f64 {
        self.portions_per_unit
    }

    pub fn reorder_level(&self) -> f64 {
        self.reorder_level
    }

    pub fn unit_cost(&self) -> u64 {
        self.unit_cost
    }

    /// Total recipe portions the current stock yields.
    pub fn portions_on_hand(&self) -> f64 {
        self.quantity_on_hand * self.portions_per_unit
    }

    pub fn is_below_reorder(&self) -> bool {
        self.quantity_on_hand <= self.reorder_level
    }

    /// Remove `units` stocking units, clamping at zero.
    ///
    /// The clamp absorbs float drift only; callers must have established that
    /// stock covers the deduction before calling.
    pub fn deduct(&mut self, units: f64) {
        self.quantity_on_hand = (self.quantity_on_hand - units).max(0.0);
    }

    /// Add `units` stocking units (restock intake).
    pub fn receive(&mut self, units: f64) {
        self.quantity_on_hand += units;
    }
}

impl Entity for Ingredient {
    type Id = IngredientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The set of stocked ingredients, keyed by id.
///
/// Persistence treats this as an opaque record set; it serializes as a plain
/// id-to-ingredient map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientCatalog {
    items: HashMap<IngredientId, Ingredient>,
}

impl IngredientCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an ingredient.
    pub fn insert(&mut self, ingredient: Ingredient) {
        self.items.insert(ingredient.id_typed(), ingredient);
    }

    pub fn get(&self, id: IngredientId) -> Option<&Ingredient> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: IngredientId) -> Option<&mut Ingredient> {
        self.items.get_mut(&id)
    }

    pub fn remove(&mut self, id: IngredientId) -> Option<Ingredient> {
        self.items.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.items.values()
    }

    /// Ingredients at or below their reorder level.
    pub fn below_reorder(&self) -> Vec<&Ingredient> {
        self.items.values().filter(|i| i.is_below_reorder()).collect()
    }

    /// Inventory valuation: `Σ quantity_on_hand × unit_cost`, in the smallest
    /// currency unit.
    pub fn valuation(&self) -> f64 {
        self.items
            .values()
            .map(|i| i.quantity_on_hand() * i.unit_cost() as f64)
            .sum()
    }
}

impl FromIterator<Ingredient> for IngredientCatalog {
    fn from_iter<T: IntoIterator<Item = Ingredient>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for ingredient in iter {
            catalog.insert(ingredient);
        }
        catalog
    }
}
