use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use comanda_catalog::{Dish, DishId, IngredientCatalog, IngredientId};
use comanda_core::{Aggregate, AggregateId, AggregateRoot};
use comanda_events::Event;

use crate::availability::Availability;

/// Stock ledger identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockLedgerId(pub AggregateId);

impl StockLedgerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for StockLedgerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Stock accounting failures.
///
/// `InsufficientStock` is a recoverable runtime condition the order-entry UI
/// surfaces to the user; `InvalidRecipeParameter` is catalog data corruption
/// and belongs in front of whoever edits recipes, never defaulted away. The
/// two must stay distinguishable in logs and tests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StockError {
    /// Commit precondition failed; nothing was mutated. `available` is the
    /// quantity the caller could still order ("only N available" messaging).
    #[error("insufficient stock for {dish}: requested {requested}, only {available} available")]
    InsufficientStock {
        dish: String,
        requested: u64,
        available: u64,
    },

    /// A recipe line or ingredient carries a non-positive conversion factor.
    #[error("invalid recipe parameter for {dish}: {detail}")]
    InvalidRecipeParameter { dish: String, detail: String },

    /// Requested order quantity must be a positive integer.
    #[error("requested quantity must be positive, got {0}")]
    InvalidQuantity(u64),

    /// Restock intake must add a positive, finite number of stocking units.
    #[error("restock units must be positive and finite, got {0}")]
    InvalidRestockUnits(f64),

    /// Restock target is not in the catalog.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(IngredientId),
}

/// Command: commit consumption for one confirmed order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitOrderLine {
    pub dish: Dish,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: take delivery of stocking units for an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restock {
    pub ingredient_id: IngredientId,
    pub units: f64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StockCommand {
    CommitOrderLine(CommitOrderLine),
    Restock(Restock),
}

/// One ingredient's share of a committed order line, in stocking units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockDeduction {
    pub ingredient_id: IngredientId,
    pub units: f64,
}

/// Event: OrderLineCommitted.
///
/// Carries every per-ingredient deduction of the order line in a single
/// event, so applying it is one logical transaction: there is no state in
/// which only some of a dish's ingredients have been depleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineCommitted {
    pub dish_id: DishId,
    pub quantity: u64,
    pub deductions: Vec<StockDeduction>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: IngredientRestocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRestocked {
    pub ingredient_id: IngredientId,
    pub units: f64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StockEvent {
    OrderLineCommitted(OrderLineCommitted),
    IngredientRestocked(IngredientRestocked),
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::OrderLineCommitted(_) => "stock.order_line.committed",
            StockEvent::IngredientRestocked(_) => "stock.ingredient.restocked",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::OrderLineCommitted(e) => e.occurred_at,
            StockEvent::IngredientRestocked(e) => e.occurred_at,
        }
    }
}

/// Aggregate root: StockLedger.
///
/// Sole owner and sole mutator of the ingredient catalog. Read queries
/// answer "how many units of this dish could be fulfilled right now"; the
/// commit path depletes stock all-or-nothing, so no sequence of commits can
/// drive any ingredient's quantity on hand below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLedger {
    id: StockLedgerId,
    ingredients: IngredientCatalog,
    version: u64,
}

impl StockLedger {
    pub fn new(id: StockLedgerId, ingredients: IngredientCatalog) -> Self {
        Self {
            id,
            ingredients,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> StockLedgerId {
        self.id
    }

    /// Read-only view of the owned catalog (reporting, low-stock checks).
    pub fn ingredients(&self) -> &IngredientCatalog {
        &self.ingredients
    }

    /// Largest quantity of `dish` that current stock supports, honoring every
    /// ingredient simultaneously (the scarcest one is binding).
    ///
    /// A recipe line whose ingredient has been deleted from the catalog pins
    /// availability at zero and logs a warning for catalog maintainers; it is
    /// not an error. Non-positive conversion factors are rejected as
    /// [`StockError::InvalidRecipeParameter`] before any availability math.
    pub fn available_units(&self, dish: &Dish) -> Result<Availability, StockError> {
        if !dish.has_recipe() {
            return Ok(Availability::Unlimited);
        }

        let mut min_units = u64::MAX;
        for (ingredient_id, portions_required) in self.required_portions(dish)? {
            let units = match self.ingredients.get(ingredient_id) {
                Some(ingredient) => {
                    (ingredient.portions_on_hand() / portions_required).floor() as u64
                }
                None => {
                    tracing::warn!(
                        ingredient_id = %ingredient_id,
                        dish = dish.name(),
                        "recipe references an ingredient missing from the catalog"
                    );
                    0
                }
            };
            min_units = min_units.min(units);
        }
        Ok(Availability::Units(min_units))
    }

    /// Whether `quantity` units of `dish` could be fulfilled right now.
    pub fn can_fulfill(&self, dish: &Dish, quantity: u64) -> Result<bool, StockError> {
        if quantity == 0 {
            return Err(StockError::InvalidQuantity(quantity));
        }
        Ok(self.available_units(dish)?.covers(quantity))
    }

    /// Commit consumption of `quantity` units of `dish`: decide, then apply.
    ///
    /// Fails with [`StockError::InsufficientStock`] and mutates nothing when
    /// stock does not cover the full quantity; partial fulfillment is not
    /// supported.
    pub fn commit(
        &mut self,
        dish: &Dish,
        quantity: u64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<StockEvent>, StockError> {
        let events = self.handle(&StockCommand::CommitOrderLine(CommitOrderLine {
            dish: dish.clone(),
            quantity,
            occurred_at,
        }))?;
        for event in &events {
            self.apply(event);
        }
        tracing::debug!(
            dish = dish.name(),
            quantity,
            version = self.version,
            "order line committed"
        );
        Ok(events)
    }

    /// Take delivery of `units` stocking units for an ingredient.
    pub fn restock(
        &mut self,
        ingredient_id: IngredientId,
        units: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<StockEvent>, StockError> {
        let events = self.handle(&StockCommand::Restock(Restock {
            ingredient_id,
            units,
            occurred_at,
        }))?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }

    /// Validate every recipe line and aggregate required portions per
    /// ingredient (a recipe naming the same ingredient twice consumes the
    /// sum, so duplicate lines cannot slip past the availability check).
    ///
    /// Catalog data errors are reported for the whole recipe before any
    /// availability math, so a dangling line cannot mask them.
    fn required_portions(&self, dish: &Dish) -> Result<Vec<(IngredientId, f64)>, StockError> {
        let mut required: Vec<(IngredientId, f64)> = Vec::new();
        for line in dish.recipe() {
            if !line.portions_required.is_finite() || line.portions_required <= 0.0 {
                return Err(StockError::InvalidRecipeParameter {
                    dish: dish.name().to_string(),
                    detail: format!(
                        "portions_required must be positive, got {} (ingredient {})",
                        line.portions_required, line.ingredient_id
                    ),
                });
            }
            if let Some(ingredient) = self.ingredients.get(line.ingredient_id) {
                if !ingredient.portions_per_unit().is_finite()
                    || ingredient.portions_per_unit() <= 0.0
                {
                    return Err(StockError::InvalidRecipeParameter {
                        dish: dish.name().to_string(),
                        detail: format!(
                            "portions_per_unit must be positive, got {} (ingredient {})",
                            ingredient.portions_per_unit(),
                            line.ingredient_id
                        ),
                    });
                }
            }
            match required
                .iter_mut()
                .find(|(id, _)| *id == line.ingredient_id)
            {
                Some(entry) => entry.1 += line.portions_required,
                None => required.push((line.ingredient_id, line.portions_required)),
            }
        }
        Ok(required)
    }

    fn handle_commit(&self, cmd: &CommitOrderLine) -> Result<Vec<StockEvent>, StockError> {
        if cmd.quantity == 0 {
            return Err(StockError::InvalidQuantity(cmd.quantity));
        }

        let availability = self.available_units(&cmd.dish)?;
        if !availability.covers(cmd.quantity) {
            return Err(StockError::InsufficientStock {
                dish: cmd.dish.name().to_string(),
                requested: cmd.quantity,
                available: availability.units(),
            });
        }

        // Availability covered the quantity, so every aggregated ingredient
        // resolves here; deductions use the same per-ingredient totals the
        // availability check was decided on.
        let deductions = self
            .required_portions(&cmd.dish)?
            .into_iter()
            .filter_map(|(ingredient_id, portions_required)| {
                self.ingredients.get(ingredient_id).map(|ingredient| {
                    StockDeduction {
                        ingredient_id,
                        units: portions_required * cmd.quantity as f64
                            / ingredient.portions_per_unit(),
                    }
                })
            })
            .collect();

        Ok(vec![StockEvent::OrderLineCommitted(OrderLineCommitted {
            dish_id: cmd.dish.id_typed(),
            quantity: cmd.quantity,
            deductions,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_restock(&self, cmd: &Restock) -> Result<Vec<StockEvent>, StockError> {
        if !cmd.units.is_finite() || cmd.units <= 0.0 {
            return Err(StockError::InvalidRestockUnits(cmd.units));
        }
        if self.ingredients.get(cmd.ingredient_id).is_none() {
            return Err(StockError::UnknownIngredient(cmd.ingredient_id));
        }
        Ok(vec![StockEvent::IngredientRestocked(IngredientRestocked {
            ingredient_id: cmd.ingredient_id,
            units: cmd.units,
            occurred_at: cmd.occurred_at,
        })])
    }
}

impl AggregateRoot for StockLedger {
    type Id = StockLedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for StockLedger {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = StockError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::OrderLineCommitted(e) => {
                for deduction in &e.deductions {
                    // Deduct clamps at zero; see Ingredient::deduct.
                    if let Some(ingredient) = self.ingredients.get_mut(deduction.ingredient_id) {
                        ingredient.deduct(deduction.units);
                    }
                }
            }
            StockEvent::IngredientRestocked(e) => {
                if let Some(ingredient) = self.ingredients.get_mut(e.ingredient_id) {
                    ingredient.receive(e.units);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::CommitOrderLine(cmd) => self.handle_commit(cmd),
            StockCommand::Restock(cmd) => self.handle_restock(cmd),
        }
    }
}
