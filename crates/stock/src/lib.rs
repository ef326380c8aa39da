//! Recipe-based stock accounting.
//!
//! The [`StockLedger`] aggregate answers "how many units of dish D could be
//! fulfilled right now?" and commits consumption for confirmed order lines,
//! maintaining the invariant that committed consumption never drives any
//! ingredient's quantity on hand below zero. Pure deterministic domain logic:
//! no IO, no storage, no UI concerns.

pub mod availability;
pub mod ledger;

pub use availability::Availability;
pub use ledger::{
    CommitOrderLine, IngredientRestocked, OrderLineCommitted, Restock, StockCommand,
    StockDeduction, StockError, StockEvent, StockLedger, StockLedgerId,
};
