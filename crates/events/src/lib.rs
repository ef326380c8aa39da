//! Domain events.
//!
//! Only the event contract lives here; distribution and storage are the
//! caller's concern.

pub mod event;

pub use event::Event;
