#[path = "handlers/turns.rs"]
mod turns;

#[path = "handlers/catalog.rs"]
mod catalog;

#[path = "handlers/helpers.rs"]
mod helpers;

pub use catalog::{handle_personas, handle_topics};
pub use turns::{handle_start, handle_turn};
