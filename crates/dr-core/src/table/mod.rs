//! Custom dice tables uploaded by administrators.
//!
//! A table maps the numeric outcome of its command template to display text.
//! Tables are resolved by prefix match against chat input.

pub mod file;
pub mod registry;

pub use file::DiceTable;
pub use registry::TableRegistry;
