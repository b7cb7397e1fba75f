//! Data types for the grid engine.

mod cell;
mod column;
mod history;
mod row;
mod selection;

pub use cell::*;
pub use column::*;
pub use history::*;
pub use row::*;
pub use selection::*;
