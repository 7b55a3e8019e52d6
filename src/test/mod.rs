//! Factories for cells, code bodies and dictionaries used across unit tests.

mod cells;

pub use cells::*;
