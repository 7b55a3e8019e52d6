pub mod cells;
pub mod common;
pub mod disasm;
pub mod methods;
