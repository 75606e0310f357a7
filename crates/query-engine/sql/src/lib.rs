pub mod sql;
pub mod sqm;
