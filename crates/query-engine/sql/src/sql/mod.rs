//! The low-level SQL representation a query tree is translated to.

pub mod ast;
pub mod convert;
pub mod execution_plan;
pub mod helpers;
pub mod string;
