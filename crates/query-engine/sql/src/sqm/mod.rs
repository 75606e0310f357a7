//! The semantic query model: typed query trees, their construction, copying,
//! walking and rendering.

pub mod ast;
pub mod builder;
pub mod copy;
pub mod error;
pub mod evaluate;
pub mod hql;
pub mod negation;
pub mod parameters;
pub mod walker;

pub use builder::NodeBuilder;
pub use copy::{copy_tree, CopyContext};
pub use error::ConstructionError;
pub use walker::SemanticWalker;
