mod dialect;
mod negation_strategy;

pub use dialect::Dialect;
pub use negation_strategy::NegationStrategy;
