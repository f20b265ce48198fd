pub mod cli;
pub mod core;
pub mod util;

pub use crate::core::builder::{DependencyTree, TreeBuilder};
pub use crate::core::error::DepError;
pub use crate::core::order::{DerivedOrder, Unit, order};
