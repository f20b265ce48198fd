pub mod tree;
pub mod error;
pub mod fs;
pub mod scanner;
pub mod builder;
pub mod order;
pub mod config;
pub mod plan;
pub mod style;
