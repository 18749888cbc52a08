pub mod filter;
pub mod input;
pub mod store;
pub mod tree;
pub mod types;
pub mod validation;
pub mod wire;

#[cfg(test)]
mod tests;

pub use filter::*;
pub use input::*;
pub use store::*;
pub use tree::*;
pub use types::*;
pub use validation::*;
pub use wire::*;
