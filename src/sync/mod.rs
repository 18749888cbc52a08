pub mod backend;
pub mod coordinator;
pub mod memory;

pub use backend::*;
pub use coordinator::*;
pub use memory::*;
