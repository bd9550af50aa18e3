mod manager;
mod registry;
mod room;

pub use manager::*;
pub use registry::*;
pub use room::*;
