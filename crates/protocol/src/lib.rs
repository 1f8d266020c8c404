pub mod commands;
pub mod types;

pub use commands::{GraphCommand, NodeStyle};
pub use types::Color;
