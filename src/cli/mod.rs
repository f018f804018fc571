pub mod commands;
pub mod export;
pub mod history;
pub mod scan;

pub use commands::{Cli, Commands};
