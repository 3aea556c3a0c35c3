pub mod config;
pub mod constants;
pub mod draw;
pub mod input;
pub mod types;

pub use config::SimConfig;
pub use constants::*;
pub use draw::*;
pub use input::*;
pub use types::*;
