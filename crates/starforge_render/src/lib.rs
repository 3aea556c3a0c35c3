pub mod draw;
pub mod plugin;
pub mod ui;
