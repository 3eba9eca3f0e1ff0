pub mod config;
pub mod data;
pub mod logging;
pub mod matrix;
pub mod neural;
pub mod prelude;
#[cfg(feature = "gui")]
pub mod viz;
