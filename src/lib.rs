pub mod config;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod logging;
pub mod project;
pub mod runner;
pub mod table;

// Re-export commonly used types
pub use config::{Config, Overrides, Variable};
pub use dispatch::{Dispatcher, Request};
pub use error::Error;
pub use table::Target;
