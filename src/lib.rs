// Library surface for the binary and for headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod listener;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod sentences;
pub mod session;
pub mod ui;

pub use app::App;
pub use error::{Error, Result};
