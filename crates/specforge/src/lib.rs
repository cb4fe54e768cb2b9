//! specforge library surface: command handlers and CLI definitions.
//!
//! The binary in `main.rs` is a thin wrapper; integration tests drive the
//! same handlers through [`app::App`].

pub mod app;
pub mod cli;

pub use app::App;
pub use cli::Cli;
