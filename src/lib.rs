// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod input;
pub mod logging;
pub mod quote;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
pub mod wpm;
