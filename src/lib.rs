// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod deck;
pub mod images;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
pub mod util;
