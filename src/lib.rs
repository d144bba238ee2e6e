// Library surface for the trainer core, the terminal app and integration tests.
// main.rs only wires the terminal, the command line and logging.
pub mod app;
pub mod app_dirs;
pub mod board;
pub mod clock;
pub mod error;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod ui;
pub mod util;

pub use app::App;

/// Event loop poll interval; matches the timer's display sampling
pub const TICK_RATE_MS: u64 = 10;
