//! Switchable logging for hot loops (per-frame gaze ticks, replay pacing).
//!
//! A module opts in by declaring a flag and importing the macros:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_debug, log_info};
//! ```
//! Flip the flag to silence one loop without touching `RUST_LOG` for the rest
//! of the crate.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger`, reading `RUST_LOG` with `info` as the floor.
/// Safe to call more than once and alongside a host's own logger.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .try_init();
    });
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}
