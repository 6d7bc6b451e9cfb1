use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::toolkit::{LogLevel, SystemInterface};

/// Clock and log sink handed to the toolkit.
#[derive(Debug)]
pub struct UiSystem {
    started: Instant,
}

impl UiSystem {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for UiSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInterface for UiSystem {
    fn elapsed_time(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn log_message(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(message, "toolkit_log"),
            LogLevel::Warning => warn!(message, "toolkit_log"),
            LogLevel::Info => info!(message, "toolkit_log"),
            LogLevel::Debug => debug!(message, "toolkit_log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_is_monotonic() {
        let system = UiSystem::new();
        let first = system.elapsed_time();
        let second = system.elapsed_time();
        assert!(first >= 0.0);
        assert!(second >= first);
    }

    #[test]
    fn log_message_accepts_every_level() {
        let system = UiSystem::default();
        for level in [
            LogLevel::Error,
            LogLevel::Warning,
            LogLevel::Info,
            LogLevel::Debug,
        ] {
            system.log_message(level, "probe");
        }
    }
}
