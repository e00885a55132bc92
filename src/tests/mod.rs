
#[cfg(test)]
mod model_tests;

#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static LOGGER_INIT: Once = Once::new();

/// Route the queue's trace output to stderr for the test run
#[cfg(test)]
pub(crate) fn init_logger() {
    LOGGER_INIT.call_once(|| {
        if let Ok(logger) = flexi_logger::Logger::try_with_env_or_str("warn") {
            logger.start().ok(); // Ignore errors if logger is already set
        }
    });
}
