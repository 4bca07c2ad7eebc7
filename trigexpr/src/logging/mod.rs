//! Global logging for the parser family
//!
//! Parsers are pure functions; logging is strictly observational and never
//! affects outcomes. The global service is optional: until it is
//! initialized every macro call is a cheap no-op.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

/// Initialize global logging with a console logger
pub fn init_logging(min_level: LogLevel) -> Result<(), String> {
    let service = Arc::new(LoggingService::new(Arc::new(ConsoleLogger), min_level));
    init_logging_with_service(service)
}

/// Initialize with a custom service (primarily for testing)
pub fn init_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to the global logger
pub fn try_get_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Dispatch an event to the global logger if one is installed
/// (used by the logging macros)
pub fn log_with_level(event: LogEvent) {
    if let Some(logger) = try_get_logger() {
        logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_without_init_is_noop() {
        // Must not panic when nothing is installed
        log_with_level(LogEvent::debug("uninitialized"));
    }

    #[test]
    fn test_double_init_rejected() {
        let service = Arc::new(LoggingService::new(
            Arc::new(MemoryLogger::new()),
            LogLevel::Debug,
        ));
        // First init may or may not win depending on test order; the second
        // must always be rejected.
        let _ = init_logging_with_service(service.clone());
        assert!(init_logging_with_service(service).is_err());
    }
}
