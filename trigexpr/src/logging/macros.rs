//! Logging macros
//!
//! All macros are no-ops until the global service is initialized, so
//! library consumers that never call `init_logging` pay only an atomic
//! load per call site. Context values accept any `Display` type.

/// Log an error with a code, optional span, and context pairs
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_level(
            $crate::logging::LogEvent::error($code, $message),
        )
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_with_level(
            $crate::logging::LogEvent::error($code, $message).with_span($span),
        )
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {{
        let mut event = $crate::logging::LogEvent::error($code, $message).with_span($span);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $crate::logging::log_with_level(event)
    }};

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let mut event = $crate::logging::LogEvent::error($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $crate::logging::log_with_level(event)
    }};
}

/// Log a success event with a code and context pairs
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_level(
            $crate::logging::LogEvent::success($code, $message),
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {{
        let mut event = $crate::logging::LogEvent::success($code, $message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $crate::logging::log_with_level(event)
    }};
}

/// Log a warning message with context pairs
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_with_level($crate::logging::LogEvent::warning($message))
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let mut event = $crate::logging::LogEvent::warning($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $crate::logging::log_with_level(event)
    }};
}

/// Log a debug message with context pairs
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        $crate::logging::log_with_level($crate::logging::LogEvent::debug($message))
    };

    ($message:expr, $($key:expr => $value:expr),+) => {{
        let mut event = $crate::logging::LogEvent::debug($message);
        $(
            event = event.with_context($key, &format!("{}", $value));
        )+
        $crate::logging::log_with_level(event)
    }};
}
