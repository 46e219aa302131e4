/// Opens a span covering the rest of the enclosing scope.
///
/// # Examples
///
/// ```
/// use skylight_tracing::span_scope;
///
/// # fn main() {
/// span_scope!("scope");
/// # }
/// ```
#[macro_export]
macro_rules! span_scope {
    ($scope_name:ident, $name:expr) => {
        static $scope_name: $crate::spans::SpanMetadata = $crate::spans::SpanMetadata {
            name: $name,
            target: module_path!(),
            file: file!(),
            line: line!(),
        };
        let _span_guard = $crate::guards::ThreadSpanGuard {
            thread_span_desc: &$scope_name,
            _dummy_ptr: std::marker::PhantomData,
        };
        $crate::dispatch::on_begin_scope(&$scope_name);
    };
    ($name:expr) => {
        $crate::span_scope!(_METADATA_NAMED, $name);
    };
}

/// Records an integer metric.
///
/// # Examples
///
/// ```
/// use skylight_tracing::imetric;
///
/// # fn main() {
/// imetric!("Frame Time", "ticks", 1000);
/// # }
/// ```
#[macro_export]
macro_rules! imetric {
    ($name:literal, $unit:literal, $value:expr) => {{
        static METRIC_METADATA: $crate::metrics::MetricMetadata =
            $crate::metrics::MetricMetadata {
                lod: $crate::levels::Verbosity::Max,
                name: $name,
                unit: $unit,
                target: module_path!(),
                file: file!(),
                line: line!(),
            };
        $crate::dispatch::int_metric(&METRIC_METADATA, $value);
    }};
}

/// Records a float metric.
///
/// # Examples
///
/// ```
/// use skylight_tracing::fmetric;
///
/// # fn main() {
/// fmetric!("Frame Time", "ticks", 1000.0);
/// # }
/// ```
#[macro_export]
macro_rules! fmetric {
    ($name:literal, $unit:literal, $value:expr) => {{
        static METRIC_METADATA: $crate::metrics::MetricMetadata =
            $crate::metrics::MetricMetadata {
                lod: $crate::levels::Verbosity::Max,
                name: $name,
                unit: $unit,
                target: module_path!(),
                file: file!(),
                line: line!(),
            };
        $crate::dispatch::float_metric(&METRIC_METADATA, $value);
    }};
}

/// The standard logging macro.
///
/// # Examples
///
/// ```
/// use skylight_tracing::{log, levels::Level};
///
/// # fn main() {
/// let data = (42, "Forty-two");
///
/// log!(Level::Error, "Received errors: {}, {}", data.0, data.1);
/// log!(target: "app_events", Level::Warn, "App warning: {}, {}", data.0, data.1);
/// # }
/// ```
#[macro_export]
macro_rules! log {
    (target: $target:expr, $lvl:expr, $($arg:tt)+) => ({
        static LOG_DESC: $crate::logs::LogMetadata = $crate::logs::LogMetadata {
            level: $lvl,
            fmt_str: $crate::__first_arg!($($arg)+),
            target: $target,
            file: file!(),
            line: line!(),
        };
        if $lvl <= $crate::levels::STATIC_MAX_LEVEL && $lvl <= $crate::levels::max_level() {
            $crate::dispatch::log(&LOG_DESC, format_args!($($arg)+));
        }
    });
    ($lvl:expr, $($arg:tt)+) => ($crate::log!(target: module_path!(), $lvl, $($arg)+))
}

/// Logs a message at the error level.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log!(target: $target, $crate::levels::Level::Error, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log!($crate::levels::Level::Error, $($arg)+)
    )
}

/// Logs a message at the warn level.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log!(target: $target, $crate::levels::Level::Warn, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log!($crate::levels::Level::Warn, $($arg)+)
    )
}

/// Logs a message at the info level.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log!(target: $target, $crate::levels::Level::Info, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log!($crate::levels::Level::Info, $($arg)+)
    )
}

/// Logs a message at the debug level.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log!(target: $target, $crate::levels::Level::Debug, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log!($crate::levels::Level::Debug, $($arg)+)
    )
}

/// Logs a message at the trace level.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log!(target: $target, $crate::levels::Level::Trace, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log!($crate::levels::Level::Trace, $($arg)+)
    )
}

/// Determines if a message logged at the specified level would be recorded.
///
/// Use to avoid expensive computation of log arguments that would be
/// discarded anyway.
#[macro_export]
macro_rules! log_enabled {
    (target: $target:expr, $lvl:expr) => {{
        static LOG_DESC: $crate::logs::LogMetadata = $crate::logs::LogMetadata {
            level: $lvl,
            fmt_str: "",
            target: $target,
            file: file!(),
            line: line!(),
        };
        $lvl <= $crate::levels::STATIC_MAX_LEVEL
            && $lvl <= $crate::levels::max_level()
            && $crate::dispatch::log_enabled(&LOG_DESC)
    }};
    ($lvl:expr) => {
        $crate::log_enabled!(target: module_path!(), $lvl)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __first_arg {
    ($first:tt) => {
        $first
    };
    ($first:tt, $($args:tt)*) => {
        $crate::__first_arg!($first)
    };
}
