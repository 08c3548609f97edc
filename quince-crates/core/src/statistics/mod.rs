//! Counters kept by the engine and its propagators, and the machinery to log them.
pub(crate) mod statistic_logger;
pub(crate) mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;

/// A value which can be written through a [`StatisticLogger`].
///
/// See [`create_statistics_struct!`] for creating a statistic struct automatically.
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger) {
        // Writing to a `StatisticLogger` never fails.
        let _ = write!(statistic_logger, "{self}");
    }
}

/// Generates a struct of counters which implements [`Statistic`] by logging every field under
/// its own name.
///
/// # Example
/// ```rust
/// # use quince_core::create_statistics_struct;
/// create_statistics_struct!(Statistics {
///     num_calls: usize
/// });
///
/// let statistics = Statistics::default();
///
/// assert_eq!(statistics.num_calls, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $name {
            $($(#[$variable_documentation])* pub $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $($crate::statistics::Statistic::log(
                    &self.$field,
                    statistic_logger.attach_to_prefix(stringify!($field)),
                ));+
            }
        }
    };
}
