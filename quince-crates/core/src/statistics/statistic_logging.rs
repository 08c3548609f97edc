//! The process-wide destination of statistics: a prefix put in front of every statistic, an
//! optional closing line, and the writer they go to.

use std::fmt::Display;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

struct StatisticSink {
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send>,
}

impl StatisticSink {
    fn write_statistic(&mut self, name: &dyn Display, value: &dyn Display) {
        let line = statistic_line(self.prefix, self.casing, name, value);
        // Statistics are best effort.
        let _ = writeln!(self.writer, "{line}");
    }

    fn write_postfix(&mut self) {
        if let Some(postfix) = self.postfix {
            let _ = writeln!(self.writer, "{postfix}");
        }
    }
}

static STATISTIC_SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

fn statistic_line(
    prefix: &str,
    casing: Option<Case>,
    name: &dyn Display,
    value: &dyn Display,
) -> String {
    let name = match casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    format!("{prefix} {name}={value}")
}

fn with_sink(action: impl FnOnce(&mut StatisticSink)) {
    if let Some(Ok(mut sink)) = STATISTIC_SINK.get().map(Mutex::lock) {
        action(&mut *sink);
    }
}

/// Enables statistic logging: every statistic becomes a line `{prefix} {name}={value}`, with the
/// name re-cased if `casing` is given, and [`log_statistic_postfix`] writes `postfix`.
///
/// Only the first call has an effect; statistics logged before it are dropped. Without a writer,
/// statistics go to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send>>,
) {
    let _ = STATISTIC_SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(std::io::stdout())),
        })
    });
}

/// Logs the statistic `name` with `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| sink.write_statistic(&name, &value));
}

/// Writes the closing line after a block of statistics, if one was configured.
pub fn log_statistic_postfix() {
    with_sink(StatisticSink::write_postfix);
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_SINK.get().is_some()
}
