use crate::config::LogLevel;
use slog::{o, Discard, Drain as _, LevelFilter, Logger};
use slog_async::Async;
use slog_term::{FullFormat, PlainDecorator, PlainSyncDecorator, TermDecorator, TestStdoutWriter};
use std::io::Write;

/// Build a terminal logger filtered at `log_level` and run `f` with it. The asynchronous drain is
/// flushed when `f` returns and the logger is dropped.
pub fn run_with_logger<T>(log_level: LogLevel, f: impl FnOnce(Logger) -> T) -> T {
    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = Async::new(drain).build().fuse();
    let drain = LevelFilter::new(drain, log_level.as_slog_level()).fuse();
    f(Logger::root(drain, o!()))
}

/// A logger that writes plain, undecorated records to `out`.
pub fn writer_logger(log_level: LogLevel, out: impl Write + Send + 'static) -> Logger {
    let decorator = PlainDecorator::new(out);
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = Async::new(drain).build().fuse();
    let drain = LevelFilter::new(drain, log_level.as_slog_level()).fuse();
    Logger::root(drain, o!())
}

/// A logger whose output is captured by the test harness.
pub fn test_logger() -> Logger {
    let decorator = PlainSyncDecorator::new(TestStdoutWriter);
    let drain = FullFormat::new(decorator).build().fuse();
    Logger::root(drain, o!())
}

pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}
