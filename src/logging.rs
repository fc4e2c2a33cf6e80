use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize file-based logging. The TUI owns stdout, so everything goes to
/// `ticket-tui.log` in `TICKET_TUI_LOG_DIR` (default: current directory).
/// The returned guard must stay alive for the process lifetime so buffered
/// lines get flushed.
pub fn init() -> WorkerGuard {
    let dir = std::env::var("TICKET_TUI_LOG_DIR").unwrap_or_else(|_| ".".to_string());
    let file_appender = tracing_appender::rolling::never(dir, "ticket-tui.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    guard
}
