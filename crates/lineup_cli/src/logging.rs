//! Logging setup for the CLI.
//!
//! Logs go to stderr so command output on stdout stays pipeable. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default filter: info, or debug for the lineup crates when
/// `verbose` is set.
pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,lineup_core=debug,lineup_cli=debug"
    } else {
        "info"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry().with(stderr_layer).with(filter).init();

    tracing::debug!(verbose, "lineup logging initialized");
}
