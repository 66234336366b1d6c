//! # telemetry — tracing subscriber setup shared by every binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// stdio tool servers: stdout is reserved for protocol frames
    Stderr,
}

/// Install the global subscriber. `directives` are added on top of `RUST_LOG`,
/// e.g. `["strategist=debug", "tower_http=info"]`.
pub fn init_tracing(directives: &[&str], target: LogTarget) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for directive in directives {
        filter = filter.add_directive(directive.parse()?);
    }

    let registry = tracing_subscriber::registry().with(filter);
    match target {
        LogTarget::Stdout => registry.with(fmt::layer()).init(),
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
            .init(),
    }
    Ok(())
}
