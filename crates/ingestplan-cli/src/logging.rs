//! Log setup. Everything goes to stderr so `plan --json` output stays clean.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--debug`.
pub fn init_logging(debug: bool) -> Result<(), String> {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    let directives = format!("ingestplan={level},ingestplan_planner={level},ingestplan_io={level}");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directives))
        .map_err(|e| format!("failed to create log filter: {e}"))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| format!("failed to install log subscriber: {e}"))
}
