// src/logging.rs
// =============================================================================
// Installs the tracing subscriber.
//
// The filter comes from RUST_LOG when it is set, e.g.
//   RUST_LOG=debug link-harvester
//   RUST_LOG=link_harvester=warn link-harvester
// and defaults to info otherwise. Logs go to stderr; stdout is kept for the
// run summary.
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn,html5ever=warn";

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
