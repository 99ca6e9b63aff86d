//! Log subscriber setup for the CLI

use crate::config::LogConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Level comes from `RUST_LOG` when set, otherwise from `config.level`. Logs go
/// to stderr so that feature tables written to stdout stay clean. Calling this
/// twice is a no-op.
pub fn init(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let fmt = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry().with(filter).with(fmt).try_init();
    } else {
        let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry().with(filter).with(fmt).try_init();
    }
}
