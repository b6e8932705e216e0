//! Tracing subscriber setup.

use tracing_subscriber::fmt::format::Format;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` when set; the default keeps our crates and
/// tower-http at debug so request traces show up in development.
pub fn init_tracing() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "selleasy_api=debug,selleasy_db=debug,selleasy_storage=debug,tower_http=debug".into()
        }))
        .with(console_fmt)
        .init();
}
