use tracing::Subscriber;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Create the global subscriber, `RUST_LOG` takes precedence over `default_directives`.
///
/// Log lines are routed through the indicatif layer so they don't tear active progress bars.
pub fn create_subscriber(default_directives: &str) -> impl Subscriber + Send + Sync + 'static {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
}
