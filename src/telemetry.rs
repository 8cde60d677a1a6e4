use tracing::subscriber::set_global_default;
use tracing::{Level, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{filter, EnvFilter, Registry};

/// Compose multiple layers into a `tracing`'s subscriber, writing bunyan
/// formatted JSON lines to `sink`.
///
/// `RUST_LOG` takes precedence over `env_filter`.
///
/// # Implementation Notes
///
/// We are using `impl Subscriber` as return type to avoid having to spell out the actual
/// type of the returned subscriber, which is indeed quite complex.
pub fn get_subscriber_file<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    subscriber_file(name, env_or(env_filter), sink)
}

/// Human readable output for running from a terminal.
///
/// `RUST_LOG` takes precedence over `env_filter`.
pub fn get_subscriber_terminal<Sink>(
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    subscriber_terminal(env_or(env_filter), sink)
}

fn env_or(env_filter: String) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter))
}

fn subscriber_file<Sink>(
    name: String,
    env_filter: EnvFilter,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

// Statements logged by sqlx and sea-orm are only shown as warnings, they
// drown out everything else at debug level.
fn subscriber_terminal<Sink>(env_filter: EnvFilter, sink: Sink) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let module_filter = filter::Targets::new()
        .with_target("lumina", Level::DEBUG)
        .with_target("sqlx", Level::WARN)
        .with_target("sea_orm", Level::WARN)
        .with_target("sea_orm_migration", Level::WARN)
        .with_default(Level::INFO);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .with_thread_names(true)
        .with_target(true)
        .pretty()
        .with_filter(env_filter)
        .with_filter(module_filter);
    tracing_subscriber::registry().with(layer)
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once!
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> anyhow::Result<()> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
