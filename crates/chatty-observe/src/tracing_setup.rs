//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use chatty_types::config::LoggingConfig;
//!
//! // Text logs at the configured level
//! chatty_observe::tracing_setup::init_tracing(&LoggingConfig::default(), None).unwrap();
//! ```

use chatty_types::config::LoggingConfig;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Pick the filter directive: explicit override, then `RUST_LOG`, then config.
pub fn resolve_filter(config: &LoggingConfig, override_filter: Option<&str>) -> String {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    pick_filter(config, override_filter, rust_log)
}

fn pick_filter(
    config: &LoggingConfig,
    override_filter: Option<&str>,
    rust_log: Option<String>,
) -> String {
    override_filter
        .map(str::to_string)
        .or(rust_log.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| config.filter.clone())
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer, human-readable or JSON per `config.json`, with
///   span close timing.
/// - When `config.otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter.
/// - `override_filter` (from CLI verbosity flags) beats `RUST_LOG`, which
///   beats `config.filter`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or the global
/// subscriber has already been set.
pub fn init_tracing(
    config: &LoggingConfig,
    override_filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(resolve_filter(config, override_filter))?;

    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed()
    };

    if config.otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("chatty");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}
