use std::time::Duration;

use axum::body::Body;
use axum::extract::{MatchedPath, Request};
use axum::http::Response;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::Span;

/// Process-wide tracing subscriber and `color-eyre` report hooks.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Telemetry {
    /// Extra filter directives applied on top of the crate defaults when
    /// `RUST_LOG` is unset.
    pub extra_directives: Option<String>,
    /// Single-line events instead of the multi-line pretty format.
    pub compact: bool,
}

impl Telemetry {
    pub fn new(settings: &crate::Settings) -> Self {
        Self {
            extra_directives: settings.log_filter.clone(),
            compact: settings.compact_logs,
        }
    }

    fn default_directives(&self) -> String {
        let crate_name = env!("CARGO_CRATE_NAME");
        let base = format!("{crate_name}=trace,axum::rejection=trace,tower_http=debug,sqlx=warn");
        match &self.extra_directives {
            Some(extra) if !extra.trim().is_empty() => format!("{base},{extra}"),
            _ => base,
        }
    }

    pub fn setup(&self) -> Result<(), color_eyre::eyre::Error> {
        use tracing_error::ErrorLayer;
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        color_eyre::install()?;

        let compact_layer = self.compact.then(|| {
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
        });
        let pretty_layer = (!self.compact).then(|| {
            fmt::layer()
                .pretty()
                .without_time()
                .with_thread_names(true)
                .with_writer(std::io::stderr)
        });

        let filter_layer = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.default_directives()))?;

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(compact_layer)
            .with(pretty_layer)
            .with(ErrorLayer::default())
            .try_init()?;

        Ok(())
    }
}

type Classifier = SharedClassifier<ServerErrorsAsFailures>;
type MakeSpan = fn(&Request<Body>) -> Span;
type OnResponse = fn(&Response<Body>, Duration, &Span);

#[must_use]
pub fn trace_layer() -> TraceLayer<Classifier, MakeSpan, DefaultOnRequest, OnResponse> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeSpan)
        .on_response(log_response as OnResponse)
}

fn request_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str);
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        matched_path,
        version = ?request.version(),
    )
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    tracing::debug!(
        status = response.status().as_u16(),
        ?latency,
        "Finished processing request"
    );
}
