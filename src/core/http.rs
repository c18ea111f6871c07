//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use super::market_hours::market_date;
use crate::alerts::{AlertExtractor, AlertScanner, ImapMailSource, ProcessedCursor};
use crate::config::ScannerConfig;
use crate::error::{ErrorResponse, MarketDataError};
use crate::indicators::momentum::{calculate_rsi_default, relative_strength, DEFAULT_RS_LOOKBACK};
use crate::indicators::structure::{classic_pivots, monthly_pivot};
use crate::indicators::trend::{calculate_emas, DASHBOARD_EMA_PERIODS};
use crate::metrics::Metrics;
use crate::models::alert::AlertRecord;
use crate::models::indicators::{IndicatorSet, Interval};
use crate::models::signal::{OscillatorPoint, SymbolReport};
use crate::services::market_data::MarketDataProvider;
use crate::services::yahoo::YahooFinanceProvider;
use crate::signals::{Scanner, SignalEngine};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Daily history backing the indicator endpoint
const INDICATOR_RANGE: &str = "1y";

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub scanner: Arc<Scanner>,
    pub timeframes: Arc<Vec<Interval>>,
    pub alert_scanner: Option<Arc<AlertScanner>>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        provider: Arc<dyn MarketDataProvider>,
        scanner: Scanner,
        timeframes: Vec<Interval>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            provider,
            scanner: Arc::new(scanner),
            timeframes: Arc::new(timeframes),
            alert_scanner: None,
        }
    }

    pub fn with_alert_scanner(mut self, alert_scanner: AlertScanner) -> Self {
        self.alert_scanner = Some(Arc::new(alert_scanner));
        self
    }
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(code, message)))
}

fn market_data_error(err: &MarketDataError) -> ApiError {
    let status = match err {
        MarketDataError::NoData(_) | MarketDataError::Provider { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(ErrorResponse::from(err)))
}

fn parse_interval(raw: &str) -> Result<Interval, ApiError> {
    Interval::from_str(raw).map_err(|e| api_error(StatusCode::BAD_REQUEST, "INVALID_INTERVAL", e))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "signaldesk"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct SignalsQuery {
    /// Comma-separated intervals, e.g. `60m,1d,1wk`
    timeframes: Option<String>,
}

/// Multi-timeframe readings, price and daily levels for one symbol
async fn get_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<SignalsQuery>,
) -> Result<Json<SymbolReport>, ApiError> {
    let timeframes = match params.timeframes {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_interval)
            .collect::<Result<Vec<_>, _>>()?,
        None => state.timeframes.to_vec(),
    };

    let report = state
        .scanner
        .scan_symbol(&symbol.to_uppercase(), &timeframes)
        .await;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct OscillatorQuery {
    interval: Option<String>,
}

/// Per-bar oscillator series for one symbol and interval
async fn get_oscillator(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<OscillatorQuery>,
) -> Result<Json<Vec<OscillatorPoint>>, ApiError> {
    let interval = match params.interval {
        Some(raw) => parse_interval(&raw)?,
        None => Interval::Day1,
    };

    let candles = state
        .provider
        .get_candles(&symbol.to_uppercase(), interval, interval.default_range())
        .await
        .map_err(|e| market_data_error(&e))?;

    SignalEngine::oscillator(&candles, state.scanner.params())
        .map(Json)
        .ok_or_else(|| {
            api_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "INSUFFICIENT_HISTORY",
                format!(
                    "{} bars available, {} required",
                    candles.len(),
                    state.scanner.params().min_bars()
                ),
            )
        })
}

#[derive(Debug, Deserialize)]
struct IndicatorQuery {
    /// Benchmark for relative strength, e.g. `SPY`
    benchmark: Option<String>,
}

/// RSI, EMA 21/50/200, classic and monthly pivots from daily bars
async fn get_indicators(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<IndicatorQuery>,
) -> Result<Json<IndicatorSet>, ApiError> {
    let symbol = symbol.to_uppercase();
    let candles = state
        .provider
        .get_candles(&symbol, Interval::Day1, INDICATOR_RANGE)
        .await
        .map_err(|e| market_data_error(&e))?;

    let last = candles
        .last()
        .ok_or_else(|| market_data_error(&MarketDataError::NoData(symbol.clone())))?;

    let mut set = IndicatorSet::new(symbol.clone(), last.close)
        .with_emas(calculate_emas(&candles, &DASHBOARD_EMA_PERIODS));
    set.timestamp = last.timestamp;
    if let Some(rsi) = calculate_rsi_default(&candles) {
        set = set.with_rsi(rsi);
    }
    if let Some(pivots) = classic_pivots(&candles) {
        set = set.with_pivots(pivots);
    }
    if let Some(pivot) = monthly_pivot(&candles, last.timestamp.year(), last.timestamp.month()) {
        set = set.with_monthly_pivot(pivot);
    }

    if let Some(benchmark) = params.benchmark {
        let benchmark = benchmark.to_uppercase();
        match state
            .provider
            .get_candles(&benchmark, Interval::Day1, INDICATOR_RANGE)
            .await
        {
            Ok(bench) => {
                if let Some(rs) = relative_strength(&candles, &bench, DEFAULT_RS_LOOKBACK) {
                    set = set.with_relative_strength(rs);
                }
            }
            Err(e) => tracing::warn!(benchmark = %benchmark, error = %e, "Benchmark unavailable"),
        }
    }

    Ok(Json(set))
}

/// Alert rows for a keyword within the configured lookback window
async fn get_alerts(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<AlertRecord>>, ApiError> {
    let alert_scanner = state.alert_scanner.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "MAIL_NOT_CONFIGURED",
            "alert mailbox is not configured",
        )
    })?;

    let extraction = alert_scanner
        .scan(&keyword, market_date(chrono::Utc::now()), ProcessedCursor::new())
        .await;
    Ok(Json(extraction.records))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals/{symbol}", get(get_signals))
        .route("/api/oscillator/{symbol}", get(get_oscillator))
        .route("/api/indicators/{symbol}", get(get_indicators))
        .route("/api/alerts/{keyword}", get(get_alerts))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the production collaborators from configuration and serve on `port`
pub async fn start_server(port: u16, config: ScannerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooFinanceProvider::new(
        config.yahoo_base_url.clone(),
        config.http_timeout,
    )?);

    let scanner = Scanner::new(provider.clone(), config.tmo)
        .with_concurrency(config.fetch_concurrency)
        .with_levels(true)
        .with_metrics(metrics.clone());

    let mut state = AppState::new(metrics.clone(), provider, scanner, config.timeframes.clone());

    match config.mail {
        Some(mail) => {
            let sender = mail.sender.clone();
            let lookback_days = mail.lookback_days;
            let source = Arc::new(ImapMailSource::new(mail, config.http_timeout));
            let alert_scanner = AlertScanner::new(
                source,
                AlertExtractor::new(config.dedup_policy),
                sender,
                lookback_days,
            )
            .with_metrics(metrics);
            state = state.with_alert_scanner(alert_scanner);
        }
        None => info!("EMAIL_ADDRESS/EMAIL_PASSWORD not set, alert endpoint disabled"),
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
