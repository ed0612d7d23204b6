use axum::{
    Router,
    routing::{get, post},
    extract::{Query, State},
    response::Json,
    http::StatusCode,
};
use backoffice_models::{
    Badge, BadgeColor, Bet, BetStatus, BetSummary, DashboardStats, Match, Permission,
    RiskAssessment, RiskDistribution, RiskLevel, Snapshot, User, UserStats, PERMISSION_CATALOG,
};
use backoffice_services::{
    assess_risk, compute_dashboard_stats, distinct_leagues, high_risk_matches,
    recent_live_matches, risk_distribution, summarize_bets, user_stats, BetQuery, DataSource,
    MatchQuery, DEFAULT_HIGH_RISK_LIMIT,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::metrics::ApiMetrics;

/// Tunables for the read endpoints.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub exposure_threshold: Decimal,
    pub high_risk_limit: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub recent_live_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            exposure_threshold: dec!(500000),
            high_risk_limit: DEFAULT_HIGH_RISK_LIMIT,
            default_page_size: 50,
            max_page_size: 100,
            recent_live_limit: 5,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub settings: ApiSettings,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// Takes the initial snapshot from `source` on the calling thread.
    pub fn new(source: Arc<dyn DataSource>, settings: ApiSettings) -> anyhow::Result<Self> {
        let snapshot = source.load()?;
        Self::with_snapshot(source, snapshot, settings)
    }

    /// Takes the initial snapshot from `source` on the blocking pool.
    pub async fn load(source: Arc<dyn DataSource>, settings: ApiSettings) -> anyhow::Result<Self> {
        let snapshot = load_blocking(source.clone()).await?;
        Self::with_snapshot(source, snapshot, settings)
    }

    fn with_snapshot(
        source: Arc<dyn DataSource>,
        snapshot: Snapshot,
        settings: ApiSettings,
    ) -> anyhow::Result<Self> {
        info!(
            "Loaded snapshot: {} matches, {} bets, {} users",
            snapshot.matches.len(),
            snapshot.bets.len(),
            snapshot.users.len()
        );

        Ok(Self {
            source,
            snapshot: Arc::new(RwLock::new(snapshot)),
            settings,
            metrics: ApiMetrics::new()?,
        })
    }
}

/// Data sources may read files, so loads run off the async workers.
async fn load_blocking(source: Arc<dyn DataSource>) -> anyhow::Result<Snapshot> {
    tokio::task::spawn_blocking(move || source.load()).await?
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct PrematchParams {
    pub search: Option<String>,
    pub league: Option<String>,
}

#[derive(Deserialize)]
pub struct BetParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub pagination: Option<PaginationInfo>,
}

#[derive(Serialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub snapshot_generated_at: String,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub profit_percent: Option<Decimal>,
    pub average_stake: Option<Decimal>,
    pub risk_badge: BadgeColor,
    pub recent_live: Vec<Match>,
}

#[derive(Serialize)]
pub struct LiveMatchesResponse {
    pub matches: Vec<Match>,
    pub distribution: RiskDistribution,
}

#[derive(Serialize)]
pub struct PrematchResponse {
    pub matches: Vec<Match>,
    pub leagues: Vec<String>,
}

#[derive(Serialize)]
pub struct BetsResponse {
    pub bets: Vec<Bet>,
    pub summary: BetSummary,
}

#[derive(Serialize)]
pub struct RiskResponse {
    pub assessment: RiskAssessment,
    pub exposure_badge: BadgeColor,
    pub high_risk_matches: Vec<Match>,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
    pub stats: UserStats,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        })
    }
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))

        // Overview
        .route("/api/v1/dashboard", get(get_dashboard))

        // Match lists
        .route("/api/v1/matches/live", get(get_live_matches))
        .route("/api/v1/matches/prematch", get(get_prematch_matches))

        // Bets and risk
        .route("/api/v1/bets", get(get_bets))
        .route("/api/v1/risk", get(get_risk))

        // Users
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/permissions", get(get_permissions))

        // Data source control
        .route("/api/v1/snapshot/refresh", post(refresh_snapshot))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let generated_at = state.snapshot.read().await.generated_at;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        snapshot_generated_at: generated_at.to_rfc3339(),
    })
}

async fn get_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.render().map_err(|e| {
        warn!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn get_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardResponse>> {
    state.metrics.record_request("dashboard");
    let snapshot = state.snapshot.read().await;

    let stats = compute_dashboard_stats(&snapshot.matches, &snapshot.bets);
    debug!("Dashboard stats: {:?}", stats);

    ApiResponse::ok(DashboardResponse {
        profit_percent: stats.profit_percent(),
        average_stake: stats.average_stake(),
        risk_badge: stats.risk_level.badge_color(),
        recent_live: recent_live_matches(&snapshot.matches, state.settings.recent_live_limit),
        stats,
    })
}

async fn get_live_matches(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Json<ApiResponse<LiveMatchesResponse>> {
    state.metrics.record_request("matches_live");
    let snapshot = state.snapshot.read().await;

    let matches = MatchQuery::live(params.search.unwrap_or_default()).apply(&snapshot.matches);
    let distribution = risk_distribution(&matches);

    ApiResponse::ok(LiveMatchesResponse { matches, distribution })
}

async fn get_prematch_matches(
    Query(params): Query<PrematchParams>,
    State(state): State<AppState>,
) -> Json<ApiResponse<PrematchResponse>> {
    state.metrics.record_request("matches_prematch");
    let snapshot = state.snapshot.read().await;

    let query = MatchQuery::prematch(params.search.unwrap_or_default(), non_empty(params.league));

    ApiResponse::ok(PrematchResponse {
        matches: query.apply(&snapshot.matches),
        leagues: distinct_leagues(&snapshot.matches),
    })
}

async fn get_bets(
    Query(params): Query<BetParams>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BetsResponse>>, StatusCode> {
    state.metrics.record_request("bets");

    let status = non_empty(params.status)
        .map(|s| s.parse::<BetStatus>())
        .transpose()
        .map_err(|e| {
            debug!("Rejected bets query: {}", e);
            StatusCode::BAD_REQUEST
        })?;

    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(state.settings.default_page_size)
        .clamp(1, state.settings.max_page_size.max(1));

    let snapshot = state.snapshot.read().await;
    let filtered = BetQuery::management(params.search.unwrap_or_default(), status).apply(&snapshot.bets);

    let total = filtered.len() as u32;
    let start = (page - 1).saturating_mul(limit) as usize;
    let page_bets = filtered.into_iter().skip(start).take(limit as usize).collect();

    Ok(Json(ApiResponse {
        success: true,
        data: Some(BetsResponse {
            bets: page_bets,
            summary: summarize_bets(&snapshot.bets),
        }),
        message: None,
        pagination: Some(PaginationInfo {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }),
    }))
}

async fn get_risk(State(state): State<AppState>) -> Json<ApiResponse<RiskResponse>> {
    state.metrics.record_request("risk");
    let snapshot = state.snapshot.read().await;

    let assessment = assess_risk(&snapshot.matches, &snapshot.bets, state.settings.exposure_threshold);
    if assessment.exposure_level == RiskLevel::High {
        warn!(
            "Exposure {} is high against threshold {}",
            assessment.metrics.total_exposure, assessment.exposure_threshold
        );
    }

    ApiResponse::ok(RiskResponse {
        exposure_badge: assessment.exposure_level.badge_color(),
        high_risk_matches: high_risk_matches(&snapshot.matches, state.settings.high_risk_limit),
        assessment,
    })
}

async fn get_users(State(state): State<AppState>) -> Json<ApiResponse<UsersResponse>> {
    state.metrics.record_request("users");
    let snapshot = state.snapshot.read().await;

    ApiResponse::ok(UsersResponse {
        stats: user_stats(&snapshot.users),
        users: snapshot.users.clone(),
    })
}

async fn get_permissions(State(state): State<AppState>) -> Json<ApiResponse<Vec<Permission>>> {
    state.metrics.record_request("permissions");
    ApiResponse::ok(PERMISSION_CATALOG.to_vec())
}

async fn refresh_snapshot(State(state): State<AppState>) -> Result<Json<ApiResponse<HealthResponse>>, StatusCode> {
    state.metrics.record_request("snapshot_refresh");

    let fresh = load_blocking(state.source.clone()).await.map_err(|e| {
        warn!("Snapshot refresh failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let generated_at = fresh.generated_at;

    *state.snapshot.write().await = fresh;
    state.metrics.record_refresh();
    info!("Snapshot refreshed at {}", generated_at);

    Ok(Json(ApiResponse {
        success: true,
        data: Some(HealthResponse {
            status: "refreshed".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            snapshot_generated_at: generated_at.to_rfc3339(),
        }),
        message: Some("Snapshot reloaded from data source".to_string()),
        pagination: None,
    }))
}
