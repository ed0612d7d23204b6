use anyhow::{anyhow, Context, Result};
use backoffice_models::{
    default_permissions, Bet, BetStatus, Match, MatchOdds, MatchStatus, RiskLevel, Score, Snapshot,
    User, UserRole,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Supplier of match, bet and user collections. The aggregation functions
/// never see this trait, only the collections it returns.
pub trait DataSource: Send + Sync {
    fn load(&self) -> Result<Snapshot>;
}

#[derive(Debug, Clone)]
pub struct MockDataConfig {
    pub match_count: usize,
    pub bet_count: usize,
    pub user_count: usize,
    /// Fixed seed for reproducible snapshots.
    pub seed: Option<u64>,
}

impl Default for MockDataConfig {
    fn default() -> Self {
        Self {
            match_count: 30,
            bet_count: 200,
            user_count: 15,
            seed: None,
        }
    }
}

const TEAMS: [&str; 20] = [
    "Manchester United", "Chelsea", "Arsenal", "Liverpool", "Manchester City",
    "Tottenham", "Leicester City", "West Ham", "Newcastle", "Brighton",
    "Real Madrid", "Barcelona", "Atletico Madrid", "Sevilla", "Valencia",
    "Bayern Munich", "Dortmund", "RB Leipzig", "Bayer Leverkusen", "Frankfurt",
];

const LEAGUES: [&str; 5] = ["Premier League", "La Liga", "Bundesliga", "Serie A", "Ligue 1"];

const BET_TYPES: [&str; 4] = ["1X2", "Over/Under", "Both Teams Score", "Asian Handicap"];

const SELECTIONS: [&str; 7] = ["Home Win", "Draw", "Away Win", "Over 2.5", "Under 2.5", "Yes", "No"];

const FIRST_NAMES: [&str; 15] = [
    "Marco", "Giuseppe", "Francesco", "Antonio", "Alessandro", "Andrea", "Matteo", "Lorenzo",
    "Gabriele", "Stefano", "Luca", "Federico", "Davide", "Riccardo", "Michele",
];

const LAST_NAMES: [&str; 15] = [
    "Rossi", "Bianchi", "Verdi", "Russo", "Ferrari", "Esposito", "Ricci", "Marino", "Greco",
    "Bruno", "Gallo", "Conti", "Mancini", "Costa", "Giordano",
];

const BET_STATUSES: [BetStatus; 4] = [BetStatus::Pending, BetStatus::Won, BetStatus::Lost, BetStatus::Void];

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Random back-office data with the same shape as production traffic.
pub struct MockDataSource {
    config: MockDataConfig,
    rng: Mutex<SmallRng>,
}

impl MockDataSource {
    pub fn new(config: MockDataConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &MockDataConfig {
        &self.config
    }

    /// Generates a snapshot with all timestamps relative to `now`.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow!("mock data generator lock poisoned"))?;

        let matches = generate_matches(&mut *rng, self.config.match_count, now)?;
        let bets = generate_bets(&mut *rng, &matches, self.config.bet_count, now)?;
        let users = generate_users(&mut *rng, self.config.user_count, now);

        debug!(
            "Generated snapshot: {} matches, {} bets, {} users",
            matches.len(),
            bets.len(),
            users.len()
        );

        Ok(Snapshot {
            matches,
            bets,
            users,
            generated_at: now,
        })
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new(MockDataConfig::default())
    }
}

impl DataSource for MockDataSource {
    fn load(&self) -> Result<Snapshot> {
        self.snapshot_at(Utc::now())
    }
}

/// Snapshot exported to disk as JSON, re-read on every load.
#[derive(Debug, Clone)]
pub struct JsonFileDataSource {
    path: PathBuf,
}

impl JsonFileDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for JsonFileDataSource {
    fn load(&self) -> Result<Snapshot> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading snapshot {}", self.path.display()))?;
        let snapshot = Snapshot::from_json(&json)
            .with_context(|| format!("parsing snapshot {}", self.path.display()))?;

        debug!(
            "Loaded snapshot from {}: {} matches, {} bets",
            self.path.display(),
            snapshot.matches.len(),
            snapshot.bets.len()
        );
        Ok(snapshot)
    }
}

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Decimal with two places drawn uniformly from `[low, high]` hundredths.
fn random_hundredths<R: Rng>(rng: &mut R, low: i64, high: i64) -> Decimal {
    Decimal::new(rng.gen_range(low..=high), 2)
}

fn random_status<R: Rng>(rng: &mut R) -> MatchStatus {
    if rng.gen_bool(0.3) {
        MatchStatus::Live
    } else if rng.gen_bool(0.6) {
        MatchStatus::Prematch
    } else if rng.gen_bool(0.8) {
        MatchStatus::Finished
    } else {
        MatchStatus::Postponed
    }
}

fn random_risk<R: Rng>(rng: &mut R) -> RiskLevel {
    RiskLevel::ALL.choose(rng).copied().unwrap_or(RiskLevel::Medium)
}

pub fn generate_matches<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Result<Vec<Match>> {
    let mut matches = Vec::with_capacity(count);

    for i in 0..count {
        let home_team = pick(rng, &TEAMS);
        let mut away_team = pick(rng, &TEAMS);
        while away_team == home_team {
            away_team = pick(rng, &TEAMS);
        }

        let status = random_status(rng);
        let start_time = now + Duration::seconds(rng.gen_range(-SECONDS_PER_DAY / 2..SECONDS_PER_DAY / 2));
        let odds = MatchOdds::new(
            random_hundredths(rng, 150, 450),
            Some(random_hundredths(rng, 280, 430)),
            random_hundredths(rng, 150, 450),
        )?;

        let mut fixture = Match::new(
            format!("match_{}", i + 1),
            home_team,
            away_team,
            pick(rng, &LEAGUES),
            start_time,
            status,
            odds,
            random_risk(rng),
        )
        .with_totals(rng.gen_range(50..550), Decimal::from(rng.gen_range(5_000..55_000_i64)));

        if status.allows_score() {
            fixture = fixture.with_score(Score {
                home: rng.gen_range(0..4),
                away: rng.gen_range(0..4),
            })?;
        }

        matches.push(fixture);
    }

    Ok(matches)
}

/// Bets always reference matches from `matches`; none are produced without
/// at least one match to point at.
pub fn generate_bets<R: Rng>(
    rng: &mut R,
    matches: &[Match],
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<Bet>> {
    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let mut bets = Vec::with_capacity(count);

    for i in 0..count {
        let fixture = &matches[rng.gen_range(0..matches.len())];
        let placed_at = now - Duration::seconds(rng.gen_range(0..SECONDS_PER_DAY));

        let mut bet = Bet::new(
            format!("bet_{}", i + 1),
            format!("user_{}", rng.gen_range(1..=1000)),
            fixture.id.clone(),
            pick(rng, &BET_TYPES),
            pick(rng, &SELECTIONS),
            random_hundredths(rng, 150, 550),
            Decimal::from(rng.gen_range(10..1010_i64)),
            placed_at,
        )?;

        let status = BET_STATUSES.choose(rng).copied().unwrap_or(BetStatus::Pending);
        if status.is_settled() {
            let open_for = (now - placed_at).num_seconds().max(1);
            bet.settle(status, placed_at + Duration::seconds(rng.gen_range(0..open_for)))?;
        }

        bets.push(bet);
    }

    Ok(bets)
}

pub fn generate_users<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<User> {
    (0..count)
        .map(|i| {
            let first_name = pick(rng, &FIRST_NAMES);
            let last_name = pick(rng, &LAST_NAMES);
            let role = UserRole::ALL.choose(rng).copied().unwrap_or(UserRole::Guest);
            let handle = format!("{}.{}", first_name.to_lowercase(), last_name.to_lowercase());

            User {
                id: format!("user_{}", i + 1),
                email: format!("{}@sportsbet.com", handle),
                username: handle,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                role,
                permissions: default_permissions(role),
                is_active: rng.gen_bool(0.9),
                created_at: now - Duration::seconds(rng.gen_range(0..365 * SECONDS_PER_DAY)),
                updated_at: now - Duration::seconds(rng.gen_range(0..30 * SECONDS_PER_DAY)),
                last_login: rng
                    .gen_bool(0.8)
                    .then(|| now - Duration::seconds(rng.gen_range(0..7 * SECONDS_PER_DAY))),
            }
        })
        .collect()
}
