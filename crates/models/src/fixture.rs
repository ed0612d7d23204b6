use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BackofficeError, Result};
use crate::bet::check_odds;
use crate::money::MAX_STAKE;
use crate::risk::RiskLevel;

/// One sporting fixture as shown on the match pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub start_time: DateTime<Utc>,
    pub status: MatchStatus,
    pub score: Option<Score>,
    pub odds: MatchOdds,
    pub total_bets: u32,
    pub total_stake: Decimal,
    /// Assigned by the data source, never derived from the totals.
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Live,
    Prematch,
    Finished,
    Postponed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

/// Decimal 1X2 quote. `draw` is absent for fixtures without a draw outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchOdds {
    pub home: Decimal,
    pub draw: Option<Decimal>,
    pub away: Decimal,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Live => "live",
            MatchStatus::Prematch => "prematch",
            MatchStatus::Finished => "finished",
            MatchStatus::Postponed => "postponed",
        }
    }

    /// Live and prematch fixtures still accept bets.
    pub fn is_active(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Prematch)
    }

    pub fn allows_score(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Finished)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = BackofficeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "live" => Ok(MatchStatus::Live),
            "prematch" => Ok(MatchStatus::Prematch),
            "finished" => Ok(MatchStatus::Finished),
            "postponed" => Ok(MatchStatus::Postponed),
            other => Err(BackofficeError::UnknownVariant {
                kind: "match status",
                value: other.to_string(),
            }),
        }
    }
}

impl MatchOdds {
    pub fn new(home: Decimal, draw: Option<Decimal>, away: Decimal) -> Result<Self> {
        let odds = Self { home, draw, away };
        odds.validate()?;
        Ok(odds)
    }

    pub fn validate(&self) -> Result<()> {
        [Some(self.home), self.draw, Some(self.away)]
            .into_iter()
            .flatten()
            .try_for_each(check_odds)
    }

    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }
}

impl Match {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        league: impl Into<String>,
        start_time: DateTime<Utc>,
        status: MatchStatus,
        odds: MatchOdds,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            id: id.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            league: league.into(),
            start_time,
            status,
            score: None,
            odds,
            total_bets: 0,
            total_stake: Decimal::ZERO,
            risk_level,
        }
    }

    pub fn with_score(mut self, score: Score) -> Result<Self> {
        if !self.status.allows_score() {
            return Err(BackofficeError::ScoreNotAllowed {
                match_id: self.id,
                status: self.status.to_string(),
            });
        }

        self.score = Some(score);
        Ok(self)
    }

    pub fn with_totals(mut self, total_bets: u32, total_stake: Decimal) -> Self {
        self.total_bets = total_bets;
        self.total_stake = total_stake;
        self
    }

    /// Checks quotes and the stake total of a match read from outside.
    pub fn validate(&self) -> Result<()> {
        self.odds.validate()?;
        if self.total_stake < Decimal::ZERO || self.total_stake > MAX_STAKE {
            return Err(BackofficeError::InvalidStake {
                amount: self.total_stake.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}
