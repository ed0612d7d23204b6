use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BackofficeError, Result};
use crate::money::{round_cents, MAX_ODDS, MAX_STAKE};

/// One wagering transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bet {
    pub id: String,
    pub user_id: String,
    /// Soft reference to `Match::id`; not checked.
    pub match_id: String,
    pub bet_type: String,
    pub selection: String,
    pub odds: Decimal,
    pub stake: Decimal,
    pub potential_win: Decimal,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Void,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Void => "void",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetStatus {
    type Err = BackofficeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BetStatus::Pending),
            "won" => Ok(BetStatus::Won),
            "lost" => Ok(BetStatus::Lost),
            "void" => Ok(BetStatus::Void),
            other => Err(BackofficeError::UnknownVariant {
                kind: "bet status",
                value: other.to_string(),
            }),
        }
    }
}

impl Bet {
    /// Creates a pending bet. `potential_win` is fixed here as
    /// `round(stake * odds, 2)` and never recomputed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        match_id: impl Into<String>,
        bet_type: impl Into<String>,
        selection: impl Into<String>,
        odds: Decimal,
        stake: Decimal,
        placed_at: DateTime<Utc>,
    ) -> Result<Self> {
        check_stake(stake)?;
        check_odds(odds)?;

        Ok(Self {
            id: id.into(),
            user_id: user_id.into(),
            match_id: match_id.into(),
            bet_type: bet_type.into(),
            selection: selection.into(),
            odds,
            stake,
            potential_win: round_cents(stake * odds),
            status: BetStatus::Pending,
            placed_at,
            settled_at: None,
        })
    }

    /// Checks a bet read from outside: stake and odds in range and
    /// `potential_win` equal to `round(stake * odds, 2)`.
    pub fn validate(&self) -> Result<()> {
        check_stake(self.stake)?;
        check_odds(self.odds)?;

        let expected = round_cents(self.stake * self.odds);
        if self.potential_win != expected {
            return Err(BackofficeError::InvalidPayout {
                bet_id: self.id.clone(),
                expected: expected.to_string(),
                actual: self.potential_win.to_string(),
            });
        }

        Ok(())
    }

    /// Moves a pending bet to a final state.
    pub fn settle(&mut self, status: BetStatus, at: DateTime<Utc>) -> Result<()> {
        if self.status.is_settled() {
            return Err(BackofficeError::AlreadySettled {
                bet_id: self.id.clone(),
            });
        }

        self.status = status;
        if status.is_settled() {
            self.settled_at = Some(at);
        }

        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == BetStatus::Pending
    }

    pub fn is_won(&self) -> bool {
        self.status == BetStatus::Won
    }

    pub fn potential_profit(&self) -> Decimal {
        self.potential_win - self.stake
    }
}

fn check_stake(stake: Decimal) -> Result<()> {
    if stake <= Decimal::ZERO || stake > MAX_STAKE {
        return Err(BackofficeError::InvalidStake {
            amount: stake.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_odds(odds: Decimal) -> Result<()> {
    if odds < Decimal::ONE || odds > MAX_ODDS {
        return Err(BackofficeError::InvalidOdds(format!(
            "Odds must be between 1.0 and {}, got {}",
            MAX_ODDS, odds
        )));
    }
    Ok(())
}
