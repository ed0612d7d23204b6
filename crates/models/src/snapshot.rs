use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bet::Bet;
use crate::error::Result;
use crate::fixture::Match;
use crate::user::User;

/// One consistent read of everything the back-office displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub matches: Vec<Match>,
    pub bets: Vec<Bet>,
    pub users: Vec<User>,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            bets: Vec::new(),
            users: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn find_match(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Parses and validates a snapshot exported with `to_json_pretty`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Rejects matches and bets whose amounts fall outside the accepted
    /// range, so aggregation over the snapshot stays within `Decimal` range.
    pub fn validate(&self) -> Result<()> {
        self.matches.iter().try_for_each(Match::validate)?;
        self.bets.iter().try_for_each(Bet::validate)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
