//! Filter and sort layer for the match and bet lists.
//!
//! Status partition, free-text search and the categorical filter are
//! independent predicates ANDed together; the survivors are then ordered.
//! Sorting is stable, so ties keep their input order.

use backoffice_models::{Bet, BetStatus, Match, MatchStatus};

/// Case-insensitive substring test. An empty term matches everything.
pub fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    term.is_empty() || haystack.to_lowercase().contains(&term.to_lowercase())
}

fn any_field_matches<'a>(fields: impl IntoIterator<Item = &'a str>, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.into_iter().any(|field| field.to_lowercase().contains(&needle))
}

/// Fields a match search term is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchSearchScope {
    Teams,
    #[default]
    TeamsAndLeague,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOrder {
    #[default]
    AsGiven,
    StartTimeAsc,
    TotalStakeDesc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BetOrder {
    #[default]
    AsGiven,
    PlacedAtDesc,
}

#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    pub status: Option<MatchStatus>,
    pub search: String,
    pub scope: MatchSearchScope,
    pub league: Option<String>,
    pub order: MatchOrder,
}

impl MatchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live page: live fixtures, search over teams and league, input order.
    pub fn live(search: impl Into<String>) -> Self {
        Self::new().status(MatchStatus::Live).search(search)
    }

    /// Prematch page: upcoming fixtures by kick-off, optional league filter.
    pub fn prematch(search: impl Into<String>, league: Option<String>) -> Self {
        Self::new()
            .status(MatchStatus::Prematch)
            .search(search)
            .scope(MatchSearchScope::Teams)
            .league(league)
            .order(MatchOrder::StartTimeAsc)
    }

    pub fn status(mut self, status: MatchStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn scope(mut self, scope: MatchSearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// An empty league name is the same as no filter.
    pub fn league(mut self, league: Option<String>) -> Self {
        self.league = league.filter(|l| !l.is_empty());
        self
    }

    pub fn order(mut self, order: MatchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn accepts(&self, m: &Match) -> bool {
        if self.status.is_some_and(|status| m.status != status) {
            return false;
        }

        if self.league.as_deref().is_some_and(|league| m.league != league) {
            return false;
        }

        match self.scope {
            MatchSearchScope::Teams => {
                any_field_matches([m.home_team.as_str(), m.away_team.as_str()], &self.search)
            }
            MatchSearchScope::TeamsAndLeague => any_field_matches(
                [m.home_team.as_str(), m.away_team.as_str(), m.league.as_str()],
                &self.search,
            ),
        }
    }

    pub fn apply(&self, matches: &[Match]) -> Vec<Match> {
        let mut selected: Vec<Match> = matches.iter().filter(|m| self.accepts(m)).cloned().collect();

        match self.order {
            MatchOrder::AsGiven => {}
            MatchOrder::StartTimeAsc => selected.sort_by_key(|m| m.start_time),
            MatchOrder::TotalStakeDesc => selected.sort_by(|a, b| b.total_stake.cmp(&a.total_stake)),
        }

        selected
    }
}

#[derive(Debug, Clone, Default)]
pub struct BetQuery {
    pub search: String,
    pub status: Option<BetStatus>,
    pub order: BetOrder,
}

impl BetQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bets page: search over id, user and selection, newest first.
    pub fn management(search: impl Into<String>, status: Option<BetStatus>) -> Self {
        Self::new().search(search).status(status).order(BetOrder::PlacedAtDesc)
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn status(mut self, status: Option<BetStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn order(mut self, order: BetOrder) -> Self {
        self.order = order;
        self
    }

    pub fn accepts(&self, bet: &Bet) -> bool {
        if self.status.is_some_and(|status| bet.status != status) {
            return false;
        }

        any_field_matches(
            [bet.id.as_str(), bet.user_id.as_str(), bet.selection.as_str()],
            &self.search,
        )
    }

    pub fn apply(&self, bets: &[Bet]) -> Vec<Bet> {
        let mut selected: Vec<Bet> = bets.iter().filter(|bet| self.accepts(bet)).cloned().collect();

        if self.order == BetOrder::PlacedAtDesc {
            selected.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        }

        selected
    }
}

/// Leagues in the order they first appear.
pub fn distinct_leagues(matches: &[Match]) -> Vec<String> {
    let mut leagues: Vec<String> = Vec::new();
    for m in matches {
        if !leagues.iter().any(|l| l == &m.league) {
            leagues.push(m.league.clone());
        }
    }
    leagues
}

pub fn recent_live_matches(matches: &[Match], limit: usize) -> Vec<Match> {
    matches.iter().filter(|m| m.is_live()).take(limit).cloned().collect()
}
