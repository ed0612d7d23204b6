use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::risk::RiskLevel;

/// Headline figures for the dashboard overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_matches: usize,
    pub live_matches: usize,
    pub total_bets: usize,
    pub total_stake: Decimal,
    pub total_profit: Decimal,
    pub risk_level: RiskLevel,
}

/// Exposure figures for the risk management page. Recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    pub total_exposure: Decimal,
    pub largest_payout: Decimal,
    /// Keyed by match id, one entry per supplied match.
    pub risk_by_match: BTreeMap<String, Decimal>,
    pub profit_margin: Decimal,
    pub active_matches: usize,
}

/// Risk metrics with presentational classifications attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub metrics: RiskMetrics,
    pub exposure_threshold: Decimal,
    pub exposure_level: RiskLevel,
    pub margin_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetSummary {
    pub total_bets: usize,
    pub total_stake: Decimal,
    pub total_payout: Decimal,
    pub profit: Decimal,
    pub pending_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskBucket {
    pub level: RiskLevel,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskDistribution {
    pub total: usize,
    pub buckets: Vec<RiskBucket>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
    pub users: usize,
    pub guests: usize,
}

impl DashboardStats {
    /// Profit as a percentage of stake, `None` with no stake.
    pub fn profit_percent(&self) -> Option<Decimal> {
        if self.total_stake.is_zero() {
            return None;
        }
        Some(self.total_profit / self.total_stake * Decimal::ONE_HUNDRED)
    }

    pub fn average_stake(&self) -> Option<Decimal> {
        if self.total_bets == 0 {
            return None;
        }
        Some(self.total_stake / Decimal::from(self.total_bets))
    }
}

impl RiskDistribution {
    pub fn bucket(&self, level: RiskLevel) -> Option<&RiskBucket> {
        self.buckets.iter().find(|b| b.level == level)
    }
}
