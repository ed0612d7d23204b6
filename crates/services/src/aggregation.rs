//! Aggregation engine: pure functions turning a `(matches, bets)` pair into
//! dashboard and risk figures. Inputs are only borrowed; every result is
//! freshly allocated.

use std::collections::{BTreeMap, HashMap};

use backoffice_models::{
    round_cents, Bet, BetStatus, BetSummary, DashboardStats, Match, MatchStatus, RiskAssessment,
    RiskBucket, RiskDistribution, RiskLevel, RiskMetrics, User, UserRole, UserStats,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Average share of stake assumed to be paid back out.
pub const ASSUMED_PAYOUT_RATIO: Decimal = dec!(0.85);

/// Exposure ratio below which a badge reads `low`.
pub const LOW_EXPOSURE_RATIO: Decimal = dec!(0.5);
/// Exposure ratio below which a badge reads `medium`.
pub const MEDIUM_EXPOSURE_RATIO: Decimal = dec!(0.8);

pub const DEFAULT_HIGH_RISK_LIMIT: usize = 10;

fn total_stake(bets: &[Bet]) -> Decimal {
    bets.iter().map(|bet| bet.stake).sum()
}

fn won_payout(bets: &[Bet]) -> Decimal {
    bets.iter()
        .filter(|bet| bet.status == BetStatus::Won)
        .map(|bet| bet.potential_win)
        .sum()
}

pub fn compute_dashboard_stats(matches: &[Match], bets: &[Bet]) -> DashboardStats {
    let total_stake = total_stake(bets);
    // Only bets already settled as won are paid out.
    let total_profit = total_stake - won_payout(bets);

    let risk_level = if total_profit > total_stake * dec!(0.1) {
        RiskLevel::Low
    } else if total_profit > Decimal::ZERO {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    DashboardStats {
        total_matches: matches.len(),
        live_matches: matches.iter().filter(|m| m.status == MatchStatus::Live).count(),
        total_bets: bets.len(),
        total_stake,
        total_profit,
        risk_level,
    }
}

pub fn compute_risk_metrics(matches: &[Match], bets: &[Bet]) -> RiskMetrics {
    let total_stake = total_stake(bets);
    let total_potential_payout: Decimal = bets.iter().map(|bet| bet.potential_win).sum();

    let largest_payout = bets
        .iter()
        .map(|bet| bet.potential_win)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut payout_by_match: HashMap<&str, Decimal> = HashMap::new();
    for bet in bets {
        *payout_by_match.entry(bet.match_id.as_str()).or_insert(Decimal::ZERO) += bet.potential_win;
    }

    // Bets pointing at unknown matches stay in the totals but get no bucket.
    let risk_by_match: BTreeMap<String, Decimal> = matches
        .iter()
        .map(|m| {
            let payout = payout_by_match.get(m.id.as_str()).copied().unwrap_or(Decimal::ZERO);
            (m.id.clone(), payout)
        })
        .collect();

    let profit_margin = if total_stake.is_zero() {
        Decimal::ZERO
    } else {
        round_cents(
            (total_stake - total_potential_payout * ASSUMED_PAYOUT_RATIO) / total_stake
                * Decimal::ONE_HUNDRED,
        )
    };

    RiskMetrics {
        total_exposure: total_potential_payout - total_stake,
        largest_payout,
        risk_by_match,
        profit_margin,
        active_matches: matches.iter().filter(|m| m.is_active()).count(),
    }
}

/// Classifies a raw exposure against a limit. A zero threshold means any
/// exposure is already over the limit.
pub fn risk_level_from_ratio(exposure: Decimal, threshold: Decimal) -> RiskLevel {
    if threshold.is_zero() {
        return RiskLevel::High;
    }

    let ratio = exposure / threshold;
    if ratio < LOW_EXPOSURE_RATIO {
        RiskLevel::Low
    } else if ratio < MEDIUM_EXPOSURE_RATIO {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Classification of a profit margin percentage.
pub fn margin_risk_level(profit_margin: Decimal) -> RiskLevel {
    if profit_margin > dec!(15) {
        RiskLevel::Low
    } else if profit_margin > dec!(5) {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn assess_risk(matches: &[Match], bets: &[Bet], exposure_threshold: Decimal) -> RiskAssessment {
    let metrics = compute_risk_metrics(matches, bets);
    let exposure_level = risk_level_from_ratio(metrics.total_exposure, exposure_threshold);
    let margin_level = margin_risk_level(metrics.profit_margin);

    RiskAssessment {
        metrics,
        exposure_threshold,
        exposure_level,
        margin_level,
    }
}

pub fn summarize_bets(bets: &[Bet]) -> BetSummary {
    let total_stake = total_stake(bets);
    let total_payout = won_payout(bets);
    let count = |status: BetStatus| bets.iter().filter(|bet| bet.status == status).count();

    BetSummary {
        total_bets: bets.len(),
        total_stake,
        total_payout,
        profit: total_stake - total_payout,
        pending_bets: count(BetStatus::Pending),
        won_bets: count(BetStatus::Won),
        lost_bets: count(BetStatus::Lost),
    }
}

pub fn risk_distribution(matches: &[Match]) -> RiskDistribution {
    let total = matches.len();
    let buckets = RiskLevel::ALL
        .into_iter()
        .map(|level| {
            let count = matches.iter().filter(|m| m.risk_level == level).count();
            let percentage = if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            RiskBucket { level, count, percentage }
        })
        .collect();

    RiskDistribution { total, buckets }
}

/// High-risk matches, largest stake first.
pub fn high_risk_matches(matches: &[Match], limit: usize) -> Vec<Match> {
    let mut flagged: Vec<Match> = matches
        .iter()
        .filter(|m| m.risk_level == RiskLevel::High)
        .cloned()
        .collect();
    flagged.sort_by(|a, b| b.total_stake.cmp(&a.total_stake));
    flagged.truncate(limit);
    flagged
}

pub fn user_stats(users: &[User]) -> UserStats {
    let active = users.iter().filter(|u| u.is_active).count();
    let with_role = |role: UserRole| users.iter().filter(|u| u.role == role).count();

    UserStats {
        total: users.len(),
        active,
        inactive: users.len() - active,
        admins: with_role(UserRole::Admin),
        users: with_role(UserRole::User),
        guests: with_role(UserRole::Guest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_models::{MatchOdds, Score};
    use chrono::{TimeZone, Utc};

    fn fixture(id: &str, status: MatchStatus, risk: RiskLevel, stake: Decimal) -> Match {
        Match::new(
            id,
            "Home",
            "Away",
            "Serie A",
            Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
            status,
            MatchOdds::new(dec!(2.0), Some(dec!(3.1)), dec!(3.6)).unwrap(),
            risk,
        )
        .with_totals(10, stake)
    }

    fn bet(id: &str, match_id: &str, stake: Decimal, potential_win: Decimal, status: BetStatus) -> Bet {
        Bet {
            id: id.to_string(),
            user_id: "user_1".to_string(),
            match_id: match_id.to_string(),
            bet_type: "1X2".to_string(),
            selection: "Home Win".to_string(),
            odds: dec!(1.5),
            stake,
            potential_win,
            status,
            placed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            settled_at: None,
        }
    }

    #[test]
    fn test_dashboard_risk_tiers() {
        // profit 200 of 1000 stake: above 10%
        let low = compute_dashboard_stats(&[], &[
            bet("b1", "m1", dec!(1000), dec!(800), BetStatus::Won),
        ]);
        assert_eq!(low.total_profit, dec!(200));
        assert_eq!(low.risk_level, RiskLevel::Low);

        // profit exactly 10% is not above 10%
        let boundary = compute_dashboard_stats(&[], &[
            bet("b1", "m1", dec!(1000), dec!(900), BetStatus::Won),
        ]);
        assert_eq!(boundary.risk_level, RiskLevel::Medium);

        let losing = compute_dashboard_stats(&[], &[
            bet("b1", "m1", dec!(100), dec!(100), BetStatus::Won),
        ]);
        assert_eq!(losing.total_profit, Decimal::ZERO);
        assert_eq!(losing.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_dashboard_counts_live_matches() {
        let matches = vec![
            fixture("m1", MatchStatus::Live, RiskLevel::Low, dec!(0)).with_score(Score { home: 0, away: 0 }).unwrap(),
            fixture("m2", MatchStatus::Prematch, RiskLevel::Low, dec!(0)),
            fixture("m3", MatchStatus::Live, RiskLevel::Low, dec!(0)),
            fixture("m4", MatchStatus::Postponed, RiskLevel::Low, dec!(0)),
        ];
        let stats = compute_dashboard_stats(&matches, &[]);

        assert_eq!(stats.total_matches, 4);
        assert_eq!(stats.live_matches, 2);
        assert_eq!(stats.total_bets, 0);
    }

    #[test]
    fn test_pending_and_lost_bets_count_as_revenue() {
        let bets = vec![
            bet("b1", "m1", dec!(50), dec!(120), BetStatus::Pending),
            bet("b2", "m1", dec!(50), dec!(90), BetStatus::Lost),
            bet("b3", "m1", dec!(50), dec!(75), BetStatus::Void),
        ];
        let stats = compute_dashboard_stats(&[], &bets);

        assert_eq!(stats.total_stake, dec!(150));
        assert_eq!(stats.total_profit, dec!(150));
        assert_eq!(stats.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risk_metrics_figures() {
        let matches = vec![
            fixture("m1", MatchStatus::Live, RiskLevel::Low, dec!(0)),
            fixture("m2", MatchStatus::Finished, RiskLevel::Low, dec!(0)),
            fixture("m3", MatchStatus::Prematch, RiskLevel::Low, dec!(0)),
        ];
        let bets = vec![
            bet("b1", "m1", dec!(100), dec!(250), BetStatus::Pending),
            bet("b2", "m1", dec!(100), dec!(150), BetStatus::Lost),
            bet("b3", "m2", dec!(200), dec!(300), BetStatus::Won),
        ];
        let metrics = compute_risk_metrics(&matches, &bets);

        assert_eq!(metrics.total_exposure, dec!(300));
        assert_eq!(metrics.largest_payout, dec!(300));
        assert_eq!(metrics.risk_by_match["m1"], dec!(400));
        assert_eq!(metrics.risk_by_match["m2"], dec!(300));
        assert_eq!(metrics.risk_by_match["m3"], Decimal::ZERO);
        // (400 - 700 * 0.85) / 400 * 100 = -48.75
        assert_eq!(metrics.profit_margin, dec!(-48.75));
        assert_eq!(metrics.active_matches, 2);
    }

    #[test]
    fn test_profit_margin_rounds_to_two_places() {
        let bets = vec![bet("b1", "m1", dec!(300), dec!(100), BetStatus::Pending)];
        // (300 - 85) / 300 * 100 = 71.6666...
        assert_eq!(compute_risk_metrics(&[], &bets).profit_margin, dec!(71.67));
    }

    #[test]
    fn test_risk_metrics_empty_input() {
        let metrics = compute_risk_metrics(&[], &[]);

        assert_eq!(metrics.total_exposure, Decimal::ZERO);
        assert_eq!(metrics.largest_payout, Decimal::ZERO);
        assert_eq!(metrics.profit_margin, Decimal::ZERO);
        assert!(metrics.risk_by_match.is_empty());
        assert_eq!(metrics.active_matches, 0);
    }

    #[test]
    fn test_orphan_bet_is_ignored_per_match() {
        let matches = vec![fixture("m1", MatchStatus::Live, RiskLevel::Low, dec!(0))];
        let bets = vec![
            bet("b1", "m1", dec!(10), dec!(20), BetStatus::Pending),
            bet("b2", "ghost", dec!(10), dec!(500), BetStatus::Pending),
        ];
        let metrics = compute_risk_metrics(&matches, &bets);

        assert_eq!(metrics.risk_by_match.len(), 1);
        assert_eq!(metrics.risk_by_match["m1"], dec!(20));
        assert_eq!(metrics.largest_payout, dec!(500));
        assert_eq!(metrics.total_exposure, dec!(500));
    }

    #[test]
    fn test_risk_level_from_ratio() {
        let threshold = dec!(500000);
        assert_eq!(risk_level_from_ratio(dec!(0), threshold), RiskLevel::Low);
        assert_eq!(risk_level_from_ratio(dec!(249999), threshold), RiskLevel::Low);
        assert_eq!(risk_level_from_ratio(dec!(250000), threshold), RiskLevel::Medium);
        assert_eq!(risk_level_from_ratio(dec!(399999), threshold), RiskLevel::Medium);
        assert_eq!(risk_level_from_ratio(dec!(400000), threshold), RiskLevel::High);
        assert_eq!(risk_level_from_ratio(dec!(-1000), threshold), RiskLevel::Low);
    }

    #[test]
    fn test_zero_threshold_is_high() {
        assert_eq!(risk_level_from_ratio(dec!(0), Decimal::ZERO), RiskLevel::High);
        assert_eq!(risk_level_from_ratio(dec!(-5), Decimal::ZERO), RiskLevel::High);
    }

    #[test]
    fn test_margin_risk_level() {
        assert_eq!(margin_risk_level(dec!(15.01)), RiskLevel::Low);
        assert_eq!(margin_risk_level(dec!(15)), RiskLevel::Medium);
        assert_eq!(margin_risk_level(dec!(5.5)), RiskLevel::Medium);
        assert_eq!(margin_risk_level(dec!(5)), RiskLevel::High);
        assert_eq!(margin_risk_level(dec!(-20)), RiskLevel::High);
    }

    #[test]
    fn test_assess_risk() {
        let bets = vec![bet("b1", "m1", dec!(1000), dec!(1100), BetStatus::Pending)];
        let assessment = assess_risk(&[], &bets, dec!(150));

        assert_eq!(assessment.metrics.total_exposure, dec!(100));
        assert_eq!(assessment.exposure_level, RiskLevel::Medium);
        // (1000 - 935) / 1000 * 100 = 6.5
        assert_eq!(assessment.metrics.profit_margin, dec!(6.5));
        assert_eq!(assessment.margin_level, RiskLevel::Medium);
    }

    #[test]
    fn test_summarize_bets() {
        let bets = vec![
            bet("b1", "m1", dec!(100), dec!(180), BetStatus::Won),
            bet("b2", "m1", dec!(40), dec!(90), BetStatus::Lost),
            bet("b3", "m2", dec!(60), dec!(150), BetStatus::Pending),
            bet("b4", "m2", dec!(20), dec!(30), BetStatus::Void),
        ];
        let summary = summarize_bets(&bets);

        assert_eq!(summary.total_bets, 4);
        assert_eq!(summary.total_stake, dec!(220));
        assert_eq!(summary.total_payout, dec!(180));
        assert_eq!(summary.profit, dec!(40));
        assert_eq!(summary.pending_bets, 1);
        assert_eq!(summary.won_bets, 1);
        assert_eq!(summary.lost_bets, 1);
    }

    #[test]
    fn test_risk_distribution() {
        let matches = vec![
            fixture("m1", MatchStatus::Live, RiskLevel::High, dec!(0)),
            fixture("m2", MatchStatus::Live, RiskLevel::Low, dec!(0)),
            fixture("m3", MatchStatus::Live, RiskLevel::High, dec!(0)),
            fixture("m4", MatchStatus::Live, RiskLevel::High, dec!(0)),
        ];
        let distribution = risk_distribution(&matches);

        assert_eq!(distribution.total, 4);
        assert_eq!(distribution.buckets.len(), 3);
        assert_eq!(distribution.bucket(RiskLevel::High).unwrap().count, 3);
        assert!((distribution.bucket(RiskLevel::High).unwrap().percentage - 75.0).abs() < 1e-9);
        assert_eq!(distribution.bucket(RiskLevel::Medium).unwrap().count, 0);

        let empty = risk_distribution(&[]);
        assert!(empty.buckets.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }

    #[test]
    fn test_high_risk_matches_sorted_and_limited() {
        let matches = vec![
            fixture("m1", MatchStatus::Live, RiskLevel::High, dec!(5000)),
            fixture("m2", MatchStatus::Live, RiskLevel::Low, dec!(90000)),
            fixture("m3", MatchStatus::Prematch, RiskLevel::High, dec!(42000)),
            fixture("m4", MatchStatus::Finished, RiskLevel::High, dec!(17000)),
        ];

        let top: Vec<String> = high_risk_matches(&matches, DEFAULT_HIGH_RISK_LIMIT)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(top, vec!["m3", "m4", "m1"]);

        assert_eq!(high_risk_matches(&matches, 1).len(), 1);
    }
}
