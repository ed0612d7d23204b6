use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use backoffice_models::{Bet, BetStatus, Match, MatchOdds, MatchStatus, RiskLevel};
use backoffice_services::{compute_dashboard_stats, compute_risk_metrics, MatchQuery};

fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 17, 16, 30, 0).unwrap()
}

fn create_test_match(id: &str, home: &str, away: &str, status: MatchStatus) -> Match {
    Match::new(
        id,
        home,
        away,
        "Premier League",
        kickoff(),
        status,
        MatchOdds::new(dec!(2.2), Some(dec!(3.4)), dec!(3.1)).unwrap(),
        RiskLevel::Medium,
    )
}

fn create_test_bet(id: &str, match_id: &str, stake: Decimal, potential_win: Decimal, status: BetStatus) -> Bet {
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
        placed_at: kickoff() - Duration::hours(2),
        settled_at: None,
    }
}

#[test]
fn test_empty_input_is_high_risk() {
    let stats = compute_dashboard_stats(&[], &[]);

    assert_eq!(stats.total_matches, 0);
    assert_eq!(stats.live_matches, 0);
    assert_eq!(stats.total_bets, 0);
    assert_eq!(stats.total_stake, Decimal::ZERO);
    assert_eq!(stats.total_profit, Decimal::ZERO);
    assert_eq!(stats.risk_level, RiskLevel::High);
}

#[test]
fn test_won_bet_is_deducted_from_profit() {
    let bets = vec![create_test_bet("bet_1", "match_1", dec!(100), dec!(150), BetStatus::Won)];
    let stats = compute_dashboard_stats(&[], &bets);

    assert_eq!(stats.total_stake, dec!(100));
    assert_eq!(stats.total_profit, dec!(-50));
    assert_eq!(stats.risk_level, RiskLevel::High);
}

#[test]
fn test_risk_by_match_has_every_match() {
    let matches = vec![
        create_test_match("match_1", "Arsenal", "Chelsea", MatchStatus::Live),
        create_test_match("match_2", "Liverpool", "Everton", MatchStatus::Prematch),
        create_test_match("match_3", "Newcastle", "Brighton", MatchStatus::Finished),
    ];
    let bets = vec![create_test_bet("bet_1", "match_2", dec!(20), dec!(64), BetStatus::Pending)];

    let metrics = compute_risk_metrics(&matches, &bets);

    assert_eq!(metrics.risk_by_match.len(), matches.len());
    assert_eq!(metrics.risk_by_match["match_1"], Decimal::ZERO);
    assert_eq!(metrics.risk_by_match["match_2"], dec!(64));
    assert_eq!(metrics.risk_by_match["match_3"], Decimal::ZERO);
}

#[test]
fn test_exposure_counts_every_status() {
    let bets = vec![
        create_test_bet("bet_1", "match_1", dec!(100), dec!(150), BetStatus::Won),
        create_test_bet("bet_2", "match_1", dec!(100), dec!(300), BetStatus::Pending),
        create_test_bet("bet_3", "match_1", dec!(100), dec!(220), BetStatus::Lost),
    ];

    let metrics = compute_risk_metrics(&[], &bets);
    let stats = compute_dashboard_stats(&[], &bets);

    assert_eq!(metrics.total_exposure, dec!(370));
    // Dashboard profit only deducts the won payout
    assert_eq!(stats.total_profit, dec!(150));
    assert_ne!(metrics.total_exposure, -stats.total_profit);
}

#[test]
fn test_search_is_case_insensitive() {
    let matches = vec![
        create_test_match("match_1", "Arsenal", "Tottenham", MatchStatus::Live),
        create_test_match("match_2", "Chelsea", "Fulham", MatchStatus::Live),
    ];

    let found = MatchQuery::new().search("ARse").apply(&matches);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].home_team, "Arsenal");

    let everything = MatchQuery::new().search("").apply(&matches);
    assert_eq!(everything, matches);
}

#[test]
fn test_prematch_view_orders_by_start_time() {
    let mut later = create_test_match("match_a", "Leeds", "Burnley", MatchStatus::Prematch);
    later.start_time = kickoff() + Duration::hours(2);
    let earliest = create_test_match("match_b", "Wolves", "Fulham", MatchStatus::Prematch);
    let mut middle = create_test_match("match_c", "Everton", "Brentford", MatchStatus::Prematch);
    middle.start_time = kickoff() + Duration::hours(1);

    let ordered = MatchQuery::prematch("", None).apply(&[later, earliest, middle]);
    let times: Vec<DateTime<Utc>> = ordered.iter().map(|m| m.start_time).collect();

    assert_eq!(
        times,
        vec![kickoff(), kickoff() + Duration::hours(1), kickoff() + Duration::hours(2)]
    );
}

#[test]
fn test_aggregation_is_idempotent() {
    let matches = vec![
        create_test_match("match_1", "Arsenal", "Chelsea", MatchStatus::Live),
        create_test_match("match_2", "Sevilla", "Valencia", MatchStatus::Postponed),
    ];
    let bets = vec![
        create_test_bet("bet_1", "match_1", dec!(35), dec!(87.50), BetStatus::Won),
        create_test_bet("bet_2", "match_2", dec!(12), dec!(40.80), BetStatus::Void),
    ];
    let matches_before = matches.clone();
    let bets_before = bets.clone();

    assert_eq!(compute_dashboard_stats(&matches, &bets), compute_dashboard_stats(&matches, &bets));
    assert_eq!(compute_risk_metrics(&matches, &bets), compute_risk_metrics(&matches, &bets));
    assert_eq!(matches, matches_before);
    assert_eq!(bets, bets_before);
}

fn status_strategy() -> impl Strategy<Value = BetStatus> {
    prop_oneof![
        Just(BetStatus::Pending),
        Just(BetStatus::Won),
        Just(BetStatus::Lost),
        Just(BetStatus::Void),
    ]
}

fn bets_strategy(match_count: usize) -> impl Strategy<Value = Vec<Bet>> {
    prop::collection::vec(
        (0..match_count + 2, 1i64..100_000, 100i64..1_000, status_strategy()),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (target, stake_cents, odds_hundredths, status))| {
                let stake = Decimal::new(stake_cents, 2);
                let odds = Decimal::new(odds_hundredths, 2);
                let mut bet = Bet::new(
                    format!("bet_{}", i),
                    "user_1",
                    format!("match_{}", target),
                    "1X2",
                    "Draw",
                    odds,
                    stake,
                    kickoff(),
                )
                .unwrap();
                bet.status = status;
                bet
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_risk_by_match_covers_matches(match_count in 0usize..8, bets in bets_strategy(8)) {
        let matches: Vec<Match> = (0..match_count)
            .map(|i| create_test_match(&format!("match_{}", i), "Home", "Away", MatchStatus::Prematch))
            .collect();

        let metrics = compute_risk_metrics(&matches, &bets);
        prop_assert_eq!(metrics.risk_by_match.len(), matches.len());
        prop_assert_eq!(metrics.active_matches, matches.len());

        let bucketed: Decimal = metrics.risk_by_match.values().copied().sum();
        let known: Decimal = bets
            .iter()
            .filter(|b| matches.iter().any(|m| m.id == b.match_id))
            .map(|b| b.potential_win)
            .sum();
        prop_assert_eq!(bucketed, known);
    }

    #[test]
    fn prop_exposure_identity(bets in bets_strategy(4)) {
        let metrics = compute_risk_metrics(&[], &bets);
        let stake: Decimal = bets.iter().map(|b| b.stake).sum();
        let payout: Decimal = bets.iter().map(|b| b.potential_win).sum();

        prop_assert_eq!(metrics.total_exposure, payout - stake);
        prop_assert!(bets.iter().all(|b| b.potential_win <= metrics.largest_payout));
    }

    #[test]
    fn prop_dashboard_profit_only_deducts_won(bets in bets_strategy(4)) {
        let stats = compute_dashboard_stats(&[], &bets);
        let won: Decimal = bets.iter().filter(|b| b.is_won()).map(|b| b.potential_win).sum();

        prop_assert_eq!(stats.total_profit, stats.total_stake - won);
        prop_assert_eq!(stats.total_bets, bets.len());
    }
}
