use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest stake accepted on a single bet or match total. Keeps sums over
/// any realistic collection inside `Decimal` range.
pub const MAX_STAKE: Decimal = dec!(1000000000);

/// Largest decimal odds accepted on a bet or match quote.
pub const MAX_ODDS: Decimal = dec!(10000);

/// Rounds to two decimal places, halves away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(12.345)), dec!(12.35));
        assert_eq!(round_cents(dec!(-12.345)), dec!(-12.35));
        assert_eq!(round_cents(dec!(7.1)), dec!(7.10));
        assert_eq!(round_cents(dec!(3.14159)), dec!(3.14));
    }
}
