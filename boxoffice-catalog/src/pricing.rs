use rust_decimal::Decimal;

/// Apply a fractional discount to a seat price and round to currency
/// precision (2 decimal places, banker-free half-up rounding).
pub fn final_price(price: Decimal, discount: Decimal) -> Decimal {
    (price * (Decimal::ONE - discount)).round_dp_with_strategy(
        2,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}
