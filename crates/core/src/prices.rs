//! Prices

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{Currency, EUR, TRY, USD},
};
use thiserror::Error;

/// A monetary amount in a catalog currency.
pub type Amount = Money<'static, Currency>;

/// Errors raised while parsing or summing prices.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Price string is not `AMOUNT CURRENCY` or the amount is not a number.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Prices may not be negative.
    #[error("Negative price: {0}")]
    NegativePrice(String),

    /// Currency code is not supported.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Parse a price string (e.g. `"400 TRY"` or `"12.50 TRY"`) into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the
/// amount is negative or not a number, or if the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::NegativePrice(s.to_string()));
    }

    let currency = match code {
        "TRY" => TRY,
        "EUR" => EUR,
        "USD" => USD,
        other => return Err(PriceError::UnknownCurrency(other.to_string())),
    };

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| PriceError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Amount {
    Money::from_minor(0, currency)
}

/// Sum a sequence of amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`PriceError::Money`] if an amount is in a different currency.
pub fn total_price(
    currency: &'static Currency,
    amounts: impl IntoIterator<Item = Amount>,
) -> Result<Amount, PriceError> {
    let total = amounts
        .into_iter()
        .try_fold(zero(currency), |acc, amount| acc.add(amount))?;

    Ok(total)
}

/// Amount as a decimal number of major units (`40000` minor -> `400`).
pub fn to_major(amount: &Amount) -> Decimal {
    Decimal::new(amount.to_minor_units(), 2).normalize()
}

/// Render an amount rounded to whole currency units, e.g. `₺2900`.
pub fn format_whole(amount: &Amount) -> String {
    let whole = to_major(amount).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    format!("{}{whole}", amount.currency().symbol)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_whole_lira() -> TestResult {
        let (minor, currency) = parse_price("400 TRY")?;

        assert_eq!(minor, 40_000);
        assert_eq!(currency, TRY);

        Ok(())
    }

    #[test]
    fn parse_price_reads_fractional_amounts() -> TestResult {
        let (minor, currency) = parse_price("12.50 EUR")?;

        assert_eq!(minor, 1_250);
        assert_eq!(currency, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(
            parse_price("400TRY"),
            Err(PriceError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("400 TRY extra"),
            Err(PriceError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("four TRY"),
            Err(PriceError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        assert!(matches!(
            parse_price("-5 TRY"),
            Err(PriceError::NegativePrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("10 ABC");

        assert!(matches!(result, Err(PriceError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        assert_eq!(total_price(TRY, [])?, zero(TRY));

        Ok(())
    }

    #[test]
    fn total_price_sums_amounts() -> TestResult {
        let total = total_price(
            TRY,
            [Money::from_minor(40_000, TRY), Money::from_minor(250_000, TRY)],
        )?;

        assert_eq!(total, Money::from_minor(290_000, TRY));

        Ok(())
    }

    #[test]
    fn total_price_rejects_mixed_currencies() {
        let result = total_price(TRY, [Money::from_minor(100, USD)]);

        assert!(matches!(result, Err(PriceError::Money(_))));
    }

    #[test]
    fn to_major_drops_trailing_zeros() {
        assert_eq!(to_major(&Money::from_minor(40_000, TRY)), Decimal::new(400, 0));
        assert_eq!(to_major(&Money::from_minor(1_250, TRY)), Decimal::new(125, 1));
    }

    #[test]
    fn format_whole_rounds_to_currency_units() {
        let formatted = format_whole(&Money::from_minor(125_050, TRY));

        assert!(formatted.ends_with("1251"), "got {formatted}");
    }
}
