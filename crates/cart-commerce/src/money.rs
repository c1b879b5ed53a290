//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues when multiplying prices by quantities and summing lines.
//! Prices arrive from the backend as decimals and are converted once.

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Locale the currency is normally written in.
    pub fn native_locale(&self) -> Locale {
        match self {
            Currency::BRL => Locale::PtBr,
            Currency::USD | Currency::EUR => Locale::En,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, rounding to the nearest cent.
    ///
    /// ```
    /// use cart_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(179.9, Currency::BRL);
    /// assert_eq!(price.amount_cents, 17990);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Try to add another Money value.
    ///
    /// Returns `None` if currencies don't match or the sum overflows.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let sum = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(sum, self.currency))
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let product = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(product, self.currency))
    }

    /// Sum an iterator of Money values.
    ///
    /// Returns `None` on currency mismatch or overflow.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Format for display in the given locale (e.g., "R$ 1.234,56").
    pub fn format(&self, locale: Locale) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let abs = self.amount_cents.unsigned_abs();
        let whole = group_digits(abs / divisor, locale.group_separator());
        let frac = abs % divisor;

        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let gap = match locale {
            Locale::PtBr => " ",
            Locale::En => "",
        };
        format!(
            "{sign}{symbol}{gap}{whole}{sep}{frac:0width$}",
            symbol = self.currency.symbol(),
            sep = locale.decimal_separator(),
            width = places as usize,
        )
    }

    /// Format in the currency's own locale.
    pub fn display(&self) -> String {
        self.format(self.currency.native_locale())
    }
}

fn group_digits(mut value: u64, separator: char) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(&separator.to_string())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(139.9, Currency::BRL);
        assert_eq!(m.amount_cents, 13990);

        let m = Money::from_decimal(0.1 + 0.2, Currency::BRL);
        assert_eq!(m.amount_cents, 30);
    }

    #[test]
    fn test_money_format_pt_br() {
        let m = Money::new(17990, Currency::BRL);
        assert_eq!(m.format(Locale::PtBr), "R$ 179,90");

        let m = Money::new(123456789, Currency::BRL);
        assert_eq!(m.display(), "R$ 1.234.567,89");

        let m = Money::new(-5, Currency::BRL);
        assert_eq!(m.display(), "-R$ 0,05");
    }

    #[test]
    fn test_money_format_en() {
        let m = Money::new(123456, Currency::USD);
        assert_eq!(m.display(), "$1,234.56");
        assert_eq!(Money::new(17990, Currency::BRL).format(Locale::En), "R$179.90");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000, Currency::BRL);
        let b = Money::new(500, Currency::BRL);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1500);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::BRL).try_multiply(2).is_none());
    }

    #[test]
    fn test_money_currency_mismatch() {
        let brl = Money::new(1000, Currency::BRL);
        let eur = Money::new(1000, Currency::EUR);
        assert!(brl.try_add(&eur).is_none());
        assert!(Money::try_sum([brl, eur].iter(), Currency::BRL).is_none());
    }
}
