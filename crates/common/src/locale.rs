//! Locale-aware amount parsing and formatting.
//!
//! Operators type amounts the way they are written locally (`1.250.000,50` in
//! Turkish notation). These helpers turn that text into a canonical `Decimal`
//! and render numbers back for display. Nothing here does arithmetic beyond the
//! final two-decimal rounding.

use std::str::FromStr;

use rust_decimal::prelude::*;
use thiserror::Error;

/// Why a typed amount could not be turned into a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a valid number")]
    Invalid(String),

    #[error("amount must not be negative")]
    Negative,
}

/// Thousands and decimal separators for one notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub thousands_sep: char,
    pub decimal_sep: char,
}

impl LocaleFormat {
    /// `1.234.567,89`
    pub const TURKISH: LocaleFormat = LocaleFormat {
        thousands_sep: '.',
        decimal_sep: ',',
    };

    /// `1,234,567.89`
    pub const ENGLISH: LocaleFormat = LocaleFormat {
        thousands_sep: ',',
        decimal_sep: '.',
    };

    /// Parse operator input into an exact decimal amount.
    ///
    /// Thousands separators are dropped wherever they appear, the decimal
    /// separator becomes `.`, and the result must be a non-negative number.
    pub fn parse_amount(&self, input: &str) -> Result<Decimal, AmountParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let canonical: String = trimmed
            .chars()
            .filter(|c| *c != self.thousands_sep)
            .map(|c| if c == self.decimal_sep { '.' } else { c })
            .collect();

        let value = Decimal::from_str(&canonical)
            .map_err(|_| AmountParseError::Invalid(trimmed.to_string()))?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountParseError::Negative);
        }
        Ok(value)
    }

    /// Render a monetary amount with two decimals, rounding half away from zero.
    pub fn format_amount(&self, value: Decimal) -> String {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        self.group(&format!("{:.2}", rounded))
    }

    /// Render a float (market price, percent) with the given number of decimals.
    pub fn format_float(&self, value: f64, decimals: usize) -> String {
        self.group(&format!("{:.*}", decimals, value))
    }

    /// Percent display used on cards: `%+4,05`, `%-1,20`.
    pub fn format_percent(&self, value: f64, decimals: usize) -> String {
        let body = self.format_float(value.abs(), decimals);
        let negative = value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
        format!("%{}{}", if negative { '-' } else { '+' }, body)
    }

    /// Percent display for exact rates, rounded half away from zero.
    pub fn format_rate(&self, value: Decimal, decimals: u32) -> String {
        let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let body = self.group(&format!("{:.*}", decimals as usize, rounded.abs()));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { '-' } else { '+' };
        format!("%{}{}", sign, body)
    }

    /// Insert thousands separators into a `-1234.56`-shaped string and swap the
    /// decimal point for this locale's separator.
    fn group(&self, plain: &str) -> String {
        let (negative, digits) = match plain.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, plain),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3);
        for (idx, ch) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push(self.thousands_sep);
            }
            grouped.push(ch);
        }
        if let Some(frac) = frac_part {
            grouped.push(self.decimal_sep);
            grouped.push_str(frac);
        }

        // "-0,00" reads as a sign error on a dashboard
        let all_zero = digits.chars().all(|c| c == '0' || c == '.');
        if negative && !all_zero {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self::TURKISH
    }
}
