//! Value Objects for the print shop

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CURRENCY: &str = "RUB";
const DEFAULT_QUANTITY: u32 = 100;

/// Money value object, in whole currency units.
///
/// Prices are always rounded to an integer before they become `Money`, so
/// there is no fractional part to carry around.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: u64, currency: String }

impl Money {
    pub fn new(amount: u64, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn rub(amount: u64) -> Self { Self::new(amount, DEFAULT_CURRENCY) }
    pub fn zero(currency: &str) -> Self { Self::new(0, currency) }
    pub fn amount(&self) -> u64 { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_zero(&self) -> bool { self.amount == 0 }

    fn symbol(&self) -> &str {
        match self.currency.as_str() { "RUB" => "₽", "USD" => "$", "EUR" => "€", other => other }
    }
}

impl Default for Money { fn default() -> Self { Self::zero(DEFAULT_CURRENCY) } }

/// Renders `7200` as `7 200 ₽`, grouping thousands with a no-break space.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", group_thousands(self.amount), self.symbol())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 { out.push('\u{a0}'); }
        out.push(ch);
    }
    out
}

/// Print run size. Never below one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Clamps anything below one up to one.
    pub fn new(value: i64) -> Self { Self(value.clamp(1, u32::MAX as i64) as u32) }

    /// Lenient parse of a raw text field. Leading digits win (`"12pcs"` is 12),
    /// garbage or an empty field becomes 1.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(_) if negative => Self(1),
            Ok(n) => Self::new(n as i64),
            Err(_) if !digits.is_empty() => Self(u32::MAX),
            Err(_) => Self(1),
        }
    }

    pub fn value(&self) -> u32 { self.0 }
}

impl Default for Quantity { fn default() -> Self { Self(DEFAULT_QUANTITY) } }

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}
