//! Print run pricing
//!
//! `price = round(base × quantity × size × material × volume discount)`.
//! The result is a whole number of currency units and is zero whenever a
//! selection is missing, which callers use as the "incomplete form" signal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::catalog::{Material, Product, Size};

/// Volume discount tiers. Tiers are exclusive and checked from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeDiscount {
    None,
    TenPercent,
    FifteenPercent,
    TwentyPercent,
}

impl VolumeDiscount {
    pub const TIERS: [(u32, VolumeDiscount); 3] = [
        (1000, VolumeDiscount::TwentyPercent),
        (500, VolumeDiscount::FifteenPercent),
        (200, VolumeDiscount::TenPercent),
    ];

    pub fn for_quantity(quantity: u32) -> Self {
        Self::TIERS
            .iter()
            .find(|(threshold, _)| quantity >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(VolumeDiscount::None)
    }

    pub fn factor(&self) -> Decimal {
        match self {
            Self::None => Decimal::ONE,
            Self::TenPercent => Decimal::new(9, 1),
            Self::FifteenPercent => Decimal::new(85, 2),
            Self::TwentyPercent => Decimal::new(8, 1),
        }
    }

    pub fn percent(&self) -> u32 {
        match self { Self::None => 0, Self::TenPercent => 10, Self::FifteenPercent => 15, Self::TwentyPercent => 20 }
    }
}

/// Wizard price: product, size and material must all be resolved.
pub fn price(product: Option<&Product>, size: Option<&Size>, material: Option<&Material>, quantity: u32) -> u64 {
    match (product, size, material) {
        (Some(p), Some(s), Some(m)) => compute(p.base_price, &[s.multiplier, m.multiplier], quantity),
        _ => 0,
    }
}

/// Calculator price: the same formula without a size dimension.
pub fn calculator_price(product: Option<&Product>, material: Option<&Material>, quantity: u32) -> u64 {
    match (product, material) {
        (Some(p), Some(m)) => compute(p.base_price, &[m.multiplier], quantity),
        _ => 0,
    }
}

fn compute(base_price: Decimal, multipliers: &[Decimal], quantity: u32) -> u64 {
    if quantity < 1 { return 0; }
    let raw = multipliers.iter().fold(base_price * Decimal::from(quantity), |acc, m| acc * *m);
    let discounted = raw * VolumeDiscount::for_quantity(quantity).factor();
    // Non-negative, so away-from-zero is round-half-up.
    discounted
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}
