//! Price Calculator
//!
//! A flat form: product, quantity and material. No sizes, no artwork, no
//! steps. Submitting is only possible once the form prices above zero.

use serde::Serialize;
use std::fmt;

use crate::domain::catalog::{self, Material, Product};
use crate::domain::events::Notification;
use crate::domain::pricing::{self, VolumeDiscount};
use crate::domain::value_objects::{Money, Quantity};

pub const LEAD_TIME: &str = "2-3 business days";

#[derive(Clone, Debug, Default)]
pub struct PriceCalculator {
    product: Option<&'static Product>,
    quantity: Quantity,
    material: Option<&'static Material>,
    notifications: Vec<Notification>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub product: &'static str,
    pub quantity: u32,
    pub material: &'static str,
    pub total: Money,
    pub lead_time: &'static str,
}

impl PriceCalculator {
    pub fn new() -> Self { Self::default() }

    pub fn product(&self) -> Option<&'static Product> { self.product }
    pub fn material(&self) -> Option<&'static Material> { self.material }
    pub fn quantity(&self) -> Quantity { self.quantity }

    /// An empty id clears the selection.
    pub fn select_product(&mut self, id: &str) -> Result<(), CalculatorError> {
        self.product = match id {
            "" => None,
            id => Some(catalog::product(id).ok_or_else(|| CalculatorError::UnknownProduct(id.to_string()))?),
        };
        Ok(())
    }

    pub fn select_material(&mut self, id: &str) -> Result<(), CalculatorError> {
        self.material = match id {
            "" => None,
            id => Some(catalog::material(id).ok_or_else(|| CalculatorError::UnknownMaterial(id.to_string()))?),
        };
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: Quantity) { self.quantity = quantity; }

    pub fn total(&self) -> Money {
        Money::rub(pricing::calculator_price(self.product, self.material, self.quantity.value()))
    }

    pub fn discount(&self) -> VolumeDiscount { VolumeDiscount::for_quantity(self.quantity.value()) }

    pub fn can_submit(&self) -> bool { !self.total().is_zero() }

    pub fn submit(&mut self) -> Result<Quote, CalculatorError> {
        let (product, material) = match (self.product, self.material) {
            (Some(p), Some(m)) if self.can_submit() => (p, m),
            _ => return Err(CalculatorError::Incomplete),
        };
        let total = self.total();
        self.notifications.push(Notification::success(
            "Order request received",
            Some(format!("{} × {} for {total}, ready in {LEAD_TIME}", product.calculator_label, self.quantity)),
        ));
        Ok(Quote { product: product.calculator_label, quantity: self.quantity.value(), material: material.label, total, lead_time: LEAD_TIME })
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> { std::mem::take(&mut self.notifications) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError { UnknownProduct(String), UnknownMaterial(String), Incomplete }
impl std::error::Error for CalculatorError {}
impl fmt::Display for CalculatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProduct(id) => write!(f, "Unknown product {id:?}"),
            Self::UnknownMaterial(id) => write!(f, "Unknown material {id:?}"),
            Self::Incomplete => write!(f, "Select a product and a material first"),
        }
    }
}
