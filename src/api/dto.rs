//! Request and response bodies.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::{AttachedFile, OrderSummary, OrderWizard, PriceCalculator, Quote, WizardStep};
use crate::domain::catalog::{Material, Product};
use crate::domain::events::Notification;
use crate::domain::pricing::VolumeDiscount;
use crate::domain::upload::FileHandle;
use crate::domain::value_objects::{Money, Quantity};
use crate::{PrintShopError, Result};

/// Quantity arrives either as a number or as the raw text of the input box.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityInput {
    pub quantity: Option<i64>,
    pub quantity_input: Option<String>,
}

impl QuantityInput {
    pub fn resolve(&self) -> Result<Option<Quantity>> {
        match (self.quantity, self.quantity_input.as_deref()) {
            (Some(_), Some(_)) => Err(PrintShopError::InvalidRequest("send either quantity or quantity_input, not both".into())),
            (Some(n), None) => Ok(Some(Quantity::new(n))),
            (None, Some(raw)) => Ok(Some(Quantity::from_input(raw))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectProductRequest {
    #[validate(length(min = 1, max = 64))]
    pub product: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ParametersRequest {
    #[validate(length(min = 1, max = 64))]
    pub size: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub material: Option<String>,
    #[serde(flatten)]
    pub quantity: QuantityInput,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AttachFileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 127))]
    pub content_type: String,
    /// Size as reported by the picker. Defaults to the decoded content length.
    pub size: Option<u64>,
    /// Base64 file content. Optional; without it images get no preview.
    pub content: Option<String>,
}

impl AttachFileRequest {
    pub fn into_handle(self) -> Result<FileHandle> {
        let content = self
            .content
            .map(|encoded| STANDARD.decode(encoded.trim()))
            .transpose()
            .map_err(|e| PrintShopError::InvalidRequest(format!("content is not valid base64: {e}")))?;
        let size = match (self.size, content.as_ref()) {
            (Some(size), _) => size,
            (None, Some(bytes)) => bytes.len() as u64,
            (None, None) => return Err(PrintShopError::InvalidRequest("size or content is required".into())),
        };
        let handle = FileHandle::new(self.name, size, self.content_type);
        Ok(match content {
            Some(bytes) => handle.with_content(bytes),
            None => handle,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CalculatorForm {
    #[validate(length(max = 64))]
    pub product: Option<String>,
    #[validate(length(max = 64))]
    pub material: Option<String>,
    #[serde(flatten)]
    pub quantity: QuantityInput,
}

impl CalculatorForm {
    pub fn into_calculator(self) -> Result<PriceCalculator> {
        let mut calc = PriceCalculator::new();
        if let Some(product) = &self.product { calc.select_product(product)?; }
        if let Some(material) = &self.material { calc.select_material(material)?; }
        if let Some(quantity) = self.quantity.resolve()? { calc.set_quantity(quantity); }
        Ok(calc)
    }
}

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub product: Option<&'static str>,
    pub size: Option<&'static str>,
    pub quantity: u32,
    pub material: Option<&'static str>,
    pub file: Option<AttachedFile>,
    pub total: Money,
    pub formatted_total: String,
    pub discount_percent: u32,
    pub preliminary_total: Option<String>,
    pub summary: Option<OrderSummary>,
    pub notifications: Vec<Notification>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// Snapshots the wizard and drains its pending notifications.
    pub fn drain(w: &mut OrderWizard) -> Self {
        let total = w.total();
        Self {
            id: w.id(),
            step: w.step(),
            step_number: w.step().number(),
            product: w.product().map(|p| p.id),
            size: w.size().map(|s| s.id),
            quantity: w.quantity().value(),
            material: w.material().map(|m| m.id),
            file: w.file().cloned(),
            formatted_total: total.to_string(),
            total,
            discount_percent: w.discount().percent(),
            preliminary_total: w.preliminary_total().map(|m| m.to_string()),
            summary: w.summary(),
            notifications: w.take_notifications(),
            updated_at: w.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculatorView {
    pub product: Option<&'static str>,
    pub material: Option<&'static str>,
    pub quantity: u32,
    pub total: Money,
    pub formatted_total: String,
    pub discount_percent: u32,
    pub can_submit: bool,
}

impl From<&PriceCalculator> for CalculatorView {
    fn from(calc: &PriceCalculator) -> Self {
        let total = calc.total();
        Self {
            product: calc.product().map(|p| p.id),
            material: calc.material().map(|m| m.id),
            quantity: calc.quantity().value(),
            formatted_total: if total.is_zero() { "—".to_string() } else { total.to_string() },
            total,
            discount_percent: calc.discount().percent(),
            can_submit: calc.can_submit(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub quote: Quote,
    pub formatted_total: String,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize)]
pub struct DiscountTier {
    pub min_quantity: u32,
    pub percent: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: &'static [Product],
    pub materials: &'static [Material],
    pub discounts: Vec<DiscountTier>,
    pub accepted_types: &'static [&'static str],
    pub max_file_bytes: u64,
}

impl CatalogResponse {
    pub fn current() -> Self {
        Self {
            products: crate::domain::catalog::PRODUCTS,
            materials: crate::domain::catalog::MATERIALS,
            discounts: VolumeDiscount::TIERS
                .iter()
                .map(|(min_quantity, tier)| DiscountTier { min_quantity: *min_quantity, percent: tier.percent() })
                .collect(),
            accepted_types: &crate::domain::upload::ACCEPTED_TYPES,
            max_file_bytes: crate::domain::upload::MAX_FILE_BYTES,
        }
    }
}
