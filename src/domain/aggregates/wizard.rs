//! Order Wizard Aggregate
//!
//! Four linear steps: product, parameters, artwork, confirmation. Moving
//! forward is guarded by the current step's required inputs; moving back
//! (from steps 2 and 3) is always allowed and keeps every selection.
//! Step 4 is terminal apart from `reset`, and `confirm` only announces the
//! amount due.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{self, Material, Product, Size};
use crate::domain::events::Notification;
use crate::domain::pricing::{self, VolumeDiscount};
use crate::domain::upload::{self, FileHandle, PreviewError, UploadRejection};
use crate::domain::value_objects::{Money, Quantity};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep { #[default] SelectProduct, SelectParameters, UploadFile, Confirm }

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self { Self::SelectProduct => 1, Self::SelectParameters => 2, Self::UploadFile => 3, Self::Confirm => 4 }
    }

    fn next(&self) -> Option<Self> {
        match self {
            Self::SelectProduct => Some(Self::SelectParameters),
            Self::SelectParameters => Some(Self::UploadFile),
            Self::UploadFile => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            Self::SelectParameters => Some(Self::SelectProduct),
            Self::UploadFile => Some(Self::SelectParameters),
            Self::SelectProduct | Self::Confirm => None,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "step {} of 4", self.number()) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field { Product, Size, Material, File }

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self { Self::Product => "product", Self::Size => "size", Self::Material => "material", Self::File => "file" };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AttachedFile {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub preview: Option<String>,
}

/// Work order for an image preview. Completing it is only honoured while
/// its generation is still the current upload.
#[derive(Clone, Debug)]
pub struct PreviewJob {
    pub generation: u64,
    content_type: String,
    content: Option<Arc<[u8]>>,
}

impl PreviewJob {
    pub fn render(&self) -> Result<String, PreviewError> {
        upload::render_preview(&self.content_type, self.content.as_deref())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderSummary {
    pub product: &'static str,
    pub size: &'static str,
    pub quantity: u32,
    pub material: &'static str,
    pub file_name: String,
    pub total: Money,
}

#[derive(Clone, Debug)]
pub struct OrderWizard {
    id: Uuid,
    step: WizardStep,
    product: Option<&'static Product>,
    size: Option<&'static Size>,
    quantity: Quantity,
    material: Option<&'static Material>,
    file: Option<AttachedFile>,
    upload_generation: u64,
    notifications: Vec<Notification>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for OrderWizard { fn default() -> Self { Self::new() } }

impl OrderWizard {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), step: WizardStep::SelectProduct, product: None, size: None,
            quantity: Quantity::default(), material: None, file: None, upload_generation: 0,
            notifications: vec![], created_at: now, updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn step(&self) -> WizardStep { self.step }
    pub fn product(&self) -> Option<&'static Product> { self.product }
    pub fn size(&self) -> Option<&'static Size> { self.size }
    pub fn quantity(&self) -> Quantity { self.quantity }
    pub fn material(&self) -> Option<&'static Material> { self.material }
    pub fn file(&self) -> Option<&AttachedFile> { self.file.as_ref() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn total(&self) -> Money {
        Money::rub(pricing::price(self.product, self.size, self.material, self.quantity.value()))
    }

    pub fn discount(&self) -> VolumeDiscount { VolumeDiscount::for_quantity(self.quantity.value()) }

    /// Running total shown while parameters and artwork are being chosen.
    pub fn preliminary_total(&self) -> Option<Money> {
        let total = self.total();
        matches!(self.step, WizardStep::SelectParameters | WizardStep::UploadFile)
            .then_some(total)
            .filter(|t| !t.is_zero())
    }

    pub fn summary(&self) -> Option<OrderSummary> {
        if self.step != WizardStep::Confirm { return None; }
        Some(OrderSummary {
            product: self.product?.label,
            size: self.size?.label,
            quantity: self.quantity.value(),
            material: self.material?.label,
            file_name: self.file.as_ref()?.name.clone(),
            total: self.total(),
        })
    }

    /// Choosing a product always clears the size, since sizes belong to one product.
    pub fn select_product(&mut self, id: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::SelectProduct, "select product")?;
        let product = catalog::product(id).ok_or_else(|| WizardError::UnknownProduct(id.to_string()))?;
        self.product = Some(product);
        self.size = None;
        self.touch();
        Ok(())
    }

    pub fn select_size(&mut self, id: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::SelectParameters, "select size")?;
        let product = self.product.ok_or(WizardError::MissingSelection(vec![Field::Product]))?;
        let size = product.size(id).ok_or_else(|| WizardError::UnknownSize { product: product.id, size: id.to_string() })?;
        self.size = Some(size);
        self.touch();
        Ok(())
    }

    pub fn select_material(&mut self, id: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::SelectParameters, "select material")?;
        let material = catalog::material(id).ok_or_else(|| WizardError::UnknownMaterial(id.to_string()))?;
        self.material = Some(material);
        self.touch();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: Quantity) -> Result<(), WizardError> {
        self.require_step(WizardStep::SelectParameters, "set quantity")?;
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Applies size, material and quantity together: every id is resolved
    /// before anything changes, so a bad one leaves the wizard untouched.
    pub fn set_parameters(&mut self, size: Option<&str>, material: Option<&str>, quantity: Option<Quantity>) -> Result<(), WizardError> {
        self.require_step(WizardStep::SelectParameters, "set parameters")?;
        let product = self.product.ok_or(WizardError::MissingSelection(vec![Field::Product]))?;
        let size = size
            .map(|id| product.size(id).ok_or_else(|| WizardError::UnknownSize { product: product.id, size: id.to_string() }))
            .transpose()?;
        let material = material
            .map(|id| catalog::material(id).ok_or_else(|| WizardError::UnknownMaterial(id.to_string())))
            .transpose()?;
        if let Some(size) = size { self.size = Some(size); }
        if let Some(material) = material { self.material = Some(material); }
        if let Some(quantity) = quantity { self.quantity = quantity; }
        self.touch();
        Ok(())
    }

    /// Replaces any attached file. Returns a preview job for images.
    pub fn attach_file(&mut self, handle: FileHandle) -> Result<Option<PreviewJob>, WizardError> {
        self.require_step(WizardStep::UploadFile, "attach file")?;
        if let Err(rejection) = upload::validate(&handle) {
            self.notify(Notification::error(rejection.title(), Some(rejection.hint().to_string())));
            return Err(WizardError::Rejected(rejection));
        }
        self.upload_generation += 1;
        self.notify(Notification::success("File uploaded", Some(format!("{} ({})", handle.name, handle.display_size()))));
        let job = handle.is_image().then(|| PreviewJob {
            generation: self.upload_generation,
            content_type: handle.content_type.clone(),
            content: handle.content.clone(),
        });
        self.file = Some(AttachedFile { name: handle.name, size: handle.size, content_type: handle.content_type, preview: None });
        self.touch();
        Ok(job)
    }

    /// Applies a finished preview. Returns false when the job was superseded.
    pub fn complete_preview(&mut self, generation: u64, preview: Result<String, PreviewError>) -> bool {
        match self.file.as_mut() {
            Some(file) if generation == self.upload_generation => {
                file.preview = preview.ok();
                self.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    pub fn remove_file(&mut self) -> Result<(), WizardError> {
        self.require_step(WizardStep::UploadFile, "remove file")?;
        if self.file.take().is_some() {
            self.upload_generation += 1;
            self.notify(Notification::info("File removed"));
            self.touch();
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::NotAvailable { action: "next", step: self.step })?;
        let missing = self.missing_for_current_step();
        if !missing.is_empty() {
            let title = match self.step {
                WizardStep::SelectProduct => "Select a product type",
                WizardStep::SelectParameters => "Fill in all parameters",
                _ => "Upload your artwork",
            };
            self.notify(Notification::error(title, Some(format!("Missing: {}", join_fields(&missing)))));
            return Err(WizardError::MissingSelection(missing));
        }
        self.step = next;
        self.touch();
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::NotAvailable { action: "back", step: self.step })?;
        self.step = previous;
        self.touch();
        Ok(previous)
    }

    /// Starts over from step 1 with nothing selected.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        self.require_step(WizardStep::Confirm, "reset")?;
        self.step = WizardStep::SelectProduct;
        self.product = None;
        self.size = None;
        self.quantity = Quantity::default();
        self.material = None;
        self.file = None;
        self.upload_generation += 1;
        self.touch();
        Ok(())
    }

    /// Announces the amount due. No payment is taken and the step stays put.
    pub fn confirm(&mut self) -> Result<Money, WizardError> {
        self.require_step(WizardStep::Confirm, "confirm")?;
        let total = self.total();
        self.touch();
        self.notify(Notification::success("Order placed!", Some(format!("Amount due: {total}"))));
        Ok(total)
    }

    /// Counts as activity without changing anything, e.g. a client polling for its preview.
    pub fn keep_alive(&mut self) { self.touch(); }

    pub fn take_notifications(&mut self) -> Vec<Notification> { std::mem::take(&mut self.notifications) }

    fn missing_for_current_step(&self) -> Vec<Field> {
        match self.step {
            WizardStep::SelectProduct => self.product.is_none().then_some(Field::Product).into_iter().collect(),
            WizardStep::SelectParameters => [(self.size.is_none(), Field::Size), (self.material.is_none(), Field::Material)]
                .into_iter()
                .filter_map(|(missing, field)| missing.then_some(field))
                .collect(),
            WizardStep::UploadFile => self.file.is_none().then_some(Field::File).into_iter().collect(),
            WizardStep::Confirm => vec![],
        }
    }

    fn require_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != expected { return Err(WizardError::NotAvailable { action, step: self.step }); }
        Ok(())
    }

    fn notify(&mut self, n: Notification) { self.notifications.push(n); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(Field::to_string).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    MissingSelection(Vec<Field>),
    NotAvailable { action: &'static str, step: WizardStep },
    UnknownProduct(String),
    UnknownSize { product: &'static str, size: String },
    UnknownMaterial(String),
    Rejected(UploadRejection),
}

impl std::error::Error for WizardError {}
impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSelection(fields) => write!(f, "Missing selection: {}", join_fields(fields)),
            Self::NotAvailable { action, step } => write!(f, "Cannot {action} at {step}"),
            Self::UnknownProduct(id) => write!(f, "Unknown product {id:?}"),
            Self::UnknownSize { product, size } => write!(f, "Unknown size {size:?} for {product}"),
            Self::UnknownMaterial(id) => write!(f, "Unknown material {id:?}"),
            Self::Rejected(r) => write!(f, "File rejected: {r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::NotificationLevel;

    const MIB: u64 = 1024 * 1024;

    fn at_upload_step() -> OrderWizard {
        let mut w = OrderWizard::new();
        w.select_product("posters").unwrap();
        w.advance().unwrap();
        w.select_size("a3").unwrap();
        w.select_material("glossy").unwrap();
        w.set_quantity(Quantity::new(1000)).unwrap();
        w.advance().unwrap();
        w.take_notifications();
        w
    }

    fn at_confirm_step() -> OrderWizard {
        let mut w = at_upload_step();
        w.attach_file(FileHandle::new("poster.pdf", 10 * MIB, "application/pdf")).unwrap();
        w.advance().unwrap();
        w.take_notifications();
        w
    }

    #[test]
    fn test_advance_without_product_is_blocked() {
        let mut w = OrderWizard::new();
        assert_eq!(w.advance(), Err(WizardError::MissingSelection(vec![Field::Product])));
        assert_eq!(w.step(), WizardStep::SelectProduct);
        let notes = w.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].title, "Select a product type");
    }

    #[test]
    fn test_changing_product_resets_size() {
        let mut w = OrderWizard::new();
        w.select_product("posters").unwrap();
        w.advance().unwrap();
        w.select_size("a3").unwrap();
        w.back().unwrap();
        assert_eq!(w.size().unwrap().id, "a3");
        w.select_product("flyers").unwrap();
        assert_eq!(w.advance(), Ok(WizardStep::SelectParameters));
        assert!(w.size().is_none());
    }

    #[test]
    fn test_parameters_guard_names_missing_fields() {
        let mut w = OrderWizard::new();
        w.select_product("booklets").unwrap();
        w.advance().unwrap();
        assert_eq!(w.advance(), Err(WizardError::MissingSelection(vec![Field::Size, Field::Material])));
        w.select_size("a4").unwrap();
        assert_eq!(w.advance(), Err(WizardError::MissingSelection(vec![Field::Material])));
        let notes = w.take_notifications();
        assert_eq!(notes[1].description.as_deref(), Some("Missing: material"));
        assert_eq!(w.step(), WizardStep::SelectParameters);
    }

    #[test]
    fn test_size_must_belong_to_product() {
        let mut w = OrderWizard::new();
        w.select_product("business-cards").unwrap();
        w.advance().unwrap();
        assert!(matches!(w.select_size("a1"), Err(WizardError::UnknownSize { .. })));
        assert!(matches!(w.select_material("vinyl"), Err(WizardError::UnknownMaterial(_))));
    }

    #[test]
    fn test_inputs_are_gated_by_step() {
        let mut w = OrderWizard::new();
        assert!(matches!(w.select_material("matte"), Err(WizardError::NotAvailable { .. })));
        assert!(matches!(w.attach_file(FileHandle::new("a.pdf", 1, "application/pdf")), Err(WizardError::NotAvailable { .. })));
        assert!(matches!(w.back(), Err(WizardError::NotAvailable { .. })));
        assert!(matches!(w.confirm(), Err(WizardError::NotAvailable { .. })));
        assert!(matches!(w.reset(), Err(WizardError::NotAvailable { .. })));
    }

    #[test]
    fn test_upload_guard() {
        let mut w = at_upload_step();
        assert_eq!(w.advance(), Err(WizardError::MissingSelection(vec![Field::File])));
        assert_eq!(w.step(), WizardStep::UploadFile);
    }

    #[test]
    fn test_oversized_png_rejected() {
        let mut w = at_upload_step();
        let err = w.attach_file(FileHandle::new("big.png", 51 * MIB, "image/png")).unwrap_err();
        assert!(matches!(err, WizardError::Rejected(UploadRejection::TooLarge { .. })));
        assert!(w.file().is_none());
        let notes = w.take_notifications();
        assert_eq!(notes[0].title, "File is too large");
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let mut w = at_upload_step();
        let err = w.attach_file(FileHandle::new("layout.psd", MIB, "image/vnd.adobe.photoshop")).unwrap_err();
        assert!(matches!(err, WizardError::Rejected(UploadRejection::UnsupportedType { .. })));
        assert!(w.file().is_none());
        assert_eq!(w.step(), WizardStep::UploadFile);
        let notes = w.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].title, "Unsupported file format");
        assert_eq!(notes[0].description.as_deref(), Some("Upload an image (JPG, PNG) or a PDF"));
    }

    #[test]
    fn test_set_parameters_is_all_or_nothing() {
        let mut w = OrderWizard::new();
        w.select_product("posters").unwrap();
        w.advance().unwrap();
        let err = w.set_parameters(Some("a3"), Some("vinyl"), Some(Quantity::new(500))).unwrap_err();
        assert_eq!(err, WizardError::UnknownMaterial("vinyl".into()));
        assert!(w.size().is_none());
        assert!(w.material().is_none());
        assert_eq!(w.quantity().value(), 100);

        assert!(w.set_parameters(Some("a0"), Some("glossy"), None).is_err());
        assert!(w.material().is_none());

        w.set_parameters(Some("a3"), Some("glossy"), Some(Quantity::new(1000))).unwrap();
        assert_eq!(w.total(), Money::rub(7200));
        w.set_parameters(None, Some("matte"), None).unwrap();
        assert_eq!(w.size().unwrap().id, "a3");
        assert_eq!(w.material().unwrap().id, "matte");
    }

    #[test]
    fn test_keep_alive_and_confirm_count_as_activity() {
        let mut w = at_confirm_step();
        let before = w.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(5));
        w.keep_alive();
        let polled = w.updated_at();
        assert!(polled > before);
        std::thread::sleep(std::time::Duration::from_millis(5));
        w.confirm().unwrap();
        assert!(w.updated_at() > polled);
    }

    #[test]
    fn test_pdf_accepted_without_preview_job() {
        let mut w = at_upload_step();
        let job = w.attach_file(FileHandle::new("layout.pdf", 10 * MIB, "application/pdf")).unwrap();
        assert!(job.is_none());
        assert!(w.file().unwrap().preview.is_none());
        let notes = w.take_notifications();
        assert_eq!(notes[0].description.as_deref(), Some("layout.pdf (10.00 MB)"));
    }

    #[test]
    fn test_jpeg_preview_applied() {
        let mut w = at_upload_step();
        let handle = FileHandle::new("photo.jpg", 2 * MIB, "image/jpeg").with_content(vec![0xff; 2 * MIB as usize]);
        let job = w.attach_file(handle).unwrap().unwrap();
        assert!(w.complete_preview(job.generation, job.render()));
        let preview = w.file().unwrap().preview.as_deref().unwrap();
        assert!(preview.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_stale_preview_discarded() {
        let mut w = at_upload_step();
        let first = w.attach_file(FileHandle::new("a.png", 10, "image/png").with_content(vec![1; 10])).unwrap().unwrap();
        let second = w.attach_file(FileHandle::new("b.png", 10, "image/png").with_content(vec![2; 10])).unwrap().unwrap();
        assert!(!w.complete_preview(first.generation, first.render()));
        assert!(w.file().unwrap().preview.is_none());
        assert_eq!(w.file().unwrap().name, "b.png");
        assert!(w.complete_preview(second.generation, second.render()));

        let third = w.attach_file(FileHandle::new("c.png", 10, "image/png").with_content(vec![3; 10])).unwrap().unwrap();
        w.remove_file().unwrap();
        assert!(!w.complete_preview(third.generation, third.render()));
        assert!(w.file().is_none());
    }

    #[test]
    fn test_failed_preview_keeps_file() {
        let mut w = at_upload_step();
        let job = w.attach_file(FileHandle::new("a.png", 10, "image/png")).unwrap().unwrap();
        assert!(w.complete_preview(job.generation, job.render()));
        assert!(w.file().is_some());
        assert!(w.file().unwrap().preview.is_none());
    }

    #[test]
    fn test_remove_file_keeps_step_and_selections() {
        let mut w = at_upload_step();
        w.attach_file(FileHandle::new("a.pdf", 10, "application/pdf")).unwrap();
        w.remove_file().unwrap();
        assert!(w.file().is_none());
        assert_eq!(w.step(), WizardStep::UploadFile);
        assert_eq!(w.product().unwrap().id, "posters");
        assert_eq!(w.material().unwrap().id, "glossy");
    }

    #[test]
    fn test_back_keeps_selections() {
        let mut w = at_upload_step();
        assert_eq!(w.back(), Ok(WizardStep::SelectParameters));
        assert_eq!(w.size().unwrap().id, "a3");
        assert_eq!(w.quantity().value(), 1000);
    }

    #[test]
    fn test_preliminary_total() {
        let mut w = OrderWizard::new();
        w.select_product("posters").unwrap();
        assert!(w.preliminary_total().is_none());
        w.advance().unwrap();
        assert!(w.preliminary_total().is_none());
        w.select_size("a3").unwrap();
        w.select_material("glossy").unwrap();
        w.set_quantity(Quantity::new(1000)).unwrap();
        assert_eq!(w.preliminary_total(), Some(Money::rub(7200)));
        assert_eq!(w.discount(), VolumeDiscount::TwentyPercent);
    }

    #[test]
    fn test_confirm_announces_total() {
        let mut w = at_confirm_step();
        assert_eq!(w.confirm(), Ok(Money::rub(7200)));
        assert_eq!(w.step(), WizardStep::Confirm);
        let notes = w.take_notifications();
        assert_eq!(notes[0].description.as_deref(), Some("Amount due: 7\u{a0}200 ₽"));
        let summary = w.summary().unwrap();
        assert_eq!(summary.product, "Posters");
        assert_eq!(summary.file_name, "poster.pdf");
        assert!(matches!(w.advance(), Err(WizardError::NotAvailable { .. })));
        assert!(matches!(w.back(), Err(WizardError::NotAvailable { .. })));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut w = at_confirm_step();
        w.reset().unwrap();
        assert_eq!(w.step(), WizardStep::SelectProduct);
        assert!(w.product().is_none());
        assert!(w.size().is_none());
        assert!(w.material().is_none());
        assert!(w.file().is_none());
        assert_eq!(w.quantity().value(), 100);
        assert_eq!(w.total(), Money::rub(0));
    }
}
