//! Aggregates module
pub mod wizard;
pub mod calculator;

pub use wizard::{OrderWizard, WizardError, WizardStep, Field, AttachedFile, PreviewJob, OrderSummary};
pub use calculator::{PriceCalculator, CalculatorError, Quote};
