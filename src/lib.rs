//! OpenSASE Print Shop
//!
//! Self-hosted order configuration for an online print shop.
//!
//! ## Features
//! - Static catalog of print products, sizes and paper stocks
//! - Price formula with volume discounts
//! - Four-step order wizard with per-step validation
//! - Artwork upload checks with image previews
//! - Standalone price calculator

pub mod api;
pub mod config;
pub mod domain;

use thiserror::Error;

use crate::domain::aggregates::{CalculatorError, WizardError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PrintShopError {
    #[error("Session not found")]
    SessionNotFound,

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, PrintShopError>;
