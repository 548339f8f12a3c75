//! Print shop domain: catalog, pricing, uploads and the two order forms.
pub mod aggregates;
pub mod catalog;
pub mod events;
pub mod pricing;
pub mod upload;
pub mod value_objects;
