//! Data models for Dukani

pub mod configuration;
pub mod device;
pub mod device_status;
pub mod phone_model;
pub mod report;
pub mod sale;
pub mod user;

// Re-export commonly used types
pub use configuration::Configuration;
pub use device::{Device, NewDevice, ScanItem};
pub use device_status::DeviceStatus;
pub use phone_model::PhoneModel;
pub use sale::{CompletedSale, Sale, SaleItem, SaleItemInput};
pub use user::{Caller, UserClaims};
