pub mod aggregate;
pub mod error;
pub mod insights;
pub mod models;
pub mod policy;
pub mod service;
pub mod store;
