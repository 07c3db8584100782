//! Tenant-scoped storage and query answering

pub mod query;
pub mod store;

pub use query::{QueryService, NO_KNOWLEDGE};
pub use store::TenantStore;
