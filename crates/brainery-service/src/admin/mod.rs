//! Administrative operations over identities.

pub mod service;

pub use service::{AdminOverview, AdminService};
