//! Route handlers organized by domain.

pub mod account;
pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod register;
pub mod resource;
