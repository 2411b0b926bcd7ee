//! # brainery-entity
//!
//! Domain entity models for Brainery. Every struct in this crate is a
//! backend-neutral value: both store backends read and write these types and
//! never expose their own row or document shapes.

pub mod catalog;
pub mod identity;
pub mod record;
