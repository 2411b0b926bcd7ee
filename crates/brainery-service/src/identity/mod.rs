//! Identity resolution: login, session lookup, registration, password reset.

pub mod registration;
pub mod resolver;

pub use registration::Registration;
pub use resolver::{IdentityResolver, LoginOutcome, ResolvedSession};
