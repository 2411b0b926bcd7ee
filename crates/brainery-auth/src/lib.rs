//! # brainery-auth
//!
//! Authentication building blocks for Brainery.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the password strength policy
//! - `jwt`: signed session tokens naming a server-side session
//! - `session`: session registry, login/logout lifecycle, and expiry cleanup
//! - `rbac`: admin-only gate

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RbacEnforcer;
pub use session::{Landing, Notice, NoticeLevel, SessionCleanup, SessionManager, SessionRecord};
