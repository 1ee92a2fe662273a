#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod password;

pub use context::{Principal, SecurityContext, SecurityContextBuilder};
pub use password::{PasswordEncoder, PasswordError};
