//! Test helpers shared across the workspace.
//!
//! - [`env`]: guards for mutating process environment variables.
//! - [`jail`]: running closures inside a [`figment::Jail`] and writing
//!   declaration files into it.
//! - [`fixtures`]: declaration documents used by several test suites.
//!
//! The crate deliberately does not depend on `apimodel`, so fixtures are
//! plain JSON values.

pub mod env;
pub mod fixtures;
pub mod jail;
