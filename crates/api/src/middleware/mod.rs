//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the signed-in user from a Bearer session token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
