//! Well-known role name constants.
//!
//! These must match the `role` values stored on user records.

pub const ROLE_ADMIN: &str = "admin";

/// Label shown for users whose record carries no role.
pub const DEFAULT_ROLE_LABEL: &str = "User";

/// Whether `role` grants destructive actions (edit, delete, reset database).
pub fn is_admin(role: Option<&str>) -> bool {
    role == Some(ROLE_ADMIN)
}
