pub mod auth;
pub mod import;
pub mod map;
pub mod records;
