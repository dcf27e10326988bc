pub mod auth;
pub mod zoom;
