//! DTO modules that bridge the backend's JSON with the controllers.

pub mod api;
