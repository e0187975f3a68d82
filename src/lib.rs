//! Client-side list controllers and workflows for the inventory admin
//! dashboard.

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod controller;
pub mod domain;
pub mod dto;
mod error_conversions;
pub mod filters;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod search;
pub mod services;
pub mod session;
