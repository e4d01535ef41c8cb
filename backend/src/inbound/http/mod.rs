//! HTTP inbound adapter exposing the REST API.

pub mod auth;
pub mod dispensers;
pub mod error;
pub mod floors;
pub mod health;
pub mod pantries;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
