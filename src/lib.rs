// Library exports for blogdesk
// This allows integration tests and external code to use blogdesk modules

pub mod api;
pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod reconcile;
pub mod session;
pub mod state;
