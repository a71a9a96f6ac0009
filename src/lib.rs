pub mod app;
pub mod auth;
pub mod config;
pub mod dates;
pub mod error;
pub mod foods;
pub mod habits;
pub mod meals;
pub mod state;
pub mod stats;
pub mod store;

mod test_utils;
