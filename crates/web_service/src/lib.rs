pub mod controllers;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{app_config, run, AppState};
