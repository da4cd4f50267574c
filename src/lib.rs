// Library exports for testing
pub mod app;
pub mod auth;
pub mod config;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod session;
pub mod storage;
