pub mod auth;
pub mod backend;
pub mod command;
pub mod config;
pub mod error;
pub mod join;
pub mod logging;
pub mod views;
