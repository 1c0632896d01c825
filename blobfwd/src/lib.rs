pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod routing;
pub mod service;
pub mod storage;
pub mod utils;
