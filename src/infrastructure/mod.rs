//! Infrastructure layer - HTTP transport, request cache and services

pub mod cache;
pub mod http;
pub mod logging;
pub mod services;
