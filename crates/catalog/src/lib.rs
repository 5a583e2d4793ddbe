//! Show catalog service: storage gateways, the show repository, the catalog
//! service and its axum HTTP layer.

pub mod app;
pub mod config;
pub mod handlers;
pub mod service;
pub mod state;
pub mod storage;
