//! Core types and pure logic for the show catalog.
//!
//! Nothing in this crate performs I/O. Storage backends, the HTTP layer and
//! configuration live in the `catalog` crate and depend on the contracts
//! defined here.

pub mod auth;
pub mod show;
pub mod storage;
