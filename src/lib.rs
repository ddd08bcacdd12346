//! Blog backend: articles and users over a relational store, served over HTTP.
//!
//! Requests flow handler → service → repository → store capability. The
//! [`server`] module owns the listener and the graceful shutdown sequence.

pub mod api;
pub mod clock;
pub mod config;
pub mod server;
pub mod service;
pub mod store;
