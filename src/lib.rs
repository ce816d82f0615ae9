//! Product catalogue service with an operational surface: aggregated health
//! checks, a custom management endpoint, Prometheus metrics around product
//! reads, text notifications on every read and a logging message listener.

pub mod config;
pub mod error;
pub mod health;
pub mod messaging;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod services;
pub mod web;
