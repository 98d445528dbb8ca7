//! Watches WordPress sites and raises a notification the first time a new
//! post shows up.
//!
//! Each check fetches the latest post of every configured site (REST API
//! first, RSS feed second), compares it with the last notified post and keeps
//! a short per-site list of recent fetches.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod notifiers;
pub mod services;
pub mod sources;
pub mod storage;
pub mod tracking;
