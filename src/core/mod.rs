//! Core library components.
//!
//! This module contains the reusable reconciliation logic: domain types,
//! sealing, remote access with its retry and rate-limit layers, and the
//! synchronizer that ties them together.

pub mod build_info;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod remote;
pub mod sync;
pub mod targets;
pub mod types;
