//! sync-secrets - reconcile GitHub secrets and variables.
//!
//! Propagates a desired set of secrets and variables into one or more
//! repositories, deleting undesired entries when pruning.
//!
//! # Architecture
//!
//! ```text
//! sync-secrets
//! ├── cli/              Command-line interface
//! │   ├── output        Transcript formatting
//! │   └── sync          Per-repository orchestration
//! ├── core/             Business logic
//! │   ├── domain/       DesiredMapping, Scope, SyncPlan, SyncReport, Quota
//! │   ├── cipher/       Sealed-box encryption
//! │   ├── remote/       GitHub client, retry and rate-limit decorators
//! │   ├── sync          Synchronizer
//! │   ├── targets       Repository selection and search
//! │   └── config        Option validation
//! └── error             Error types
//! ```
//!
//! # Layers
//!
//! Every remote call goes through `Governed<Retrying<GitHub>>`: the
//! governor waits out a nearly spent rate limit, the retry layer backs off
//! on transient failures, and the client speaks HTTP. Dry-run is decided in
//! the [`core::sync::Synchronizer`], before any mutating call.

pub mod cli;
pub mod core;
pub mod error;
