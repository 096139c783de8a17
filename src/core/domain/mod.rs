//! Domain types.

mod key;
mod mapping;
mod page;
mod plan;
mod quota;
mod report;
mod repository;
mod scope;

pub use key::{EncryptedPayload, PublicKey};
pub use mapping::DesiredMapping;
pub use page::Page;
pub use plan::SyncPlan;
pub use quota::Quota;
pub use report::{Action, ActionKind, SyncReport, Upsert};
pub use repository::Repository;
pub use scope::{EntryKind, Scope, ScopeRef, TargetType};
