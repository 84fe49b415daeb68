//! ncp-sweep core
//!
//! Finds every resource an account owns, narrows the set with an optional
//! filter and deletes what is left in dependency order. Sub-accounts are
//! activated or deactivated afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 ncp-sweep CLI / TUI              │
//! └─────────────────┬───────────────────────────────┘
//!                   │ RootAccount[], RunOptions
//! ┌─────────────────▼───────────────────────────────┐
//! │                 ncp-sweep-cloud                  │
//! │  BatchRunner ─► collect ─► FilterSet ─► Teardown │
//! │        └──────► sub-account action               │
//! │  trait ResourceApi + SubAccountApi               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │     ncp-sweep-ncloud (signed HTTP provider)      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod account;
pub mod api;
pub mod batch;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod progress;
pub mod subaccount;
pub mod teardown;

// Re-exports
pub use account::RootAccount;
pub use api::{ApiFactory, Operation, ProviderApi, ResourceApi, SubAccountApi};
pub use batch::{AccountOutcome, BatchRunner, BatchSummary, PreparedAccount, RunOptions};
pub use catalog::{CommonCode, Resource, ResourceKind, Route};
pub use clock::{Cancelled, Clock, TokioClock};
pub use error::{CloudError, Result};
pub use filter::{FilterSet, ResourceFilter};
pub use inventory::{CollectError, ResourceInventory, collect};
pub use progress::{ChannelSink, ProgressLog, ProgressSink};
pub use subaccount::{
    PasswordReset, PasswordResetOutcome, SubAccount, SubAccountAction, SubAccountPage,
    SubAccountTally, SubAccountUpdate, fetch_all as fetch_all_sub_accounts,
};
pub use teardown::{Phase, Teardown, TeardownResult, TeardownTimings};
