//! Top-level operations
//!
//! Each function here is one sequential pipeline run with canonical
//! start/end logging.

pub mod history;
pub mod init;
pub mod publish;
pub mod verify;

pub use history::history;
pub use init::{init, InitOutcome};
pub use publish::{publish_csv, publish_snapshot, publish_sql, PublishContext, PublishResult};
pub use verify::{verify, VerificationResult, VerifyLocator, VerifyStatus};
