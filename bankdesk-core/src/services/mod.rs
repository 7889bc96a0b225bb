//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod customer;
mod ledger;
pub mod locks;
pub mod logging;
pub mod migration;
mod report;
mod status;
mod user;

pub use account::AccountService;
pub use customer::CustomerService;
pub use ledger::LedgerService;
pub use locks::AccountLocks;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use report::{ReportService, DEFAULT_HIGH_VOLUME_THRESHOLD};
pub use status::{AccountTypeSummary, StatusService, StatusSummary};
pub use user::UserService;
