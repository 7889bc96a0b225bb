//! Bankdesk Core - ledger logic for a banking back office
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, Transaction, Caller, etc.)
//! - **ports**: Trait definitions the ledger depends on (AccountStore, TransactionLog, IdentityResolver)
//! - **services**: Business logic orchestration (LedgerService and friends)
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use adapters::duckdb::{CustomerVolume, RepositoryCounts};
pub use domain::result::Error;
pub use domain::{
    Account, AccountType, BalanceAdjustment, Caller, Customer, NewTransaction, Role, Transaction,
    TransactionType, TransferReceipt, TransferState, User,
};

/// Ledger engine wired to the DuckDB adapter
pub type Ledger = LedgerService<DuckDbRepository, DuckDbRepository>;

/// Main context for Bankdesk operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct BankContext {
    pub config: Config,
    pub data_dir: Option<PathBuf>,
    pub repository: Arc<DuckDbRepository>,
    pub ledger: Arc<Ledger>,
    pub account_service: AccountService,
    pub customer_service: CustomerService,
    pub user_service: UserService,
    pub report_service: ReportService,
    pub status_service: StatusService,
    pub logging_service: Arc<LoggingService>,
}

impl BankContext {
    /// Open the ledger in `data_dir`, creating the database on first use
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        let config = Config::load(data_dir)?;

        let db_path = config.database_path(data_dir);
        let repository = Arc::new(
            DuckDbRepository::new(&db_path)
                .with_context(|| format!("opening {}", db_path.display()))?,
        );
        let logging_service = Arc::new(
            LoggingService::new(data_dir, entry_point, env!("CARGO_PKG_VERSION"))
                .context("opening event log")?,
        );

        Self::assemble(config, Some(data_dir.to_path_buf()), repository, logging_service)
    }

    /// A throwaway ledger held entirely in memory
    pub fn in_memory(entry_point: EntryPoint) -> Result<Self> {
        let repository = Arc::new(DuckDbRepository::open_in_memory()?);
        let logging_service = Arc::new(LoggingService::in_memory(
            entry_point,
            env!("CARGO_PKG_VERSION"),
        )?);
        Self::assemble(Config::default(), None, repository, logging_service)
    }

    fn assemble(
        config: Config,
        data_dir: Option<PathBuf>,
        repository: Arc<DuckDbRepository>,
        logging_service: Arc<LoggingService>,
    ) -> Result<Self> {
        repository.ensure_schema()?;

        let ledger = Arc::new(
            LedgerService::new(Arc::clone(&repository), Arc::clone(&repository))
                .with_event_log(Arc::clone(&logging_service)),
        );

        Ok(Self {
            config,
            data_dir,
            ledger,
            account_service: AccountService::new(Arc::clone(&repository)),
            customer_service: CustomerService::new(Arc::clone(&repository)),
            user_service: UserService::new(Arc::clone(&repository)),
            report_service: ReportService::new(Arc::clone(&repository)),
            status_service: StatusService::new(Arc::clone(&repository)),
            repository,
            logging_service,
        })
    }
}
