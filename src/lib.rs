pub mod calendar;
pub mod commands;
pub mod config;
pub mod credit;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod portfolio;
pub mod records;
pub mod repository;
pub mod schedule;
pub mod types;
pub mod views;

// re-export key types
pub use commands::{suggested_installment, PaymentReceipt};
pub use config::LedgerConfig;
pub use credit::CreditState;
pub use decimal::{Money, EPSILON};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::Ledger;
pub use portfolio::{aggregate, CommissionLine, MonitorRow, PortfolioSnapshot, PortfolioTotals};
pub use records::{
    Agent, Client, NewAgent, NewClient, NewParcel, NewPayment, NewSale, Parcel, Payment, Sale,
};
pub use repository::{MemoryRepository, Repository};
pub use schedule::{
    reconcile, InstallmentSchedule, ReconciledInstallment, ReconciledSchedule,
    ScheduledInstallment,
};
pub use types::{
    AgentId, ClientId, ContactChannel, ContactKind, CreditStatus, DelinquencyBand,
    InstallmentStatus, ParcelId, ParcelStatus, PaymentId, SaleId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
