pub mod planner;
pub mod reconciler;

pub use planner::{InstallmentSchedule, ScheduledInstallment};
pub use reconciler::{reconcile, ReconciledInstallment, ReconciledSchedule};
