use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, EPSILON};
use crate::records::Payment;
use crate::schedule::planner::InstallmentSchedule;
use crate::types::{InstallmentStatus, SaleId};

/// a scheduled installment matched against received money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledInstallment {
    pub index: u32,
    pub due_date: NaiveDate,
    pub scheduled_amount: Money,
    pub applied_amount: Money,
    /// principal still owed after this installment's share of the pool
    pub running_balance: Money,
    pub status: InstallmentStatus,
}

/// the schedule with payments applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledSchedule {
    pub sale_id: SaleId,
    pub rows: Vec<ReconciledInstallment>,
    pub total_scheduled: Money,
    pub total_applied: Money,
    /// money received beyond the full schedule
    pub unapplied: Money,
}

impl ReconciledSchedule {
    pub fn fully_settled(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.status == InstallmentStatus::Paid)
    }

    /// first installment not yet fully covered
    pub fn first_unsettled(&self) -> Option<&ReconciledInstallment> {
        self.rows
            .iter()
            .find(|r| r.status != InstallmentStatus::Paid)
    }
}

/// match received payments against a schedule
///
/// Payments are fungible: they form a single pool that fills installments
/// oldest-first, regardless of which payment arrived when or how its amount
/// relates to individual installments. One large payment can settle several
/// rows and a row can be filled by several small payments.
pub fn reconcile(schedule: &InstallmentSchedule, payments: &[Payment]) -> ReconciledSchedule {
    let mut pool = payments
        .iter()
        .map(|p| p.amount)
        .fold(Money::ZERO, |acc, x| acc + x);
    let received = pool;

    let mut rows = Vec::with_capacity(schedule.installments.len());
    let mut total_scheduled = Money::ZERO;
    let mut total_applied = Money::ZERO;
    let mut balance = schedule.principal;

    for installment in &schedule.installments {
        let applied = installment.amount.min(pool);
        pool = pool - applied;
        balance = (balance - applied).max(Money::ZERO);

        let status = if installment.amount - applied <= EPSILON {
            InstallmentStatus::Paid
        } else if applied.is_positive() {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Pending
        };

        total_scheduled += installment.amount;
        total_applied += applied;

        rows.push(ReconciledInstallment {
            index: installment.index,
            due_date: installment.due_date,
            scheduled_amount: installment.amount,
            applied_amount: applied,
            running_balance: balance,
            status,
        });
    }

    ReconciledSchedule {
        sale_id: schedule.sale_id,
        rows,
        total_scheduled,
        total_applied,
        unapplied: received - total_applied,
    }
}
