use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_months, full_months_between};
use crate::decimal::{Money, EPSILON};
use crate::errors::{LedgerError, Result};
use crate::records::{Payment, Sale};
use crate::types::{CreditStatus, SaleId};

/// credit standing of a sale contract as of a business date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditState {
    pub sale_id: SaleId,
    pub as_of: NaiveDate,
    pub down_payment: Money,
    /// money received as installment payments
    pub installments_total: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    /// full calendar months elapsed since the contract, capped at the term
    pub elapsed_months: u32,
    pub expected_installments_paid: u32,
    pub expected_amount: Money,
    pub overdue_amount: Money,
    pub overdue_months: u32,
    /// days since the earliest installment not fully covered, 0 unless delinquent
    pub days_past_due: u32,
    pub next_due_date: Option<NaiveDate>,
    pub amount_to_become_current: Money,
    pub status: CreditStatus,
}

impl CreditState {
    /// evaluate a sale's credit standing as of `today`
    ///
    /// Pure calendar arithmetic over the contract terms: one installment falls
    /// due per full elapsed month, the money expected so far is compared with
    /// the money received, and the gap classifies the contract. A residual
    /// within one currency unit never flips the classification either way.
    pub fn evaluate(sale: &Sale, payments: &[Payment], today: NaiveDate) -> Result<Self> {
        let down_payment = sale.down_payment;
        let installments_total = payments
            .iter()
            .map(|p| p.amount)
            .fold(Money::ZERO, |acc, x| acc + x);
        let total_paid = down_payment + installments_total;
        let outstanding = (sale.agreed_price - total_paid).max(Money::ZERO);

        let elapsed_months = full_months_between(sale.contract_date, today)
            .clamp(0, sale.term_months as i32) as u32;
        let expected_amount = sale.installment_amount * elapsed_months;
        let overdue_amount = (expected_amount - installments_total).max(Money::ZERO);
        let overdue_months = overdue_amount.whole_units(sale.installment_amount);

        let status = if outstanding <= EPSILON {
            CreditStatus::PaidOff
        } else if overdue_amount <= EPSILON {
            CreditStatus::Current
        } else {
            CreditStatus::Delinquent
        };

        // the first installment the payment pool does not fully cover
        let covered = installments_total.whole_units(sale.installment_amount);
        let next_due_date = if status != CreditStatus::PaidOff && covered < sale.term_months {
            Some(
                add_months(sale.contract_date, covered + 1).ok_or_else(|| {
                    LedgerError::Validation {
                        field: "contract_date",
                        message: "due date overflows the calendar".to_string(),
                    }
                })?,
            )
        } else {
            None
        };

        let days_past_due = match (status, next_due_date) {
            (CreditStatus::Delinquent, Some(due)) => {
                today.signed_duration_since(due).num_days().max(0) as u32
            }
            _ => 0,
        };

        Ok(Self {
            sale_id: sale.id,
            as_of: today,
            down_payment,
            installments_total,
            total_paid,
            outstanding,
            elapsed_months,
            expected_installments_paid: elapsed_months,
            expected_amount,
            overdue_amount,
            overdue_months,
            days_past_due,
            next_due_date,
            amount_to_become_current: overdue_amount,
            status,
        })
    }
}
