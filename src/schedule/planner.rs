use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::add_months;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::records::Sale;
use crate::types::SaleId;

/// one scheduled installment of a sale contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    /// 1-based position in the schedule
    pub index: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    /// principal left to plan after this installment
    pub remaining_principal_after: Money,
}

/// the full planned schedule for a sale's financed principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub sale_id: SaleId,
    pub principal: Money,
    pub term_months: u32,
    pub contract_date: NaiveDate,
    pub installments: Vec<ScheduledInstallment>,
}

impl InstallmentSchedule {
    /// plan the installment schedule for a sale
    ///
    /// Due dates fall one calendar month apart starting one month after the
    /// contract date, each offset taken from the contract date so a clamped
    /// month-end never shifts later rows. Every installment takes the agreed
    /// amount capped at the principal still unplanned, and the final one
    /// takes the exact remainder, so amounts always sum to the principal.
    pub fn generate(sale: &Sale) -> Result<Self> {
        let principal = sale.principal_financed();
        let mut installments = Vec::with_capacity(sale.term_months as usize);
        let mut remaining = principal;

        for index in 1..=sale.term_months {
            let due_date = add_months(sale.contract_date, index).ok_or_else(|| {
                LedgerError::Validation {
                    field: "contract_date",
                    message: format!("due date overflows the calendar at installment {}", index),
                }
            })?;

            let amount = if index == sale.term_months {
                remaining
            } else {
                sale.installment_amount.min(remaining)
            };
            remaining = remaining - amount;

            installments.push(ScheduledInstallment {
                index,
                due_date,
                amount,
                remaining_principal_after: remaining,
            });
        }

        Ok(Self {
            sale_id: sale.id,
            principal,
            term_months: sale.term_months,
            contract_date: sale.contract_date,
            installments,
        })
    }

    /// get installment by 1-based index
    pub fn installment(&self, index: u32) -> Option<&ScheduledInstallment> {
        self.installments.get(index.checked_sub(1)? as usize)
    }

    /// due date of the last installment
    pub fn final_due_date(&self) -> Option<NaiveDate> {
        self.installments.last().map(|i| i.due_date)
    }

    pub fn total_scheduled(&self) -> Money {
        self.installments
            .iter()
            .map(|i| i.amount)
            .fold(Money::ZERO, |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sale(
        contract_date: NaiveDate,
        agreed: i64,
        down: i64,
        term: u32,
        installment: i64,
    ) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            parcel_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            agent_id: Some(Uuid::new_v4()),
            contract_date,
            agreed_price: Money::from_major(agreed),
            down_payment: Money::from_major(down),
            term_months: term,
            installment_amount: Money::from_major(installment),
            total_commission: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_even_schedule() {
        let sale = sale(date(2024, 1, 15), 120_000, 20_000, 10, 10_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        assert_eq!(schedule.principal, Money::from_major(100_000));
        assert_eq!(schedule.installments.len(), 10);

        for (i, row) in schedule.installments.iter().enumerate() {
            assert_eq!(row.index, i as u32 + 1);
            assert_eq!(row.amount, Money::from_major(10_000));
        }

        assert_eq!(schedule.installments[0].due_date, date(2024, 2, 15));
        assert_eq!(schedule.installments[9].due_date, date(2024, 11, 15));
        assert_eq!(
            schedule.installments[2].remaining_principal_after,
            Money::from_major(70_000)
        );
        assert_eq!(
            schedule.installments[9].remaining_principal_after,
            Money::ZERO
        );
        assert_eq!(schedule.total_scheduled(), schedule.principal);
    }

    #[test]
    fn test_month_end_due_dates_clamp() {
        let sale = sale(date(2024, 1, 31), 40_000, 10_000, 3, 10_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        let due: Vec<NaiveDate> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(
            due,
            vec![date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );
    }

    #[test]
    fn test_final_installment_takes_remainder() {
        let sale = sale(date(2024, 1, 15), 100_000, 5_000, 10, 10_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        for row in &schedule.installments[..9] {
            assert_eq!(row.amount, Money::from_major(10_000));
        }
        assert_eq!(schedule.installments[9].amount, Money::from_major(5_000));
        assert_eq!(schedule.total_scheduled(), Money::from_major(95_000));
    }

    #[test]
    fn test_overprovisioned_schedule_caps_at_remaining() {
        // 3 x 10_000 against only 15_000 financed
        let sale = sale(date(2024, 1, 15), 20_000, 5_000, 3, 10_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        let amounts: Vec<Money> = schedule.installments.iter().map(|i| i.amount).collect();
        assert_eq!(
            amounts,
            vec![
                Money::from_major(10_000),
                Money::from_major(5_000),
                Money::ZERO,
            ]
        );
        assert!(schedule.installments.iter().all(|i| !i.amount.is_negative()));
        assert_eq!(schedule.total_scheduled(), schedule.principal);
    }

    #[test]
    fn test_fully_down_paid_sale_plans_zero_amounts() {
        let sale = sale(date(2024, 1, 15), 50_000, 50_000, 2, 1_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        assert_eq!(schedule.principal, Money::ZERO);
        assert!(schedule.installments.iter().all(|i| i.amount.is_zero()));
    }

    #[test]
    fn test_installment_lookup_is_one_based() {
        let sale = sale(date(2024, 1, 15), 120_000, 20_000, 10, 10_000);
        let schedule = InstallmentSchedule::generate(&sale).unwrap();

        assert_eq!(schedule.installment(1).unwrap().due_date, date(2024, 2, 15));
        assert_eq!(
            schedule.installment(10).unwrap().remaining_principal_after,
            Money::ZERO
        );
        assert!(schedule.installment(0).is_none());
        assert!(schedule.installment(11).is_none());
        assert_eq!(schedule.final_due_date(), Some(date(2024, 11, 15)));
    }
}
