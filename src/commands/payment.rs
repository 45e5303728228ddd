use chrono::{Duration, NaiveDate};
use hourglass_rs::SafeTimeProvider;

use crate::calendar::business_date;
use crate::config::LedgerConfig;
use crate::credit::CreditState;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::records::{NewPayment, Payment};
use crate::repository::Repository;
use crate::types::CreditStatus;

/// stored payment plus the credit standing it produced
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub credit: CreditState,
}

/// register money received against a sale contract
///
/// The date may be back-dated freely but may not run ahead of the business
/// date by more than the configured tolerance, and a settled contract takes
/// no further money.
pub fn register_payment<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    config: &LedgerConfig,
    draft: NewPayment,
    time: &SafeTimeProvider,
) -> Result<PaymentReceipt> {
    let sale_id = draft.sale_id;
    let today = business_date(time);
    let receipt = match take_payment(repo, config, draft, today) {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::debug!(sale_id = %sale_id, error = %e, "payment rejected");
            return Err(e);
        }
    };
    let PaymentReceipt { payment, credit } = &receipt;

    tracing::info!(
        sale_id = %sale_id,
        amount = %payment.amount,
        outstanding = %credit.outstanding,
        "payment registered"
    );
    events.emit(Event::PaymentRegistered {
        payment_id: payment.id,
        sale_id,
        amount: payment.amount,
        date: payment.date,
        outstanding_after: credit.outstanding,
        timestamp: time.now(),
    });

    if credit.status == CreditStatus::PaidOff {
        tracing::info!(sale_id = %sale_id, "sale paid off");
        events.emit(Event::SalePaidOff {
            sale_id,
            timestamp: time.now(),
        });
    }

    Ok(receipt)
}

fn take_payment<R: Repository>(
    repo: &mut R,
    config: &LedgerConfig,
    draft: NewPayment,
    today: NaiveDate,
) -> Result<PaymentReceipt> {
    draft.validate()?;

    let sale = repo.get_sale(draft.sale_id)?;

    if draft.date < sale.contract_date {
        return Err(LedgerError::Validation {
            field: "date",
            message: format!(
                "payment date {} precedes the contract date {}",
                draft.date, sale.contract_date
            ),
        });
    }
    let latest = today + Duration::days(config.payment_date_tolerance_days);
    if draft.date > latest {
        return Err(LedgerError::Validation {
            field: "date",
            message: format!(
                "payment date {} runs ahead of the business date {}",
                draft.date, today
            ),
        });
    }

    let prior = repo.list_payments_for_sale(sale.id)?;
    let before = CreditState::evaluate(&sale, &prior, today)?;
    if before.status == CreditStatus::PaidOff {
        return Err(LedgerError::Conflict {
            message: format!("sale {} is already paid off", sale.id),
        });
    }

    let payment = repo.insert_payment(draft)?;
    let mut all = prior;
    all.push(payment.clone());
    let credit = CreditState::evaluate(&sale, &all, today)?;

    Ok(PaymentReceipt { payment, credit })
}
