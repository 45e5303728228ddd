use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::credit::CreditState;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::records::{Agent, Client, Parcel, Payment};
use crate::repository::Repository;
use crate::types::{
    AgentId, ClientId, ContactChannel, CreditStatus, DelinquencyBand, ParcelId, SaleId,
};

/// one sale contract on the delinquency monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRow {
    pub sale_id: SaleId,
    pub parcel_display: String,
    pub client_name: String,
    /// empty when the sale was closed without an agent
    pub agent_name: String,
    pub contact_channels: Vec<ContactChannel>,
    pub band: DelinquencyBand,
    pub credit: CreditState,
}

/// commission owed to one agent across their contracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionLine {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub contracts: u32,
    pub commission: Money,
}

/// portfolio-wide money and contract counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub as_of: NaiveDate,
    pub contracts: u32,
    pub current: u32,
    pub delinquent: u32,
    pub paid_off: u32,
    /// down payments plus every installment received
    pub gross_income: Money,
    /// same figure as gross_income, kept under the label the summary view shows
    pub collected: Money,
    pub portfolio_face_value: Money,
    pub outstanding: Money,
    pub overdue: Money,
    /// installments still expected each month from contracts not yet paid off
    pub expected_monthly_inflow: Money,
}

/// the whole portfolio evaluated as of one business date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub totals: PortfolioTotals,
    pub rows: Vec<MonitorRow>,
    pub commissions: Vec<CommissionLine>,
}

impl PortfolioSnapshot {
    /// rows flagged delinquent, worst day count first
    pub fn delinquent_rows(&self) -> Vec<&MonitorRow> {
        let mut rows: Vec<&MonitorRow> = self
            .rows
            .iter()
            .filter(|r| r.credit.status == CreditStatus::Delinquent)
            .collect();
        rows.sort_by(|a, b| b.credit.days_past_due.cmp(&a.credit.days_past_due));
        rows
    }
}

/// evaluate every sale and roll the results up
pub fn aggregate<R: Repository>(
    repo: &R,
    config: &LedgerConfig,
    today: NaiveDate,
) -> Result<PortfolioSnapshot> {
    let sales = repo.list_sales()?;

    let parcels: BTreeMap<ParcelId, Parcel> = repo
        .list_parcels()?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let clients: BTreeMap<ClientId, Client> = repo
        .list_clients()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let agents: BTreeMap<AgentId, Agent> = repo
        .list_agents()?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let mut payments_by_sale: BTreeMap<SaleId, Vec<Payment>> = BTreeMap::new();
    for payment in repo.list_all_payments()? {
        payments_by_sale
            .entry(payment.sale_id)
            .or_default()
            .push(payment);
    }

    let mut rows = Vec::with_capacity(sales.len());
    let mut by_agent: BTreeMap<AgentId, CommissionLine> = BTreeMap::new();
    let mut totals = PortfolioTotals {
        as_of: today,
        contracts: 0,
        current: 0,
        delinquent: 0,
        paid_off: 0,
        gross_income: Money::ZERO,
        collected: Money::ZERO,
        portfolio_face_value: Money::ZERO,
        outstanding: Money::ZERO,
        overdue: Money::ZERO,
        expected_monthly_inflow: Money::ZERO,
    };

    for sale in &sales {
        let payments = payments_by_sale
            .get(&sale.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let credit = CreditState::evaluate(sale, payments, today)?;

        let parcel = parcels
            .get(&sale.parcel_id)
            .ok_or(LedgerError::NotFound {
                entity: "parcel",
                id: sale.parcel_id,
            })?;
        let client = clients
            .get(&sale.client_id)
            .ok_or(LedgerError::NotFound {
                entity: "client",
                id: sale.client_id,
            })?;
        let agent_name = sale
            .agent_id
            .and_then(|id| agents.get(&id))
            .map(|a| a.name.clone())
            .unwrap_or_default();

        totals.contracts += 1;
        match credit.status {
            CreditStatus::Current => totals.current += 1,
            CreditStatus::Delinquent => totals.delinquent += 1,
            CreditStatus::PaidOff => totals.paid_off += 1,
        }
        totals.gross_income += credit.total_paid;
        totals.portfolio_face_value += sale.agreed_price;
        totals.outstanding += credit.outstanding;
        totals.overdue += credit.overdue_amount;
        if credit.status != CreditStatus::PaidOff {
            totals.expected_monthly_inflow += sale.installment_amount;
        }

        if let Some(agent_id) = sale.agent_id {
            let line = by_agent.entry(agent_id).or_insert_with(|| CommissionLine {
                agent_id,
                agent_name: agents
                    .get(&agent_id)
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                contracts: 0,
                commission: Money::ZERO,
            });
            line.contracts += 1;
            line.commission += sale.total_commission.unwrap_or(Money::ZERO);
        }

        let band = config.band_for(credit.days_past_due);
        rows.push(MonitorRow {
            sale_id: sale.id,
            parcel_display: parcel.display_key(),
            client_name: client.name.clone(),
            agent_name,
            contact_channels: client.contact_channels(),
            band,
            credit,
        });
    }
    totals.collected = totals.gross_income;

    Ok(PortfolioSnapshot {
        totals,
        rows,
        commissions: by_agent.into_values().collect(),
    })
}
