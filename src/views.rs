use chrono::NaiveDate;
use serde::Serialize;

use crate::config::LedgerConfig;
use crate::credit::CreditState;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::portfolio::{aggregate, MonitorRow, PortfolioSnapshot};
use crate::records::{Agent, Client, Parcel, Payment, Sale};
use crate::repository::Repository;
use crate::schedule::{reconcile, InstallmentSchedule, ReconciledInstallment};
use crate::types::{CreditStatus, InstallmentStatus, ParcelStatus, SaleId};

/// render any view as indented json
pub fn to_json_pretty<T: Serialize>(view: &T) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(|e| LedgerError::Transient {
        message: e.to_string(),
    })
}

/// owner's dashboard: totals, the monitor and commissions owed
pub fn portfolio_summary<R: Repository>(
    repo: &R,
    config: &LedgerConfig,
    today: NaiveDate,
) -> Result<PortfolioSnapshot> {
    aggregate(repo, config, today)
}

/// delinquent contracts, worst first, with whom to call
#[derive(Debug, Clone, Serialize)]
pub struct CollectionsView {
    pub as_of: NaiveDate,
    pub rows: Vec<MonitorRow>,
    pub total_overdue: Money,
}

pub fn collections<R: Repository>(
    repo: &R,
    config: &LedgerConfig,
    today: NaiveDate,
) -> Result<CollectionsView> {
    let snapshot = aggregate(repo, config, today)?;
    let rows: Vec<MonitorRow> = snapshot.delinquent_rows().into_iter().cloned().collect();
    let mut total_overdue = Money::ZERO;
    for row in &rows {
        total_overdue += row.credit.overdue_amount;
    }

    Ok(CollectionsView {
        as_of: today,
        rows,
        total_overdue,
    })
}

/// everything about one contract on a single page
#[derive(Debug, Clone, Serialize)]
pub struct ContractDetailView {
    pub sale: Sale,
    pub parcel: Parcel,
    pub client: Client,
    pub agent: Option<Agent>,
    pub commission: Money,
    pub credit: CreditState,
    pub schedule: Vec<ReconciledInstallment>,
    pub payments: Vec<Payment>,
    /// money received beyond the full schedule
    pub unapplied: Money,
}

pub fn contract_detail<R: Repository>(
    repo: &R,
    sale_id: SaleId,
    today: NaiveDate,
) -> Result<ContractDetailView> {
    let sale = repo.get_sale(sale_id)?;
    let parcel = repo.get_parcel(sale.parcel_id)?;
    let client = repo.get_client(sale.client_id)?;
    let agent = sale.agent_id.map(|id| repo.get_agent(id)).transpose()?;

    let mut payments = repo.list_payments_for_sale(sale.id)?;
    payments.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    let schedule = InstallmentSchedule::generate(&sale)?;
    let reconciled = reconcile(&schedule, &payments);
    let credit = CreditState::evaluate(&sale, &payments, today)?;
    let commission = sale.total_commission.unwrap_or(Money::ZERO);

    Ok(ContractDetailView {
        sale,
        parcel,
        client,
        agent,
        commission,
        credit,
        schedule: reconciled.rows,
        payments,
        unapplied: reconciled.unapplied,
    })
}

/// one contract on the back-office listing
#[derive(Debug, Clone, Serialize)]
pub struct SalesManagementRow {
    pub sale_id: SaleId,
    pub parcel_display: String,
    pub client_name: String,
    pub agent_name: String,
    pub contract_date: NaiveDate,
    pub agreed_price: Money,
    pub down_payment: Money,
    pub term_months: u32,
    pub installment_amount: Money,
    pub installments_paid: u32,
    pub outstanding: Money,
    pub status: CreditStatus,
}

/// every contract with its repayment progress
#[derive(Debug, Clone, Serialize)]
pub struct SalesManagementView {
    pub as_of: NaiveDate,
    pub rows: Vec<SalesManagementRow>,
}

pub fn sales_management<R: Repository>(
    repo: &R,
    today: NaiveDate,
) -> Result<SalesManagementView> {
    let mut rows = Vec::new();
    for sale in repo.list_sales()? {
        let parcel = repo.get_parcel(sale.parcel_id)?;
        let client = repo.get_client(sale.client_id)?;
        let agent_name = match sale.agent_id {
            Some(id) => repo.get_agent(id)?.name,
            None => String::new(),
        };
        let payments = repo.list_payments_for_sale(sale.id)?;

        let schedule = InstallmentSchedule::generate(&sale)?;
        let reconciled = reconcile(&schedule, &payments);
        let credit = CreditState::evaluate(&sale, &payments, today)?;
        let installments_paid = reconciled
            .rows
            .iter()
            .filter(|r| r.status == InstallmentStatus::Paid)
            .count() as u32;

        rows.push(SalesManagementRow {
            sale_id: sale.id,
            parcel_display: parcel.display_key(),
            client_name: client.name,
            agent_name,
            contract_date: sale.contract_date,
            agreed_price: sale.agreed_price,
            down_payment: sale.down_payment,
            term_months: sale.term_months,
            installment_amount: sale.installment_amount,
            installments_paid,
            outstanding: credit.outstanding,
            status: credit.status,
        });
    }

    Ok(SalesManagementView { as_of: today, rows })
}

/// what a new contract can be drafted from
#[derive(Debug, Clone, Serialize)]
pub struct NewSaleOptionsView {
    pub available_parcels: Vec<Parcel>,
    pub clients: Vec<Client>,
    pub agents: Vec<Agent>,
}

pub fn new_sale_options<R: Repository>(repo: &R) -> Result<NewSaleOptionsView> {
    let available_parcels = repo
        .list_parcels()?
        .into_iter()
        .filter(|p| p.status == ParcelStatus::Available)
        .collect();
    Ok(NewSaleOptionsView {
        available_parcels,
        clients: repo.list_clients()?,
        agents: repo.list_agents()?,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ParcelCatalogRow {
    pub parcel: Parcel,
    pub display_key: String,
}

/// the whole development, block by block
#[derive(Debug, Clone, Serialize)]
pub struct ParcelCatalogView {
    pub total: u32,
    pub available: u32,
    pub sold: u32,
    pub rows: Vec<ParcelCatalogRow>,
}

pub fn parcel_catalog<R: Repository>(repo: &R) -> Result<ParcelCatalogView> {
    let parcels = repo.list_parcels()?;
    let total = parcels.len() as u32;
    let sold = parcels
        .iter()
        .filter(|p| p.status == ParcelStatus::Sold)
        .count() as u32;

    let rows = parcels
        .into_iter()
        .map(|parcel| {
            let display_key = parcel.display_key();
            ParcelCatalogRow {
                parcel,
                display_key,
            }
        })
        .collect();

    Ok(ParcelCatalogView {
        total,
        available: total - sold,
        sold,
        rows,
    })
}

/// the people registry
#[derive(Debug, Clone, Serialize)]
pub struct ClientsAndAgentsView {
    pub clients: Vec<Client>,
    pub agents: Vec<Agent>,
}

pub fn clients_and_agents<R: Repository>(repo: &R) -> Result<ClientsAndAgentsView> {
    Ok(ClientsAndAgentsView {
        clients: repo.list_clients()?,
        agents: repo.list_agents()?,
    })
}
