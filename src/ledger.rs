use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::calendar::business_date;
use crate::commands;
use crate::config::LedgerConfig;
use crate::credit::CreditState;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::portfolio::PortfolioSnapshot;
use crate::records::{
    Agent, Client, NewAgent, NewClient, NewParcel, NewPayment, NewSale, Parcel, Sale,
};
use crate::repository::Repository;
use crate::schedule::InstallmentSchedule;
use crate::types::{AgentId, ClientId, ParcelId, SaleId};
use crate::views::{
    self, ClientsAndAgentsView, CollectionsView, ContractDetailView, NewSaleOptionsView,
    ParcelCatalogView, SalesManagementView,
};

/// the lot-sale ledger
///
/// Wraps a repository with the command handlers and read views, and collects
/// the events commands emit until the caller drains them. One instance per
/// ledger; commands take `&mut self`, so they serialize naturally.
pub struct Ledger<R: Repository> {
    pub config: LedgerConfig,
    pub repo: R,
    pub events: EventStore,
}

impl<R: Repository> Ledger<R> {
    /// open a ledger over a repository with default policy
    pub fn new(repo: R) -> Self {
        Self {
            config: LedgerConfig::default(),
            repo,
            events: EventStore::new(),
        }
    }

    /// open a ledger with explicit policy
    pub fn with_config(repo: R, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            repo,
            events: EventStore::new(),
        })
    }

    // ------------------------------------------------------------------
    // commands
    // ------------------------------------------------------------------

    pub fn create_parcel(&mut self, draft: NewParcel) -> Result<Parcel> {
        commands::create_parcel(&mut self.repo, &mut self.events, draft)
    }

    pub fn update_parcel(&mut self, id: ParcelId, draft: NewParcel) -> Result<Parcel> {
        commands::update_parcel(&mut self.repo, &mut self.events, id, draft)
    }

    pub fn delete_parcel(&mut self, id: ParcelId) -> Result<()> {
        commands::delete_parcel(&mut self.repo, &mut self.events, id)
    }

    pub fn create_client(&mut self, draft: NewClient) -> Result<Client> {
        commands::create_client(&mut self.repo, &mut self.events, draft)
    }

    pub fn update_client(&mut self, id: ClientId, draft: NewClient) -> Result<Client> {
        commands::update_client(&mut self.repo, &mut self.events, id, draft)
    }

    pub fn delete_client(&mut self, id: ClientId) -> Result<()> {
        commands::delete_client(&mut self.repo, &mut self.events, id)
    }

    pub fn create_agent(&mut self, draft: NewAgent) -> Result<Agent> {
        commands::create_agent(&mut self.repo, &mut self.events, draft)
    }

    pub fn update_agent(&mut self, id: AgentId, draft: NewAgent) -> Result<Agent> {
        commands::update_agent(&mut self.repo, &mut self.events, id, draft)
    }

    pub fn delete_agent(&mut self, id: AgentId) -> Result<()> {
        commands::delete_agent(&mut self.repo, &mut self.events, id)
    }

    pub fn register_sale(&mut self, draft: NewSale, time: &SafeTimeProvider) -> Result<Sale> {
        commands::register_sale(&mut self.repo, &mut self.events, draft, time)
    }

    pub fn register_payment(
        &mut self,
        draft: NewPayment,
        time: &SafeTimeProvider,
    ) -> Result<commands::PaymentReceipt> {
        commands::register_payment(&mut self.repo, &mut self.events, &self.config, draft, time)
    }

    // ------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------

    /// planned schedule for one sale
    pub fn schedule(&self, sale_id: SaleId) -> Result<InstallmentSchedule> {
        let sale = self.repo.get_sale(sale_id)?;
        InstallmentSchedule::generate(&sale)
    }

    /// credit standing of one sale as of the business date
    pub fn credit_state(&self, sale_id: SaleId, time: &SafeTimeProvider) -> Result<CreditState> {
        self.credit_state_on(sale_id, business_date(time))
    }

    /// credit standing of one sale as of an arbitrary date
    pub fn credit_state_on(&self, sale_id: SaleId, today: NaiveDate) -> Result<CreditState> {
        let sale = self.repo.get_sale(sale_id)?;
        let payments = self.repo.list_payments_for_sale(sale_id)?;
        CreditState::evaluate(&sale, &payments, today)
    }

    pub fn portfolio_summary(&self, time: &SafeTimeProvider) -> Result<PortfolioSnapshot> {
        views::portfolio_summary(&self.repo, &self.config, business_date(time))
    }

    pub fn collections(&self, time: &SafeTimeProvider) -> Result<CollectionsView> {
        views::collections(&self.repo, &self.config, business_date(time))
    }

    pub fn contract_detail(
        &self,
        sale_id: SaleId,
        time: &SafeTimeProvider,
    ) -> Result<ContractDetailView> {
        views::contract_detail(&self.repo, sale_id, business_date(time))
    }

    pub fn sales_management(&self, time: &SafeTimeProvider) -> Result<SalesManagementView> {
        views::sales_management(&self.repo, business_date(time))
    }

    pub fn new_sale_options(&self) -> Result<NewSaleOptionsView> {
        views::new_sale_options(&self.repo)
    }

    pub fn parcel_catalog(&self) -> Result<ParcelCatalogView> {
        views::parcel_catalog(&self.repo)
    }

    pub fn clients_and_agents(&self) -> Result<ClientsAndAgentsView> {
        views::clients_and_agents(&self.repo)
    }

    /// even installment covering a draft's financed principal
    pub fn suggested_installment(
        &self,
        agreed_price: Money,
        down_payment: Money,
        term_months: u32,
    ) -> Result<Money> {
        commands::suggested_installment(agreed_price, down_payment, term_months)
    }

    // ------------------------------------------------------------------
    // events
    // ------------------------------------------------------------------

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn pending_events(&self) -> &[Event] {
        self.events.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::types::{CreditStatus, ParcelStatus};
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_contract_lifecycle() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        ));
        let mut ledger = Ledger::new(MemoryRepository::new());

        let parcel = ledger
            .create_parcel(NewParcel {
                block: "3".to_string(),
                lot: "14".to_string(),
                area_sqm: dec!(250),
                list_price: Money::from_major(120_000),
            })
            .unwrap();
        let client = ledger
            .create_client(NewClient {
                name: "Marcos Lima".to_string(),
                phone: Some("+55 11 97777-0000".to_string()),
                email: Some("marcos@example.com".to_string()),
                address: None,
                notes: None,
            })
            .unwrap();
        let agent = ledger
            .create_agent(NewAgent {
                name: "Ana Souza".to_string(),
                phone: Some("+55 11 98888-0001".to_string()),
            })
            .unwrap();

        let installment = ledger
            .suggested_installment(Money::from_major(120_000), Money::from_major(20_000), 10)
            .unwrap();
        let sale = ledger
            .register_sale(
                NewSale {
                    parcel_id: parcel.id,
                    client_id: client.id,
                    agent_id: Some(agent.id),
                    contract_date: date(2024, 1, 15),
                    agreed_price: Money::from_major(120_000),
                    down_payment: Money::from_major(20_000),
                    term_months: 10,
                    installment_amount: installment,
                    total_commission: Some(Money::from_major(6_000)),
                },
                &time,
            )
            .unwrap();

        assert_eq!(
            ledger.repo.get_parcel(parcel.id).unwrap().status,
            ParcelStatus::Sold
        );

        // one month later the first installment comes in
        time.test_control()
            .unwrap()
            .advance(Duration::days(31));
        let receipt = ledger
            .register_payment(
                NewPayment {
                    sale_id: sale.id,
                    amount: installment,
                    date: date(2024, 2, 15),
                },
                &time,
            )
            .unwrap();
        assert_eq!(receipt.credit.status, CreditStatus::Current);
        assert_eq!(receipt.credit.outstanding, Money::from_major(90_000));

        let summary = ledger.portfolio_summary(&time).unwrap();
        assert_eq!(summary.totals.contracts, 1);
        assert_eq!(summary.totals.current, 1);

        let drained = ledger.take_events();
        assert!(!drained.is_empty());
        assert!(ledger.pending_events().is_empty());
    }

    #[test]
    fn test_with_config_validates() {
        let bad = LedgerConfig {
            severe_days_past_due: 10,
            mild_days_past_due: 25,
            payment_date_tolerance_days: 1,
        };
        assert!(Ledger::with_config(MemoryRepository::new(), bad).is_err());
    }

    #[test]
    fn test_credit_state_on_arbitrary_date() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        ));
        let mut ledger = Ledger::new(MemoryRepository::new());

        let parcel = ledger
            .create_parcel(NewParcel {
                block: "1".to_string(),
                lot: "1".to_string(),
                area_sqm: dec!(300),
                list_price: Money::from_major(120_000),
            })
            .unwrap();
        let client = ledger
            .create_client(NewClient {
                name: "Paula Reis".to_string(),
                phone: Some("+55 11 96666-0000".to_string()),
                email: Some("paula@example.com".to_string()),
                address: None,
                notes: None,
            })
            .unwrap();
        let sale = ledger
            .register_sale(
                NewSale {
                    parcel_id: parcel.id,
                    client_id: client.id,
                    agent_id: None,
                    contract_date: date(2024, 1, 15),
                    agreed_price: Money::from_major(120_000),
                    down_payment: Money::from_major(20_000),
                    term_months: 10,
                    installment_amount: Money::from_major(10_000),
                    total_commission: None,
                },
                &time,
            )
            .unwrap();

        let unpaid_future = ledger.credit_state_on(sale.id, date(2024, 6, 1)).unwrap();
        assert_eq!(unpaid_future.status, CreditStatus::Delinquent);
        assert_eq!(unpaid_future.expected_installments_paid, 4);
        assert_eq!(unpaid_future.overdue_amount, Money::from_major(40_000));
    }
}
