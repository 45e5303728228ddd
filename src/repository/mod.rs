pub mod memory;

pub use memory::MemoryRepository;

use crate::errors::{LedgerError, Result};
use crate::records::{
    Agent, Client, NewAgent, NewClient, NewParcel, NewPayment, NewSale, Parcel, Payment, Sale,
};
use crate::types::{AgentId, ClientId, ParcelId, ParcelStatus, SaleId};

/// storage seam for the ledger
///
/// Implementations assign record ids on insert and enforce referential
/// integrity: a sale only lands on an existing, available, unreferenced
/// parcel, a payment only lands on an existing sale, and records referenced
/// by a sale cannot be deleted. Domain policy beyond integrity lives in the
/// command handlers, not here.
pub trait Repository {
    fn insert_parcel(&mut self, draft: NewParcel) -> Result<Parcel>;
    /// update a parcel's descriptive fields; status is untouched
    fn update_parcel(&mut self, id: ParcelId, draft: NewParcel) -> Result<Parcel>;
    fn delete_parcel(&mut self, id: ParcelId) -> Result<()>;
    fn list_parcels(&self) -> Result<Vec<Parcel>>;
    fn update_parcel_status(&mut self, id: ParcelId, status: ParcelStatus) -> Result<()>;

    fn insert_client(&mut self, draft: NewClient) -> Result<Client>;
    fn update_client(&mut self, id: ClientId, draft: NewClient) -> Result<Client>;
    fn delete_client(&mut self, id: ClientId) -> Result<()>;
    fn list_clients(&self) -> Result<Vec<Client>>;

    fn insert_agent(&mut self, draft: NewAgent) -> Result<Agent>;
    fn update_agent(&mut self, id: AgentId, draft: NewAgent) -> Result<Agent>;
    fn delete_agent(&mut self, id: AgentId) -> Result<()>;
    fn list_agents(&self) -> Result<Vec<Agent>>;

    fn insert_sale(&mut self, draft: NewSale) -> Result<Sale>;
    fn list_sales(&self) -> Result<Vec<Sale>>;

    fn insert_payment(&mut self, draft: NewPayment) -> Result<Payment>;
    /// payments registered against one sale, in registration order
    fn list_payments_for_sale(&self, sale_id: SaleId) -> Result<Vec<Payment>>;
    /// every payment in the ledger, in registration order
    fn list_all_payments(&self) -> Result<Vec<Payment>>;

    fn get_parcel(&self, id: ParcelId) -> Result<Parcel> {
        self.list_parcels()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "parcel",
                id,
            })
    }

    fn get_client(&self, id: ClientId) -> Result<Client> {
        self.list_clients()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "client",
                id,
            })
    }

    fn get_agent(&self, id: AgentId) -> Result<Agent> {
        self.list_agents()?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or(LedgerError::NotFound {
                entity: "agent",
                id,
            })
    }

    fn get_sale(&self, id: SaleId) -> Result<Sale> {
        self.list_sales()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(LedgerError::NotFound { entity: "sale", id })
    }
}
