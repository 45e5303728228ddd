use std::collections::BTreeMap;

use uuid::{ContextV7, Timestamp, Uuid};

use crate::errors::{LedgerError, Result};
use crate::records::{
    Agent, Client, NewAgent, NewClient, NewParcel, NewPayment, NewSale, Parcel, Payment, Sale,
};
use crate::repository::Repository;
use crate::types::{AgentId, ClientId, ParcelId, ParcelStatus, PaymentId, SaleId};

/// in-memory repository
///
/// Ids are v7 uuids minted through one shared context, so they stay strictly
/// increasing even within a millisecond and listing a map keyed by them
/// yields insertion order without a separate sequence.
pub struct MemoryRepository {
    ids: ContextV7,
    parcels: BTreeMap<ParcelId, Parcel>,
    clients: BTreeMap<ClientId, Client>,
    agents: BTreeMap<AgentId, Agent>,
    sales: BTreeMap<SaleId, Sale>,
    payments: BTreeMap<PaymentId, Payment>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            ids: ContextV7::new(),
            parcels: BTreeMap::new(),
            clients: BTreeMap::new(),
            agents: BTreeMap::new(),
            sales: BTreeMap::new(),
            payments: BTreeMap::new(),
        }
    }

    fn next_id(&self) -> Uuid {
        Uuid::new_v7(Timestamp::now(&self.ids))
    }

    fn sale_on_parcel(&self, parcel_id: ParcelId) -> Option<&Sale> {
        self.sales.values().find(|s| s.parcel_id == parcel_id)
    }
}

impl Repository for MemoryRepository {
    fn insert_parcel(&mut self, draft: NewParcel) -> Result<Parcel> {
        if self
            .parcels
            .values()
            .any(|p| p.block == draft.block && p.lot == draft.lot)
        {
            return Err(LedgerError::Conflict {
                message: format!("parcel M{}-L{} already registered", draft.block, draft.lot),
            });
        }

        let parcel = Parcel {
            id: self.next_id(),
            block: draft.block,
            lot: draft.lot,
            area_sqm: draft.area_sqm,
            list_price: draft.list_price,
            status: ParcelStatus::Available,
        };
        self.parcels.insert(parcel.id, parcel.clone());
        Ok(parcel)
    }

    fn update_parcel(&mut self, id: ParcelId, draft: NewParcel) -> Result<Parcel> {
        if self
            .parcels
            .values()
            .any(|p| p.id != id && p.block == draft.block && p.lot == draft.lot)
        {
            return Err(LedgerError::Conflict {
                message: format!(
                    "parcel M{}-L{} already registered under another id",
                    draft.block, draft.lot
                ),
            });
        }

        let parcel = self.parcels.get_mut(&id).ok_or(LedgerError::NotFound {
            entity: "parcel",
            id,
        })?;
        parcel.block = draft.block;
        parcel.lot = draft.lot;
        parcel.area_sqm = draft.area_sqm;
        parcel.list_price = draft.list_price;
        Ok(parcel.clone())
    }

    fn delete_parcel(&mut self, id: ParcelId) -> Result<()> {
        if !self.parcels.contains_key(&id) {
            return Err(LedgerError::NotFound {
                entity: "parcel",
                id,
            });
        }
        if let Some(sale) = self.sale_on_parcel(id) {
            return Err(LedgerError::Conflict {
                message: format!("parcel referenced by sale {}", sale.id),
            });
        }
        self.parcels.remove(&id);
        Ok(())
    }

    fn list_parcels(&self) -> Result<Vec<Parcel>> {
        Ok(self.parcels.values().cloned().collect())
    }

    fn update_parcel_status(&mut self, id: ParcelId, status: ParcelStatus) -> Result<()> {
        let parcel = self.parcels.get_mut(&id).ok_or(LedgerError::NotFound {
            entity: "parcel",
            id,
        })?;
        parcel.status = status;
        Ok(())
    }

    fn insert_client(&mut self, draft: NewClient) -> Result<Client> {
        let client = Client {
            id: self.next_id(),
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            notes: draft.notes,
        };
        self.clients.insert(client.id, client.clone());
        Ok(client)
    }

    fn update_client(&mut self, id: ClientId, draft: NewClient) -> Result<Client> {
        let client = self.clients.get_mut(&id).ok_or(LedgerError::NotFound {
            entity: "client",
            id,
        })?;
        client.name = draft.name;
        client.phone = draft.phone;
        client.email = draft.email;
        client.address = draft.address;
        client.notes = draft.notes;
        Ok(client.clone())
    }

    fn delete_client(&mut self, id: ClientId) -> Result<()> {
        if !self.clients.contains_key(&id) {
            return Err(LedgerError::NotFound {
                entity: "client",
                id,
            });
        }
        if let Some(sale) = self.sales.values().find(|s| s.client_id == id) {
            return Err(LedgerError::Conflict {
                message: format!("client referenced by sale {}", sale.id),
            });
        }
        self.clients.remove(&id);
        Ok(())
    }

    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.clients.values().cloned().collect())
    }

    fn insert_agent(&mut self, draft: NewAgent) -> Result<Agent> {
        let agent = Agent {
            id: self.next_id(),
            name: draft.name,
            phone: draft.phone,
        };
        self.agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    fn update_agent(&mut self, id: AgentId, draft: NewAgent) -> Result<Agent> {
        let agent = self.agents.get_mut(&id).ok_or(LedgerError::NotFound {
            entity: "agent",
            id,
        })?;
        agent.name = draft.name;
        agent.phone = draft.phone;
        Ok(agent.clone())
    }

    fn delete_agent(&mut self, id: AgentId) -> Result<()> {
        if !self.agents.contains_key(&id) {
            return Err(LedgerError::NotFound {
                entity: "agent",
                id,
            });
        }
        if let Some(sale) = self.sales.values().find(|s| s.agent_id == Some(id)) {
            return Err(LedgerError::Conflict {
                message: format!("agent referenced by sale {}", sale.id),
            });
        }
        self.agents.remove(&id);
        Ok(())
    }

    fn list_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.agents.values().cloned().collect())
    }

    fn insert_sale(&mut self, draft: NewSale) -> Result<Sale> {
        let parcel = self
            .parcels
            .get(&draft.parcel_id)
            .ok_or(LedgerError::NotFound {
                entity: "parcel",
                id: draft.parcel_id,
            })?;
        if !self.clients.contains_key(&draft.client_id) {
            return Err(LedgerError::NotFound {
                entity: "client",
                id: draft.client_id,
            });
        }
        if let Some(agent_id) = draft.agent_id {
            if !self.agents.contains_key(&agent_id) {
                return Err(LedgerError::NotFound {
                    entity: "agent",
                    id: agent_id,
                });
            }
        }
        if parcel.status != ParcelStatus::Available {
            return Err(LedgerError::Conflict {
                message: format!("parcel {} is not available", parcel.display_key()),
            });
        }
        if let Some(existing) = self.sale_on_parcel(draft.parcel_id) {
            return Err(LedgerError::Conflict {
                message: format!(
                    "parcel {} already attached to sale {}",
                    parcel.display_key(),
                    existing.id
                ),
            });
        }

        let sale = Sale {
            id: self.next_id(),
            parcel_id: draft.parcel_id,
            client_id: draft.client_id,
            agent_id: draft.agent_id,
            contract_date: draft.contract_date,
            agreed_price: draft.agreed_price,
            down_payment: draft.down_payment,
            term_months: draft.term_months,
            installment_amount: draft.installment_amount,
            total_commission: draft.total_commission,
        };
        self.sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    fn list_sales(&self) -> Result<Vec<Sale>> {
        Ok(self.sales.values().cloned().collect())
    }

    fn insert_payment(&mut self, draft: NewPayment) -> Result<Payment> {
        if !self.sales.contains_key(&draft.sale_id) {
            return Err(LedgerError::NotFound {
                entity: "sale",
                id: draft.sale_id,
            });
        }

        let payment = Payment {
            id: self.next_id(),
            sale_id: draft.sale_id,
            amount: draft.amount,
            date: draft.date,
        };
        self.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    fn list_payments_for_sale(&self, sale_id: SaleId) -> Result<Vec<Payment>> {
        Ok(self
            .payments
            .values()
            .filter(|p| p.sale_id == sale_id)
            .cloned()
            .collect())
    }

    fn list_all_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.values().cloned().collect())
    }
}
