use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{AgentId, ClientId, ParcelId, PaymentId, SaleId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // catalog events
    ParcelCreated {
        parcel_id: ParcelId,
        block: String,
        lot: String,
        list_price: Money,
    },
    ParcelUpdated {
        parcel_id: ParcelId,
    },
    ParcelDeleted {
        parcel_id: ParcelId,
    },
    ClientCreated {
        client_id: ClientId,
        name: String,
    },
    ClientUpdated {
        client_id: ClientId,
    },
    ClientDeleted {
        client_id: ClientId,
    },
    AgentCreated {
        agent_id: AgentId,
        name: String,
    },
    AgentUpdated {
        agent_id: AgentId,
    },
    AgentDeleted {
        agent_id: AgentId,
    },

    // contract events
    SaleRegistered {
        sale_id: SaleId,
        parcel_id: ParcelId,
        client_id: ClientId,
        agent_id: Option<AgentId>,
        agreed_price: Money,
        principal_financed: Money,
        term_months: u32,
        timestamp: DateTime<Utc>,
    },
    ParcelMarkedSold {
        parcel_id: ParcelId,
        sale_id: SaleId,
    },

    // collection events
    PaymentRegistered {
        payment_id: PaymentId,
        sale_id: SaleId,
        amount: Money,
        date: NaiveDate,
        outstanding_after: Money,
        timestamp: DateTime<Utc>,
    },
    SalePaidOff {
        sale_id: SaleId,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
