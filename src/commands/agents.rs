use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::records::{Agent, NewAgent};
use crate::repository::Repository;
use crate::types::AgentId;

/// add a sales agent to the register
pub fn create_agent<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    draft: NewAgent,
) -> Result<Agent> {
    let agent = match draft.validate().and_then(|_| repo.insert_agent(draft)) {
        Ok(agent) => agent,
        Err(e) => {
            tracing::debug!(error = %e, "agent create rejected");
            return Err(e);
        }
    };

    tracing::info!(agent_id = %agent.id, "agent created");
    events.emit(Event::AgentCreated {
        agent_id: agent.id,
        name: agent.name.clone(),
    });
    Ok(agent)
}

/// rewrite an agent's details
pub fn update_agent<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: AgentId,
    draft: NewAgent,
) -> Result<Agent> {
    let agent = match draft.validate().and_then(|_| repo.update_agent(id, draft)) {
        Ok(agent) => agent,
        Err(e) => {
            tracing::debug!(agent_id = %id, error = %e, "agent update rejected");
            return Err(e);
        }
    };

    tracing::info!(agent_id = %id, "agent updated");
    events.emit(Event::AgentUpdated { agent_id: id });
    Ok(agent)
}

/// drop an agent from the register
pub fn delete_agent<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: AgentId,
) -> Result<()> {
    if let Err(e) = repo.delete_agent(id) {
        tracing::debug!(agent_id = %id, error = %e, "agent delete rejected");
        return Err(e);
    }

    tracing::info!(agent_id = %id, "agent deleted");
    events.emit(Event::AgentDeleted { agent_id: id });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::errors::LedgerError;
    use crate::records::{NewClient, NewParcel, NewSale};
    use crate::repository::MemoryRepository;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn draft(name: &str) -> NewAgent {
        NewAgent {
            name: name.to_string(),
            phone: Some("+55 11 98888-0001".to_string()),
        }
    }

    fn attach_sale(repo: &mut MemoryRepository, agent_id: AgentId) {
        let parcel = repo
            .insert_parcel(NewParcel {
                block: "3".to_string(),
                lot: "14".to_string(),
                area_sqm: dec!(250),
                list_price: Money::from_major(80_000),
            })
            .unwrap();
        let client = repo
            .insert_client(NewClient {
                name: "Marcos Lima".to_string(),
                phone: None,
                email: None,
                address: None,
                notes: None,
            })
            .unwrap();
        repo.insert_sale(NewSale {
            parcel_id: parcel.id,
            client_id: client.id,
            agent_id: Some(agent_id),
            contract_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            agreed_price: Money::from_major(80_000),
            down_payment: Money::from_major(20_000),
            term_months: 6,
            installment_amount: Money::from_major(10_000),
            total_commission: None,
        })
        .unwrap();
    }

    #[test]
    fn test_create_agent() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();

        let agent = create_agent(&mut repo, &mut events, draft("Ana Souza")).unwrap();
        assert_eq!(agent.name, "Ana Souza");
        assert_eq!(events.take_events().len(), 1);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();

        let err = create_agent(&mut repo, &mut events, draft(" ")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation { field: "name", .. }));
        assert!(repo.list_agents().unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_agent() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let agent = create_agent(&mut repo, &mut events, draft("Ana Souza")).unwrap();

        let mut renamed = draft("Ana S. Prado");
        renamed.phone = None;
        let updated = update_agent(&mut repo, &mut events, agent.id, renamed).unwrap();
        assert_eq!(updated.name, "Ana S. Prado");
        assert_eq!(updated.phone, None);

        delete_agent(&mut repo, &mut events, agent.id).unwrap();
        assert!(repo.list_agents().unwrap().is_empty());
    }

    #[test]
    fn test_delete_of_selling_agent_is_rejected() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let agent = create_agent(&mut repo, &mut events, draft("Ana Souza")).unwrap();
        attach_sale(&mut repo, agent.id);
        events.clear();

        let err = delete_agent(&mut repo, &mut events, agent.id).unwrap_err();

        assert!(matches!(err, LedgerError::Conflict { .. }));
        assert_eq!(repo.list_agents().unwrap().len(), 1);
        assert!(events.events().is_empty());
    }
}
