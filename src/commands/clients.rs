use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::records::{Client, NewClient};
use crate::repository::Repository;
use crate::types::ClientId;

/// add a client to the register
pub fn create_client<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    draft: NewClient,
) -> Result<Client> {
    let client = match draft.validate().and_then(|_| repo.insert_client(draft)) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(error = %e, "client create rejected");
            return Err(e);
        }
    };

    tracing::info!(client_id = %client.id, "client created");
    events.emit(Event::ClientCreated {
        client_id: client.id,
        name: client.name.clone(),
    });
    Ok(client)
}

/// rewrite a client's contact details
pub fn update_client<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: ClientId,
    draft: NewClient,
) -> Result<Client> {
    let client = match draft.validate().and_then(|_| repo.update_client(id, draft)) {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(client_id = %id, error = %e, "client update rejected");
            return Err(e);
        }
    };

    tracing::info!(client_id = %id, "client updated");
    events.emit(Event::ClientUpdated { client_id: id });
    Ok(client)
}

/// drop a client from the register
pub fn delete_client<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: ClientId,
) -> Result<()> {
    if let Err(e) = repo.delete_client(id) {
        tracing::debug!(client_id = %id, error = %e, "client delete rejected");
        return Err(e);
    }

    tracing::info!(client_id = %id, "client deleted");
    events.emit(Event::ClientDeleted { client_id: id });
    Ok(())
}
