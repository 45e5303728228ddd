use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::records::{NewParcel, Parcel};
use crate::repository::Repository;
use crate::types::ParcelId;

/// add a parcel to the catalog
pub fn create_parcel<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    draft: NewParcel,
) -> Result<Parcel> {
    let parcel = match draft.validate().and_then(|_| repo.insert_parcel(draft)) {
        Ok(parcel) => parcel,
        Err(e) => {
            tracing::debug!(error = %e, "parcel create rejected");
            return Err(e);
        }
    };

    tracing::info!(parcel = %parcel.display_key(), "parcel created");
    events.emit(Event::ParcelCreated {
        parcel_id: parcel.id,
        block: parcel.block.clone(),
        lot: parcel.lot.clone(),
        list_price: parcel.list_price,
    });
    Ok(parcel)
}

/// rewrite a parcel's descriptive fields
///
/// Block and lot identify the parcel on the signed contract, so they freeze
/// once a sale references it. Area and price stay editable; each sale captured
/// its own agreed_price at signing.
pub fn update_parcel<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: ParcelId,
    draft: NewParcel,
) -> Result<Parcel> {
    let parcel = match apply_update(repo, id, draft) {
        Ok(parcel) => parcel,
        Err(e) => {
            tracing::debug!(parcel_id = %id, error = %e, "parcel update rejected");
            return Err(e);
        }
    };

    tracing::info!(parcel = %parcel.display_key(), "parcel updated");
    events.emit(Event::ParcelUpdated { parcel_id: id });
    Ok(parcel)
}

fn apply_update<R: Repository>(repo: &mut R, id: ParcelId, draft: NewParcel) -> Result<Parcel> {
    draft.validate()?;

    let existing = repo.get_parcel(id)?;
    let referenced = repo.list_sales()?.iter().any(|s| s.parcel_id == id);
    if referenced && (draft.block != existing.block || draft.lot != existing.lot) {
        return Err(LedgerError::Conflict {
            message: format!(
                "parcel {} is referenced by a sale, block and lot cannot change",
                existing.display_key()
            ),
        });
    }

    repo.update_parcel(id, draft)
}

/// drop a parcel from the catalog
pub fn delete_parcel<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    id: ParcelId,
) -> Result<()> {
    if let Err(e) = repo.delete_parcel(id) {
        tracing::debug!(parcel_id = %id, error = %e, "parcel delete rejected");
        return Err(e);
    }

    tracing::info!(parcel_id = %id, "parcel deleted");
    events.emit(Event::ParcelDeleted { parcel_id: id });
    Ok(())
}
