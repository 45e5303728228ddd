use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::records::{NewSale, Sale};
use crate::repository::Repository;
use crate::types::ParcelStatus;

/// even installment that covers the financed principal, rounded up to the cent
pub fn suggested_installment(
    agreed_price: Money,
    down_payment: Money,
    term_months: u32,
) -> Result<Money> {
    if term_months == 0 {
        return Err(LedgerError::Validation {
            field: "term_months",
            message: "term must be at least one month".to_string(),
        });
    }
    let principal = agreed_price - down_payment;
    if principal.is_negative() {
        return Err(LedgerError::Validation {
            field: "down_payment",
            message: format!(
                "down payment {} exceeds agreed price {}",
                down_payment, agreed_price
            ),
        });
    }
    Ok(principal.div_ceil(Decimal::from(term_months)))
}

/// register a sale contract and take its parcel off the market
///
/// The repository gates the insert on the parcel being present, available
/// and unreferenced, so once the sale lands the status flip cannot fail and
/// a rejected contract leaves nothing behind.
pub fn register_sale<R: Repository>(
    repo: &mut R,
    events: &mut EventStore,
    draft: NewSale,
    time: &SafeTimeProvider,
) -> Result<Sale> {
    let parcel_id = draft.parcel_id;
    let sale = match place_sale(repo, draft) {
        Ok(sale) => sale,
        Err(e) => {
            tracing::debug!(parcel_id = %parcel_id, error = %e, "sale rejected");
            return Err(e);
        }
    };

    tracing::info!(
        sale_id = %sale.id,
        parcel_id = %sale.parcel_id,
        agreed = %sale.agreed_price,
        "sale registered"
    );
    events.emit(Event::SaleRegistered {
        sale_id: sale.id,
        parcel_id: sale.parcel_id,
        client_id: sale.client_id,
        agent_id: sale.agent_id,
        agreed_price: sale.agreed_price,
        principal_financed: sale.principal_financed(),
        term_months: sale.term_months,
        timestamp: time.now(),
    });
    events.emit(Event::ParcelMarkedSold {
        parcel_id: sale.parcel_id,
        sale_id: sale.id,
    });
    Ok(sale)
}

fn place_sale<R: Repository>(repo: &mut R, draft: NewSale) -> Result<Sale> {
    draft.validate()?;

    let sale = repo.insert_sale(draft)?;
    repo.update_parcel_status(sale.parcel_id, ParcelStatus::Sold)?;
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create_agent, create_client, create_parcel};
    use crate::records::{NewAgent, NewClient, NewParcel};
    use crate::repository::MemoryRepository;
    use crate::types::{AgentId, ClientId, ParcelId};
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        ))
    }

    fn seed(repo: &mut MemoryRepository, events: &mut EventStore) -> (ParcelId, ClientId, AgentId) {
        let parcel = create_parcel(
            repo,
            events,
            NewParcel {
                block: "3".to_string(),
                lot: "14".to_string(),
                area_sqm: dec!(250),
                list_price: Money::from_major(120_000),
            },
        )
        .unwrap();
        let client = create_client(
            repo,
            events,
            NewClient {
                name: "Marcos Lima".to_string(),
                phone: Some("+55 11 97777-0000".to_string()),
                email: Some("marcos@example.com".to_string()),
                address: None,
                notes: None,
            },
        )
        .unwrap();
        let agent = create_agent(
            repo,
            events,
            NewAgent {
                name: "Ana Souza".to_string(),
                phone: Some("+55 11 98888-0001".to_string()),
            },
        )
        .unwrap();
        events.clear();
        (parcel.id, client.id, agent.id)
    }

    fn draft(parcel: ParcelId, client: ClientId, agent: AgentId) -> NewSale {
        NewSale {
            parcel_id: parcel,
            client_id: client,
            agent_id: Some(agent),
            contract_date: date(2024, 1, 15),
            agreed_price: Money::from_major(120_000),
            down_payment: Money::from_major(20_000),
            term_months: 10,
            installment_amount: Money::from_major(10_000),
            total_commission: Some(Money::from_major(6_000)),
        }
    }

    #[test]
    fn test_register_sale_marks_parcel_sold() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let (parcel_id, client_id, agent_id) = seed(&mut repo, &mut events);

        let sale =
            register_sale(&mut repo, &mut events, draft(parcel_id, client_id, agent_id), &clock())
                .unwrap();

        assert_eq!(repo.get_parcel(parcel_id).unwrap().status, ParcelStatus::Sold);

        let emitted = events.take_events();
        assert_eq!(emitted.len(), 2);
        assert!(matches!(
            &emitted[0],
            Event::SaleRegistered { sale_id, principal_financed, .. }
                if *sale_id == sale.id && *principal_financed == Money::from_major(100_000)
        ));
        assert!(matches!(
            &emitted[1],
            Event::ParcelMarkedSold { parcel_id: p, .. } if *p == parcel_id
        ));
    }

    #[test]
    fn test_double_sell_conflicts_without_side_effects() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let (parcel_id, client_id, agent_id) = seed(&mut repo, &mut events);

        register_sale(&mut repo, &mut events, draft(parcel_id, client_id, agent_id), &clock())
            .unwrap();
        events.clear();

        let err = register_sale(
            &mut repo,
            &mut events,
            draft(parcel_id, client_id, agent_id),
            &clock(),
        )
        .unwrap_err();

        assert!(matches!(err, LedgerError::Conflict { .. }));
        assert_eq!(repo.list_sales().unwrap().len(), 1);
        assert!(events.events().is_empty());
    }

    #[test]
    fn test_rejected_draft_leaves_parcel_available() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let (parcel_id, client_id, agent_id) = seed(&mut repo, &mut events);

        let mut bad = draft(parcel_id, client_id, agent_id);
        bad.installment_amount = Money::from_major(5_000);
        let err = register_sale(&mut repo, &mut events, bad, &clock()).unwrap_err();

        assert!(matches!(err, LedgerError::Validation { .. }));
        assert_eq!(
            repo.get_parcel(parcel_id).unwrap().status,
            ParcelStatus::Available
        );
        assert!(repo.list_sales().unwrap().is_empty());
    }

    #[test]
    fn test_sale_without_agent() {
        let mut repo = MemoryRepository::new();
        let mut events = EventStore::new();
        let (parcel_id, client_id, _) = seed(&mut repo, &mut events);

        let mut direct = draft(parcel_id, client_id, AgentId::nil());
        direct.agent_id = None;
        direct.total_commission = None;
        let sale = register_sale(&mut repo, &mut events, direct, &clock()).unwrap();

        assert_eq!(sale.agent_id, None);
        assert!(matches!(
            &events.take_events()[0],
            Event::SaleRegistered { agent_id: None, .. }
        ));
    }

    #[test]
    fn test_suggested_installment_covers_principal() {
        let suggestion =
            suggested_installment(Money::from_major(100_000), Money::from_major(0), 36).unwrap();
        assert_eq!(suggestion, Money::from_str_exact("2777.78").unwrap());
        assert!(suggestion * 36u32 >= Money::from_major(100_000));

        let even =
            suggested_installment(Money::from_major(120_000), Money::from_major(20_000), 10)
                .unwrap();
        assert_eq!(even, Money::from_major(10_000));
    }

    #[test]
    fn test_suggested_installment_rejects_zero_term() {
        assert!(
            suggested_installment(Money::from_major(100_000), Money::ZERO, 0).is_err()
        );
    }
}
