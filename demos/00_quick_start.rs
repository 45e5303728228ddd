/// quick start - minimal example to get started
use lot_ledger_rs::views::to_json_pretty;
use lot_ledger_rs::{
    Ledger, MemoryRepository, Money, NewAgent, NewClient, NewParcel, NewPayment, NewSale,
    SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // production: use system time
    let time = SafeTimeProvider::new(TimeSource::System);
    let today = time.now().date_naive();

    let mut ledger = Ledger::new(MemoryRepository::new());

    // register a lot, a buyer, and the selling agent
    let parcel = ledger.create_parcel(NewParcel {
        block: "1".to_string(),
        lot: "7".to_string(),
        area_sqm: dec!(250),
        list_price: Money::from_major(120_000),
    })?;
    let client = ledger.create_client(NewClient {
        name: "Marcos Lima".to_string(),
        phone: Some("+55 11 97777-0000".to_string()),
        email: Some("marcos@example.com".to_string()),
        address: Some("Rua das Acácias 120, São Paulo".to_string()),
        notes: None,
    })?;
    let agent = ledger.create_agent(NewAgent {
        name: "Ana Souza".to_string(),
        phone: Some("+55 11 98888-0001".to_string()),
    })?;

    // sell it: 20k down, the rest over 10 months
    let installment =
        ledger.suggested_installment(Money::from_major(120_000), Money::from_major(20_000), 10)?;
    let sale = ledger.register_sale(
        NewSale {
            parcel_id: parcel.id,
            client_id: client.id,
            agent_id: Some(agent.id),
            contract_date: today,
            agreed_price: Money::from_major(120_000),
            down_payment: Money::from_major(20_000),
            term_months: 10,
            installment_amount: installment,
            total_commission: Some(Money::from_major(6_000)),
        },
        &time,
    )?;

    // first installment arrives
    let receipt = ledger.register_payment(
        NewPayment {
            sale_id: sale.id,
            amount: installment,
            date: today,
        },
        &time,
    )?;
    println!("outstanding: ${}", receipt.credit.outstanding);

    // print the contract page
    let detail = ledger.contract_detail(sale.id, &time)?;
    println!("{}", to_json_pretty(&detail)?);

    Ok(())
}
