/// time control - deterministic delinquency testing with a driven clock
use lot_ledger_rs::{
    CreditStatus, Ledger, MemoryRepository, Money, NewAgent, NewClient, NewParcel, NewPayment,
    NewSale, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    // create controlled time for testing
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    println!("starting date: {}", time.now().format("%Y-%m-%d"));

    let mut ledger = Ledger::new(MemoryRepository::new());
    let parcel = ledger.create_parcel(NewParcel {
        block: "5".to_string(),
        lot: "12".to_string(),
        area_sqm: dec!(360),
        list_price: Money::from_major(120_000),
    })?;
    let client = ledger.create_client(NewClient {
        name: "Marcos Lima".to_string(),
        phone: Some("+55 11 97777-0000".to_string()),
        email: Some("marcos@example.com".to_string()),
        address: None,
        notes: None,
    })?;
    let agent = ledger.create_agent(NewAgent {
        name: "Ana Souza".to_string(),
        phone: Some("+55 11 98888-0001".to_string()),
    })?;

    // contract signed on the start date: 100k financed over 10 months
    let sale = ledger.register_sale(
        NewSale {
            parcel_id: parcel.id,
            client_id: client.id,
            agent_id: Some(agent.id),
            contract_date: time.now().date_naive(),
            agreed_price: Money::from_major(120_000),
            down_payment: Money::from_major(20_000),
            term_months: 10,
            installment_amount: Money::from_major(10_000),
            total_commission: Some(Money::from_major(6_000)),
        },
        &time,
    )?;
    println!("contract signed on {}", time.now().format("%Y-%m-%d"));

    // first installment paid on the nose
    controller.advance(Duration::days(31));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));
    let receipt = ledger.register_payment(
        NewPayment {
            sale_id: sale.id,
            amount: Money::from_major(10_000),
            date: time.now().date_naive(),
        },
        &time,
    )?;
    println!(
        "paid $10,000 -> {:?}, outstanding ${}",
        receipt.credit.status, receipt.credit.outstanding
    );

    // then the buyer goes quiet for three months
    controller.advance(Duration::days(95));
    println!("\nadvanced to: {}", time.now().format("%Y-%m-%d"));
    let credit = ledger.credit_state(sale.id, &time)?;
    println!(
        "no payments -> {:?}, ${} overdue, {} days past due",
        credit.status, credit.overdue_amount, credit.days_past_due
    );
    assert_eq!(credit.status, CreditStatus::Delinquent);

    // a catch-up payment clears the arrears
    let receipt = ledger.register_payment(
        NewPayment {
            sale_id: sale.id,
            amount: Money::from_major(30_000),
            date: time.now().date_naive(),
        },
        &time,
    )?;
    println!(
        "caught up with $30,000 -> {:?}, outstanding ${}",
        receipt.credit.status, receipt.credit.outstanding
    );

    // settle the rest after maturity
    controller.advance(Duration::days(195));
    println!("\nadvanced to: {} (past maturity)", time.now().format("%Y-%m-%d"));
    let receipt = ledger.register_payment(
        NewPayment {
            sale_id: sale.id,
            amount: receipt.credit.outstanding,
            date: time.now().date_naive(),
        },
        &time,
    )?;
    println!("final payment -> {:?}", receipt.credit.status);
    assert_eq!(receipt.credit.status, CreditStatus::PaidOff);

    // everything that happened, in order
    println!("\nrecorded events:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
