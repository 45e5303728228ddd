/// contract schedule - planning installments and watching them settle
use lot_ledger_rs::{
    Ledger, MemoryRepository, Money, NewAgent, NewClient, NewParcel, NewPayment, NewSale,
    SafeTimeProvider, TimeSource,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== contract schedule example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();

    let mut ledger = Ledger::new(MemoryRepository::new());
    let parcel = ledger.create_parcel(NewParcel {
        block: "2".to_string(),
        lot: "3".to_string(),
        area_sqm: dec!(300),
        list_price: Money::from_major(90_000),
    })?;
    let client = ledger.create_client(NewClient {
        name: "Paula Reis".to_string(),
        phone: Some("+55 11 96666-0000".to_string()),
        email: Some("paula@example.com".to_string()),
        address: None,
        notes: None,
    })?;
    let agent = ledger.create_agent(NewAgent {
        name: "Ana Souza".to_string(),
        phone: Some("+55 11 98888-0001".to_string()),
    })?;

    // a month-end contract: due dates clamp to the short months
    let contract_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let installment =
        ledger.suggested_installment(Money::from_major(90_000), Money::from_major(30_000), 6)?;
    println!("suggested installment for $60,000 over 6 months: ${}", installment);

    let sale = ledger.register_sale(
        NewSale {
            parcel_id: parcel.id,
            client_id: client.id,
            agent_id: Some(agent.id),
            contract_date,
            agreed_price: Money::from_major(90_000),
            down_payment: Money::from_major(30_000),
            term_months: 6,
            installment_amount: installment,
            total_commission: Some(Money::from_major(4_500)),
        },
        &time,
    )?;

    // print the plan
    let schedule = ledger.schedule(sale.id)?;
    println!("\nplanned schedule:");
    for row in &schedule.installments {
        println!(
            "  #{} due {}  ${:>9}  principal left ${:>9}",
            row.index, row.due_date, row.amount, row.remaining_principal_after
        );
    }
    println!("total scheduled: ${}", schedule.total_scheduled());

    // two payments come in, the second one short
    for (amount, days_ahead) in [(installment, 29), (Money::from_major(4_000), 31)] {
        controller.advance(Duration::days(days_ahead));
        ledger.register_payment(
            NewPayment {
                sale_id: sale.id,
                amount,
                date: time.now().date_naive(),
            },
            &time,
        )?;
    }

    // the contract page reconciles payments against the plan
    let detail = ledger.contract_detail(sale.id, &time)?;
    println!("\nreconciled as of {}:", detail.credit.as_of);
    for row in &detail.schedule {
        println!(
            "  #{} due {}  ${:>9} scheduled  ${:>9} applied  {:?}",
            row.index, row.due_date, row.scheduled_amount, row.applied_amount, row.status
        );
    }
    println!("\ncredit status: {:?}", detail.credit.status);
    println!("overdue: ${}", detail.credit.overdue_amount);

    Ok(())
}
