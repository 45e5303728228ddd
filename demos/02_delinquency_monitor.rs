/// delinquency monitor - the owner's dashboard and the collections worklist
use lot_ledger_rs::{
    Ledger, MemoryRepository, Money, NewAgent, NewClient, NewParcel, NewPayment, NewSale,
    SafeTimeProvider, TimeSource,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== delinquency monitor example ===\n");

    // business date: 2024-06-15
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap(),
    ));

    let mut ledger = Ledger::new(MemoryRepository::new());
    let agent = ledger.create_agent(NewAgent {
        name: "Ana Souza".to_string(),
        phone: Some("+55 11 98888-0001".to_string()),
    })?;

    // three contracts in different shape: paying, slipping, abandoned
    let buyers = [
        ("Marcos Lima", "+55 11 97777-0001", (2024, 2, 10), 4u32),
        ("Paula Reis", "+55 11 97777-0002", (2024, 2, 10), 1u32),
        ("Jorge Nunes", "+55 11 97777-0003", (2023, 6, 10), 0u32),
    ];

    for (lot, (name, phone, (y, m, d), months_paid)) in buyers.into_iter().enumerate() {
        let contract_date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let parcel = ledger.create_parcel(NewParcel {
            block: "1".to_string(),
            lot: (lot + 1).to_string(),
            area_sqm: dec!(250),
            list_price: Money::from_major(120_000),
        })?;
        let client = ledger.create_client(NewClient {
            name: name.to_string(),
            phone: Some(phone.to_string()),
            email: Some(format!(
                "{}@example.com",
                name.split(' ').next().unwrap().to_lowercase()
            )),
            address: None,
            notes: None,
        })?;

        let sale = ledger.register_sale(
            NewSale {
                parcel_id: parcel.id,
                client_id: client.id,
                agent_id: Some(agent.id),
                contract_date,
                agreed_price: Money::from_major(120_000),
                down_payment: Money::from_major(20_000),
                term_months: 10,
                installment_amount: Money::from_major(10_000),
                total_commission: Some(Money::from_major(6_000)),
            },
            &time,
        )?;

        // installments fall due on the 10th; pay the first `months_paid` of them
        for month in 0..months_paid {
            ledger.register_payment(
                NewPayment {
                    sale_id: sale.id,
                    amount: Money::from_major(10_000),
                    date: contract_date
                        .checked_add_months(chrono::Months::new(month + 1))
                        .unwrap(),
                },
                &time,
            )?;
        }
    }

    // the owner's dashboard
    let summary = ledger.portfolio_summary(&time)?;
    let totals = &summary.totals;
    println!("portfolio as of {}:", totals.as_of);
    println!(
        "  contracts:  {} ({} current, {} delinquent)",
        totals.contracts, totals.current, totals.delinquent
    );
    println!("  face value: ${}", totals.portfolio_face_value);
    println!("  collected:  ${}", totals.collected);
    println!("  outstanding: ${}", totals.outstanding);
    println!("  overdue:    ${}", totals.overdue);
    println!("  expected monthly inflow: ${}", totals.expected_monthly_inflow);

    println!("\ncommissions owed:");
    for line in &summary.commissions {
        println!(
            "  {}: ${} over {} contracts",
            line.agent_name, line.commission, line.contracts
        );
    }

    // who to call, worst first
    let worklist = ledger.collections(&time)?;
    println!("\ncollections worklist ({} overdue in total):", worklist.total_overdue);
    for row in &worklist.rows {
        let phone = row
            .contact_channels
            .first()
            .map(|c| c.value.as_str())
            .unwrap_or("no contact");
        println!(
            "  {} {} ({}) - ${} overdue, {} days past due, {:?}",
            row.parcel_display,
            row.client_name,
            phone,
            row.credit.overdue_amount,
            row.credit.days_past_due,
            row.band
        );
    }

    Ok(())
}
