use rust_decimal::Decimal;
use spending_report::{Ledger, ReportConfig, SpendingReporter, Subscription};

const SAMPLE: &str = "Date ,Who ,What ,Category ,Price \n\
    03/03/2024,Anna,Supermarket,Food,412.30\n\
    05/03/2024,Ben,Bakery,Food,38.50\n\
    09/03/2024,Anna,Train card,Transport,225\n\
    14/03/2024,Ben,Concert,Fun,180\n\
    02/04/2024,Ben,Supermarket,Food,390.10\n\
    11/04/2024,Anna,Pharmacy,Health,64.90\n\
    27/04/2024,Anna,Taxi,Transport,48\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pass a CSV path to report on your own ledger
    let ledger = match std::env::args().nth(1) {
        Some(path) => Ledger::from_csv_path(path)?,
        None => Ledger::from_csv_reader(SAMPLE.as_bytes())?,
    };

    let config = ReportConfig {
        price_apt: Decimal::from(5850),
        subscriptions: Some(vec![
            Subscription {
                what: "Streaming".to_string(),
                price: Decimal::new(4990, 2),
            },
            Subscription {
                what: "Gym".to_string(),
                price: Decimal::from(250),
            },
        ]),
        rent_split: 2,
    };

    let reporter = SpendingReporter::new(ledger, config)?;

    println!("{}", reporter.info_by_month(2024, "March", None)?);
    println!(
        "{}",
        reporter.info_by_range("01/03/2024", "15/04/2024", "March to mid April", None)?
    );
    println!("{}", reporter.annual_report(2024, None)?);

    Ok(())
}
