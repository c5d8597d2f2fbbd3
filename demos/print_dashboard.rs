use chrono::Local;
use closer_dashboard::{
    DashboardConfig, DashboardError, DashboardService, DatePreset, Selection, Session,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = DashboardConfig::from_env()?;
    let service = DashboardService::new(&config)?;

    let mut session = Session::new();
    service.gate().submit(&mut session, &config.access_secret);

    let closers = service.closer_options(&session).await?;
    println!("Closers: {}", closers.join(", "));

    let today = Local::now().date_naive();
    let selection = Selection::new(DatePreset::EsteMes.resolve(today, None), "Todos");

    let report = match service.render(&session, &selection).await {
        Ok(report) => report,
        Err(DashboardError::NoSalesData(message)) => {
            println!("{}", message);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", report.caption);
    for card in report.cards.iter().chain(&report.breakdown_cards) {
        match &card.delta {
            Some(delta) => println!("{:>16}: {} ({})", card.label, card.value, delta.text),
            None => println!("{:>16}: {}", card.label, card.value),
        }
    }

    println!("\n🏆 Ranking Closers");
    for row in &report.ranking {
        println!(
            "{:<20} ${:>10.0} {:>4} asist. {:>4} ventas {:>6.1}%",
            row.closer, row.facturado, row.asistencias, row.ventas, row.pct_cierre
        );
    }

    Ok(())
}
