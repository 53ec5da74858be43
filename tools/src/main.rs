//! cashflow-runner: headless dataset generator.
//!
//! Usage:
//!   cashflow-runner --industry retail --seed 12345 --days 180 --horizon 90
//!   cashflow-runner --industry saas --end 2024-06-30 --json out.json
//!   cashflow-runner --profiles profiles.json --industry manufacturing
//!   cashflow-runner --dump-profiles

use anyhow::{Context, Result};
use cashflow_core::{
    engine::DEFAULT_HISTORY_DAYS,
    forecast::DEFAULT_HORIZON,
    get_category_breakdown, get_top_entities, DatasetEngine, DateWindow, EntityType, FlowType,
    ForecastDataset, HistoricalDataset, IndustryCatalog, RngBank,
};
use chrono::NaiveDate;
use std::env;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RunOutput<'a> {
    seed: u64,
    historical: &'a HistoricalDataset,
    forecast: &'a ForecastDataset,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let industry = flag_value(&args, "--industry").unwrap_or("manufacturing");
    let days = parse_arg(&args, "--days", DEFAULT_HISTORY_DAYS);
    let horizon = parse_arg(&args, "--horizon", DEFAULT_HORIZON);
    let json_out = flag_value(&args, "--json");

    let catalog = match flag_value(&args, "--profiles") {
        Some(path) => IndustryCatalog::load(path).with_context(|| format!("loading profiles from {path}"))?,
        None => IndustryCatalog::builtin(),
    };

    if args.iter().any(|a| a == "--dump-profiles") {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    let bank = match flag_value(&args, "--seed") {
        Some(raw) => RngBank::new(raw.parse::<u64>().with_context(|| format!("bad --seed {raw}"))?),
        None => RngBank::from_entropy(),
    };
    let window = match flag_value(&args, "--end") {
        Some(raw) => {
            let end = NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("bad --end {raw}"))?;
            DateWindow::ending(end, days)?
        }
        None => DateWindow::ending(chrono::Local::now().date_naive(), days)?,
    };

    let engine = DatasetEngine::new(catalog, bank);
    let historical = engine.historical(industry, window);
    let forecast = engine.forecast(&historical, horizon)?;

    match json_out {
        Some(path) => {
            let output = RunOutput {
                seed: engine.master_seed(),
                historical: &historical,
                forecast: &forecast,
            };
            std::fs::write(path, serde_json::to_string_pretty(&output)?)
                .with_context(|| format!("writing {path}"))?;
            log::info!("datasets written to {path}");
        }
        None => print_summary(engine.master_seed(), &historical, &forecast),
    }

    Ok(())
}

fn print_summary(seed: u64, historical: &HistoricalDataset, forecast: &ForecastDataset) {
    println!("=== RUN SUMMARY ===");
    println!("  seed:           {seed}");
    println!("  industry:       {}", historical.industry);
    println!("  history:        {} .. {}", historical.start_date, historical.end_date);
    println!("  transactions:   {}", historical.transactions.len());
    println!("  receivables:    {}", historical.receivables.len());
    println!("  opening cash:   ${:.2}", historical.starting_balance);
    println!("  closing cash:   ${:.2}", historical.ending_balance);
    println!(
        "  dso / dpo / ccc: {} / {} / {}",
        historical.kpis.dso, historical.kpis.dpo, historical.kpis.cash_conversion_cycle
    );

    println!();
    println!("=== FORECAST ({} .. {}) ===", forecast.start_date, forecast.end_date);
    for m in &forecast.monthly_forecasts {
        println!(
            "  {} | In: ${:.0} | Out: ${:.0} | Balance: ${:.0} | Confidence: {}% ({} days)",
            m.month, m.inflows, m.outflows, m.balance, m.confidence, m.days
        );
    }
    println!(
        "  burn rate: ${}/day | revenue growth: {:.1}%",
        forecast.kpis.burn_rate, forecast.kpis.revenue_growth
    );

    println!();
    println!("=== TOP CUSTOMERS ===");
    for e in get_top_entities(historical, EntityType::Customer, 5) {
        let tier = e.tier.map(|t| format!(" [{t:?}]")).unwrap_or_default();
        println!("  {:<40} ${:.2}{tier}", e.name, e.total);
    }
    println!("=== TOP VENDORS ===");
    for e in get_top_entities(historical, EntityType::Vendor, 5) {
        let importance = e.importance.map(|i| format!(" [{i:?}]")).unwrap_or_default();
        println!("  {:<40} ${:.2}{importance}", e.name, e.total);
    }

    println!();
    println!("=== OUTFLOWS BY CATEGORY ===");
    for c in get_category_breakdown(historical, FlowType::Outflow) {
        println!("  {:<24} ${:.2}", c.name, c.total);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
