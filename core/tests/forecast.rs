use cashflow_core::{
    forecast::DEFAULT_HORIZON, DatasetEngine, DateWindow, FlowType, ForecastDataset, HistoricalDataset, SimError,
};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn run(seed: u64, industry: &str, history_end: NaiveDate, history_days: u32, horizon: u32) -> (HistoricalDataset, ForecastDataset) {
    let engine = DatasetEngine::seeded(seed);
    let window = DateWindow::ending(history_end, history_days).expect("valid window");
    let hist = engine.historical(industry, window);
    let forecast = engine.forecast(&hist, horizon).expect("forecast");
    (hist, forecast)
}

#[test]
fn forecast_continues_from_history() {
    let (hist, fc) = run(31, "saas", d(2024, 3, 31), 180, DEFAULT_HORIZON);
    assert_eq!(fc.start_date, d(2024, 4, 1));
    assert_eq!(fc.daily_forecasts.len(), DEFAULT_HORIZON as usize);
    assert_eq!(fc.starting_balance, hist.ending_balance);
    let first = &fc.daily_forecasts[0].record;
    assert!((first.opening_balance() - hist.ending_balance).abs() < 1e-6);

    let mut previous = fc.starting_balance;
    for day in &fc.daily_forecasts {
        let expected = previous + day.record.inflows - day.record.outflows;
        assert!((day.record.balance - expected).abs() < 1e-6);
        previous = day.record.balance;
    }
    assert_eq!(fc.business_partners, hist.business_partners);
    assert_eq!(fc.industry, hist.industry);
}

#[test]
fn confidence_decays_within_bounds() {
    let (_, fc) = run(2, "manufacturing", d(2024, 6, 30), 120, 90);
    assert_eq!(fc.daily_forecasts[0].confidence, 95);
    for day in &fc.daily_forecasts {
        assert!((50..=95).contains(&day.confidence));
    }
    for pair in fc.daily_forecasts.windows(2) {
        assert!(pair[1].confidence <= pair[0].confidence);
    }
    assert!(fc.daily_forecasts.last().unwrap().confidence < 60);
}

#[test]
fn retail_ninety_day_history_thirty_day_forecast() {
    for (seed, end) in [(1, d(2024, 3, 15)), (2, d(2024, 1, 31)), (3, d(2024, 6, 1)), (4, d(2024, 2, 29))] {
        let (hist, fc) = run(seed, "retail", end, 90, 30);
        assert_eq!(hist.daily_data.len(), 90);
        assert_eq!(fc.daily_forecasts.len(), 30);
        assert!(
            (1..=2).contains(&fc.monthly_forecasts.len()),
            "end {end}: {} months",
            fc.monthly_forecasts.len()
        );
        for kpi in [fc.kpis.dso, fc.kpis.dpo] {
            assert!((0.0..=120.0).contains(&kpi), "kpi {kpi}");
        }
        assert!(fc.kpis.burn_rate >= 0.0);
    }
}

#[test]
fn monthly_rollup_matches_daily_records() {
    let (_, fc) = run(9, "retail", d(2024, 3, 31), 90, 90);
    let months: Vec<&str> = fc.monthly_forecasts.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-04", "2024-05", "2024-06"]);
    let april: Vec<_> = fc
        .daily_forecasts
        .iter()
        .filter(|f| f.record.date.format("%Y-%m").to_string() == "2024-04")
        .collect();
    let inflows: f64 = april.iter().map(|f| f.record.inflows).sum();
    assert!((fc.monthly_forecasts[0].inflows - inflows).abs() < 1e-6);
    assert_eq!(fc.monthly_forecasts[0].days, 30);
    assert_eq!(fc.monthly_forecasts[0].balance, april.last().unwrap().record.balance);
    let burn = (fc.monthly_forecasts[0].outflows / 30.0).round();
    assert_eq!(fc.kpis.burn_rate, burn);
}

#[test]
fn receivables_settle_inside_the_forecast() {
    let (hist, fc) = run(40, "manufacturing", d(2024, 5, 31), 180, 90);
    let carried: Vec<_> = hist
        .receivables
        .iter()
        .filter(|r| r.date <= fc.end_date)
        .collect();
    assert!(!carried.is_empty());
    for r in carried {
        assert!(fc.transactions.iter().any(|t| t.id == r.id), "receivable {} missing", r.id);
    }
    assert!(fc
        .transactions
        .iter()
        .all(|t| t.date >= fc.start_date && t.date <= fc.end_date));
}

#[test]
fn kpis_are_inherited_from_history() {
    let (hist, fc) = run(6, "saas", d(2024, 9, 30), 180, 60);
    assert_eq!(fc.kpis.dso, hist.kpis.dso);
    assert_eq!(fc.kpis.dpo, hist.kpis.dpo);
    assert_eq!(fc.kpis.cash_conversion_cycle, hist.kpis.cash_conversion_cycle);
}

#[test]
fn zero_horizon_is_an_error() {
    let engine = DatasetEngine::seeded(1);
    let window = DateWindow::ending(d(2024, 1, 31), 30).unwrap();
    let hist = engine.historical("retail", window);
    assert!(matches!(engine.forecast(&hist, 0), Err(SimError::InvalidHorizon(0))));
}

#[test]
fn empty_roster_is_regenerated() {
    let engine = DatasetEngine::seeded(3);
    let window = DateWindow::ending(d(2024, 1, 31), 30).unwrap();
    let mut hist = engine.historical("saas", window);
    hist.business_partners = Default::default();
    let fc = engine.forecast(&hist, 30).expect("forecast");
    assert!(!fc.business_partners.customers.is_empty());
    assert!(!fc.business_partners.vendors.is_empty());
}

#[test]
fn missing_customers_are_regenerated_alone() {
    let engine = DatasetEngine::seeded(0);
    let window = DateWindow::ending(d(2024, 6, 30), 90).unwrap();
    let mut hist = engine.historical("retail", window);
    hist.business_partners.customers.clear();
    let fc = engine.forecast(&hist, 90).expect("forecast");

    assert!(!fc.business_partners.customers.is_empty());
    assert_eq!(fc.business_partners.vendors, hist.business_partners.vendors);

    let inflows: Vec<_> = fc.transactions.iter().filter(|t| t.kind == FlowType::Inflow).collect();
    assert!(!inflows.is_empty());
    assert!(inflows
        .iter()
        .any(|t| fc.business_partners.customer_named(&t.entity).is_some()));
    let walk_in = inflows.iter().filter(|t| t.entity == "Walk-in Customer").count();
    assert!(walk_in < inflows.len() / 2, "{walk_in} of {} inflows are walk-in", inflows.len());
}

#[test]
fn missing_vendors_are_regenerated_alone() {
    let engine = DatasetEngine::seeded(5);
    let window = DateWindow::ending(d(2024, 6, 30), 90).unwrap();
    let mut hist = engine.historical("manufacturing", window);
    hist.business_partners.vendors.clear();
    let fc = engine.forecast(&hist, 30).expect("forecast");

    assert!(!fc.business_partners.vendors.is_empty());
    assert_eq!(fc.business_partners.customers, hist.business_partners.customers);
}
