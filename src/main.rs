//! Portfolio forecast CLI
//!
//! Projects the built-in sample portfolio under the base scenario and writes the
//! per-period series to CSV.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pm_forecast::{aggregate_portfolio, FundRegistry, ProjectionEngine, Scenario};

fn main() -> Result<()> {
    env_logger::init();

    println!("Private Markets Forecast v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================\n");

    let registry = FundRegistry::default_registry();
    let engine = ProjectionEngine::default();
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).context("invalid as-of date")?;

    println!("Funds:");
    for fund in registry.funds() {
        println!(
            "  {:>2} {:<30} {:<15} {} ${:>12.0}",
            fund.id,
            fund.name,
            fund.strategy.as_str(),
            fund.vintage,
            fund.commitment
        );
    }
    println!();

    let portfolio = aggregate_portfolio(&engine, &registry, &registry.ids(), Scenario::Base, as_of, None);

    println!(
        "{:>8} {:>2} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Period", "A", "Calls", "Dists", "NAV", "Net", "Liquidity"
    );
    println!("{}", "-".repeat(88));
    for (row, liquidity) in portfolio.records.iter().zip(&portfolio.liquidity) {
        println!(
            "{:>8} {:>2} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14}",
            row.label,
            if row.is_actual { "*" } else { "" },
            row.capital_call,
            row.distribution,
            row.nav,
            row.net_cashflow,
            liquidity
                .balance
                .map(|b| format!("{:.0}", b))
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    let csv_path = "portfolio_projection.csv";
    let mut file = BufWriter::new(File::create(csv_path).with_context(|| format!("creating {}", csv_path))?);
    writeln!(
        file,
        "Period,Date,IsActual,CapitalCall,Distribution,NAV,NetCashflow,CumulativeNet,LiquidityBalance,FundingGap"
    )?;
    for (row, liquidity) in portfolio.records.iter().zip(&portfolio.liquidity) {
        writeln!(
            file,
            "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{},{:.2}",
            row.label,
            row.date.map(|d| d.to_string()).unwrap_or_default(),
            row.is_actual,
            row.capital_call,
            row.distribution,
            row.nav,
            row.net_cashflow,
            row.cumulative_net,
            liquidity.balance.map(|b| format!("{:.2}", b)).unwrap_or_default(),
            liquidity.funding_gap,
        )?;
    }
    file.flush()?;
    println!("\nFull results written to: {}", csv_path);

    let summary = portfolio.summary();
    println!("\nSummary:");
    println!("  Funds:              {}", portfolio.fund_count());
    println!("  Total Commitment:   ${:.0}", portfolio.total_commitment);
    println!("  Paid-in:            ${:.0}", summary.total_capital_called);
    println!("  Distributions:      ${:.0}", summary.total_distributions);
    println!("  Ending NAV:         ${:.0}", summary.ending_nav);
    println!("  TVPI / DPI / RVPI:  {:.2}x / {:.2}x / {:.2}x", summary.tvpi, summary.dpi, summary.rvpi);
    println!("  Remaining Unfunded: ${:.0}", portfolio.remaining_unfunded);
    match portfolio.liquidity_runway() {
        Some(periods) => println!("  Liquidity Runway:   {} quarters", periods),
        None => println!("  Liquidity Runway:   no funding gap over the forecast"),
    }

    Ok(())
}
