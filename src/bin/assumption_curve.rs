//! Generate a what-if J-curve from command-line assumptions

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use pm_forecast::studio::{
    recompute, AssumptionParams, DeploymentPacing, DistributionSpeed, JCurveDepth, MultipleEdit, StrategyAllocation,
    StudioEdit, StudioState, Timing,
};
use pm_forecast::Strategy;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "assumption_curve", version, about = "Annual J-curve from target multiples")]
struct Args {
    /// Strategy; sets the default term and multiples
    #[arg(long, default_value = "buyout")]
    strategy: String,

    #[arg(long, default_value_t = 100_000_000.0)]
    commitment: f64,

    #[arg(long, default_value_t = 2024)]
    vintage: i32,

    /// Override the strategy's investment period (years)
    #[arg(long)]
    investment_period: Option<u32>,

    /// Override the strategy's fund life (years)
    #[arg(long)]
    fund_life: Option<u32>,

    #[arg(long, default_value = "balanced")]
    pacing: String,

    #[arg(long, default_value = "moderate")]
    depth: String,

    #[arg(long, default_value = "base")]
    breakeven: String,

    #[arg(long, default_value = "base")]
    distribution_start: String,

    #[arg(long, default_value = "moderate")]
    distribution_speed: String,

    #[arg(long)]
    dpi: Option<f64>,

    #[arg(long)]
    rvpi: Option<f64>,

    /// Applied after DPI/RVPI; rescales them in proportion
    #[arg(long)]
    tvpi: Option<f64>,

    /// Strategy weights as strategy=pct pairs, e.g. buyout=60,venture=40
    #[arg(long, value_delimiter = ',')]
    allocation: Vec<String>,

    /// Include benchmark quartile IRR bands
    #[arg(long)]
    benchmarks: bool,

    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let strategy = Strategy::from_name(&args.strategy);
    let mut edits = vec![
        StudioEdit::SetPacing(DeploymentPacing::from_name(&args.pacing)),
        StudioEdit::SetDepth(JCurveDepth::from_name(&args.depth)),
        StudioEdit::SetBreakeven(Timing::from_name(&args.breakeven)),
        StudioEdit::SetDistributionStart(Timing::from_name(&args.distribution_start)),
        StudioEdit::SetDistributionSpeed(DistributionSpeed::from_name(&args.distribution_speed)),
        StudioEdit::ShowBenchmarks(args.benchmarks),
    ];
    edits.extend(args.investment_period.map(StudioEdit::SetInvestmentPeriod));
    edits.extend(args.fund_life.map(StudioEdit::SetFundLife));
    edits.extend(args.dpi.map(|v| StudioEdit::SetMultiple(MultipleEdit::Dpi(v))));
    edits.extend(args.rvpi.map(|v| StudioEdit::SetMultiple(MultipleEdit::Rvpi(v))));
    edits.extend(args.tvpi.map(|v| StudioEdit::SetMultiple(MultipleEdit::Tvpi(v))));
    if !args.allocation.is_empty() {
        edits.push(StudioEdit::SetAllocation(parse_allocation(&args.allocation)?));
    }

    let initial = StudioState::new(AssumptionParams::for_strategy(strategy, args.commitment, args.vintage));
    let state = edits.into_iter().fold(initial, |state, edit| recompute(&state, edit));

    for warning in &state.warnings {
        eprintln!("warning: {}", warning);
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state.curve)?),
        OutputFormat::Table => print_table(&state),
    }
    Ok(())
}

fn parse_allocation(pairs: &[String]) -> Result<StrategyAllocation> {
    let weights = pairs
        .iter()
        .map(|pair| {
            let (name, pct) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("allocation entry '{}' is not strategy=pct", pair))?;
            let pct: f64 = pct
                .trim()
                .parse()
                .with_context(|| format!("allocation percent in '{}'", pair))?;
            Ok((Strategy::from_name(name), pct))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(StrategyAllocation::new(&weights))
}

fn print_table(state: &StudioState) {
    let params = &state.params;
    let (tvpi, dpi, rvpi) = params.targets.display();
    println!(
        "{} | ${:.0} | {}y life, {}y investment | targets TVPI {} DPI {} RVPI {}",
        params.strategy.as_str(),
        params.commitment,
        params.fund_life,
        params.investment_period,
        tvpi,
        dpi,
        rvpi
    );
    println!();
    println!(
        "{:>8} {:>14} {:>14} {:>14} {:>14} {:>8}",
        "Year", "Calls", "Dists", "NAV", "Cumulative", "IRR"
    );
    println!("{}", "-".repeat(78));
    for row in &state.curve.series {
        println!(
            "{:>8} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>7.1}%",
            row.label,
            row.capital_call,
            row.distribution,
            row.nav,
            row.cumulative_net,
            row.irr.unwrap_or(0.0) * 100.0
        );
    }

    let summary = &state.curve.summary;
    println!("\nSummary:");
    println!("  Paid-in:        ${:.0}", summary.total_capital_called);
    println!("  Distributions:  ${:.0}", summary.total_distributions);
    println!("  Ending NAV:     ${:.0}", summary.ending_nav);
    println!("  TVPI / DPI / RVPI: {:.2}x / {:.2}x / {:.2}x", summary.tvpi, summary.dpi, summary.rvpi);
    println!("  ITD IRR proxy:  {:.1}%", summary.itd_irr * 100.0);
    if let Some(irr) = summary.cashflow_irr {
        println!("  Cashflow IRR:   {:.1}%", irr * 100.0);
    }
    println!("  Peak outflow:   ${:.0} ({})", summary.peak_outflow.value, summary.peak_outflow.label);
    match summary.breakeven_index {
        Some(year) => println!("  Breakeven:      Year {}", year),
        None => println!("  Breakeven:      not reached"),
    }

    let split = state.normalized_allocation.commitments(params.commitment);
    if !split.is_empty() {
        println!("\nAllocation:");
        for (strategy, commitment) in split {
            println!("  {:<15} ${:.0}", strategy.as_str(), commitment);
        }
    }
}
