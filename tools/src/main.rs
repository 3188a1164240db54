//! bp-runner: headless dataset generator for the branch quality core.
//!
//! Usage:
//!   bp-runner --seed 12345
//!   bp-runner --config generator.json --json > dataset.json

use anyhow::Result;
use branchpulse_core::{config::GeneratorConfig, dataset::Dataset, metrics::DailyField};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_mode = args.iter().any(|a| a == "--json");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(std::path::Path::new(path))?,
        None => GeneratorConfig::default(),
    };
    // --seed overrides whatever the config file says.
    if let Some(seed) = args
        .windows(2)
        .find(|w| w[0] == "--seed")
        .and_then(|w| w[1].parse().ok())
    {
        config.seed = seed;
    }

    log::info!("generating dataset for seed {}", config.seed);
    let dataset = Dataset::generate(&config)?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
        return Ok(());
    }

    print_summary(&dataset);
    Ok(())
}

fn print_summary(dataset: &Dataset) {
    println!("branchpulse dataset summary");
    println!("  seed:     {}", dataset.config.seed);
    println!("  regions:  {}", dataset.bankwide.total_regions);
    println!("  areas:    {}", dataset.bankwide.total_areas);
    println!("  branches: {}", dataset.bankwide.total_branches);
    println!("  daily:    {} records", dataset.daily_metrics.len());
    println!("  monthly:  {} records", dataset.monthly_metrics.len());
    println!();

    println!("=== BANKWIDE ===");
    println!("  avg queue time:   {:.1} min", dataset.bankwide.avg_queue_time);
    println!("  avg SLA met:      {:.1}%", dataset.bankwide.avg_sla_met);
    println!(
        "  avg failure rate: {:.1}%",
        dataset.bankwide.avg_service_failure_rate
    );
    println!("  avg SES:          {:.2}", dataset.bankwide.avg_ses);
    println!("  avg NPS:          {}", dataset.bankwide.avg_nps);
    println!(
        "  improving/stagnant/declining: {}/{}/{}",
        dataset.bankwide.branches_improving,
        dataset.bankwide.branches_stagnant,
        dataset.bankwide.branches_declining,
    );
    println!();

    println!("=== REGIONS ===");
    for r in &dataset.region_summaries {
        println!(
            "  {} | {} areas, {} branches | queue {:.1} | SLA {:.1}% | SES {:.2} | NPS {}",
            r.region_name, r.area_count, r.branch_count, r.avg_queue_time, r.sla_met,
            r.ses_score, r.nps_score,
        );
    }
    println!();

    println!("=== TOP 5 AREAS BY SLA ===");
    for a in dataset.area_summaries.iter().take(5) {
        println!(
            "  #{} {} | SLA {:.1}% | queue {:.1} | {} declining",
            a.performance_rank, a.area_name, a.sla_met, a.avg_queue_time, a.branches_declining,
        );
    }
    println!();

    let ranking = dataset.branch_sqi_ranking();
    println!("=== WORST 10 BRANCHES BY SQI ===");
    for row in ranking.iter().rev().take(10) {
        println!(
            "  {} {} | SQI {} (decline {}%) | queue {:.1} | SLA {:.1}%",
            row.code, row.name, row.sqi, row.sqi_decline, row.queue_time, row.sla_met,
        );
    }
    println!();

    let week = dataset.period_comparison(DailyField::AvgQueueTime, &dataset.all_branch_ids(), 7);
    println!("=== WEEK-OVER-WEEK QUEUE TIME ===");
    println!(
        "  current {:.1} min | previous {:.1} min | change {:+.1} ({:+.1}%)",
        week.current, week.previous, week.change, week.change_percent,
    );
}
