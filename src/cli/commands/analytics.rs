//! `analytics` command: usage, status breakdown and trends for a range

use super::{report_failure, CommandContext};
use crate::core::analytics::{aggregate, compute_buckets, AggregateResult, DateRange, OverviewStats};
use crate::domain::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;

/// Arguments for the analytics command
#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// last7days, last30days, last3months or last6months (defaults to analytics.default_range)
    #[arg(short, long)]
    pub range: Option<DateRange>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsOutput<'a> {
    overview: OverviewStats,
    #[serde(flatten)]
    result: &'a AggregateResult,
}

impl AnalyticsArgs {
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(0),
            Err(e) => Ok(report_failure(&e)),
        }
    }

    async fn run(&self, config_path: &str) -> Result<()> {
        let ctx = CommandContext::load(config_path)?;
        let range = self.range.unwrap_or(ctx.config.analytics.default_range);
        let (_, records) = ctx.fetch_records().await?;

        let window = compute_buckets(Utc::now(), range);
        let result = aggregate(&records, &window)?;
        let overview = OverviewStats::from_aggregate(&result);

        if self.json {
            let output = AnalyticsOutput {
                overview,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("📊 Analytics: {}", range.title());
        println!(
            "   {} to {}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        );
        println!();
        println!("  Total validations: {}", overview.total_validations);
        println!("  Accuracy rate:     {:.1}%", overview.accuracy_rate);
        println!("  Pending reviews:   {}", overview.pending_reviews);
        println!();

        println!("Code system usage:");
        for usage in &result.code_usage {
            println!("  {:<8} {:>6}", usage.system.as_str(), usage.count);
        }
        println!();

        println!("Validation status:");
        for status in &result.status_breakdown {
            println!("  {:<8} {:>6}", status.status.as_str(), status.count);
        }
        println!();

        println!("Trends:");
        println!("  {:<8} {:>6} {:>8} {:>6}", "", "ICD-11", "NAMASTE", "Total");
        for point in &result.trends {
            println!(
                "  {:<8} {:>6} {:>8} {:>6}",
                point.label, point.icd11, point.namaste, point.total
            );
        }

        if result.unbucketed_records > 0 {
            println!();
            println!(
                "⚠️  {} record(s) in range fell outside every bucket",
                result.unbucketed_records
            );
        }
        Ok(())
    }
}
