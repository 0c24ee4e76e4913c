mod aggregate;
mod config;
mod decode;
mod error;
mod extract;
mod report;
mod report_store;

use config::Config;
use report::SalesReport;
use report_store::ReportStore;
use tracing::info;

const CONFIG_PATH: &str = ".config/dashboard.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter("info")
        .init();

    let cfg = Config::load_or_default(CONFIG_PATH)?;
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("ingest") => {
            let path = args
                .get(2)
                .ok_or("usage: sales_dashboard ingest <report.pdf>")?;
            ingest(&cfg, path)
        }
        Some("reset") => {
            let report = ReportStore::new(&cfg.db_path)?.reset()?;
            print_summary(&report);
            Ok(())
        }
        Some("show") | None => {
            let report = match ReportStore::new(&cfg.db_path)?.load()? {
                Some(report) => report,
                None => {
                    info!("No stored report — showing default dataset");
                    SalesReport::default_dataset()
                }
            };
            print_summary(&report);
            Ok(())
        }
        Some("set-channel") => {
            let usage = "usage: sales_dashboard set-channel <branch> <channel> <sales> <orders>";
            let branch_idx: usize = args.get(2).ok_or(usage)?.parse()?;
            let channel_idx: usize = args.get(3).ok_or(usage)?.parse()?;
            let sales: f64 = args.get(4).ok_or(usage)?.parse()?;
            let orders: u64 = args.get(5).ok_or(usage)?.parse()?;
            edit_channel(&cfg, branch_idx, channel_idx, sales, orders)
        }
        Some(other) => Err(format!(
            "unknown command '{other}' (expected ingest | show | set-channel | reset)"
        )
        .into()),
    }
}

/// Decode one report document and replace the stored report with it.
/// The store is only opened after a successful decode, so a failed
/// ingestion can never overwrite the previous report.
fn ingest(cfg: &Config, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path, schema_version = cfg.schema.version, "Ingesting report document");

    let bytes = std::fs::read(path)?;
    let text = extract::extract_text(&bytes)?;
    let report = decode::decode_report(&text, &cfg.schema)?;

    let store = ReportStore::new(&cfg.db_path)?;
    store.save(&report)?;

    info!(branches = report.branches.len(), "Report decoded and stored");
    print_summary(&report);
    Ok(())
}

/// Overwrite one channel's sales and orders figures and store the
/// re-aggregated report. Derived fields on the channel and the owning
/// branch come out of the recompute engine, never from the caller.
fn edit_channel(
    cfg: &Config,
    branch_idx: usize,
    channel_idx: usize,
    sales: f64,
    orders: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ReportStore::new(&cfg.db_path)?;
    let mut report = match store.load()? {
        Some(report) => report,
        None => SalesReport::default_dataset(),
    };

    let branch = report
        .branches
        .get(branch_idx)
        .ok_or_else(|| format!("no branch at index {branch_idx}"))?
        .clone();
    let mut updated = branch
        .channels
        .get(channel_idx)
        .cloned()
        .ok_or(error::IngestError::ChannelIndex {
            index: channel_idx,
            len: branch.channels.len(),
        })?;
    updated.sales = sales;
    updated.orders = orders;

    report.branches[branch_idx] = aggregate::recompute_channel_edit(branch, channel_idx, updated)?;
    store.save(&report)?;

    info!(branch = branch_idx, channel = channel_idx, "Channel figures updated");
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &SalesReport) {
    let totals = aggregate::aggregate_totals(report);
    let overall_avg = if totals.total_orders > 0 {
        totals.total_sales / totals.total_orders as f64
    } else {
        0.0
    };

    println!("--- Sales Report ---");
    println!(
        "Total sales: {:.2}  |  Total orders: {}  |  Avg order value: {:.2}",
        totals.total_sales, totals.total_orders, overall_avg
    );

    for branch in &report.branches {
        println!(
            "  {} ({}): sales {:.2}, orders {}, AOV {:.2}",
            branch.name,
            branch.localized_name,
            branch.total_sales,
            branch.total_orders,
            branch.avg_order_value
        );
    }

    let web = &report.website;
    println!(
        "  Website: visits {}, sales {:.2}, orders {}, conversion {:.2}%, cancellation {:.2}%",
        web.visits, web.total_sales, web.total_orders, web.conversion_rate, web.cancellation_rate
    );

    println!("Channel distribution:");
    for (name, sales) in aggregate::channel_distribution(report) {
        let share = if totals.total_sales > 0.0 {
            sales / totals.total_sales * 100.0
        } else {
            0.0
        };
        println!("  {name}: {sales:.2} ({share:.2}%)");
    }
}
