// src/aggregate.rs
//
// The recompute engine. Every function here is a pure value-in/value-out
// transformation: no I/O, no stored state, and every division is guarded
// so degenerate inputs (zero orders, zero visits) produce zeros instead
// of NaN.

use crate::error::IngestError;
use crate::report::{BranchRecord, ChannelRecord, SalesReport, WebsiteRecord};
use tracing::warn;

/// Report-wide rollup across all branches plus the website.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportTotals {
    pub total_sales: f64,
    pub total_orders: u64,
}

fn per_order(sales: f64, orders: u64) -> f64 {
    if orders > 0 { sales / orders as f64 } else { 0.0 }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

/// Derive a channel's average order value from its leaf fields.
pub fn recompute_channel(mut channel: ChannelRecord) -> ChannelRecord {
    channel.avg_order_value = per_order(channel.sales, channel.orders);
    channel
}

/// Recompute a branch bottom-up: every channel first, then the branch
/// totals and average derived from the channel sums. Decoded order
/// counts are untrusted and can sit at `u64::MAX`, so count sums clamp
/// instead of wrapping.
pub fn recompute_branch(mut branch: BranchRecord) -> BranchRecord {
    branch.channels = branch.channels.into_iter().map(recompute_channel).collect();
    branch.total_sales = branch.channels.iter().map(|c| c.sales).sum();
    branch.total_orders = branch
        .channels
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.orders));
    branch.avg_order_value = per_order(branch.total_sales, branch.total_orders);
    branch
}

/// Derive the website's rates and average from its leaf fields. Only the
/// leaf fields of the input are read, so applying this to its own output
/// changes nothing.
pub fn recompute_website(mut web: WebsiteRecord) -> WebsiteRecord {
    web.conversion_rate = percent(web.total_orders, web.visits);
    web.cancellation_rate = percent(web.cancelled_orders, web.total_orders);
    web.avg_order_value = per_order(web.total_sales, web.total_orders);
    web
}

/// Replace one channel of a branch and bring the branch back into a
/// consistent state. Fails when `index` does not name an existing channel
/// slot; that is a caller bug and nothing is partially recomputed.
pub fn recompute_channel_edit(
    branch: BranchRecord,
    index: usize,
    updated: ChannelRecord,
) -> Result<BranchRecord, IngestError> {
    let len = branch.channels.len();
    if index >= len {
        return Err(IngestError::ChannelIndex { index, len });
    }

    let mut branch = branch;
    branch.channels[index] = updated;
    Ok(recompute_branch(branch))
}

/// Full validation pass over a candidate report, run on every round-trip
/// (ingest, load, save). The completed/cancelled vs. total relationship on
/// the website is a convention, not an invariant — violations are logged,
/// never rejected.
pub fn recompute_report(report: SalesReport) -> SalesReport {
    let branches = report.branches.into_iter().map(recompute_branch).collect();
    let website = recompute_website(report.website);

    let settled = website
        .completed_orders
        .saturating_add(website.cancelled_orders);
    if settled > website.total_orders {
        warn!(
            completed = website.completed_orders,
            cancelled = website.cancelled_orders,
            total = website.total_orders,
            "website order counts exceed total orders"
        );
    }

    SalesReport { branches, website }
}

/// Sum sales and orders over every branch and the website. Pure sum, no
/// caching; callers round at display time.
pub fn aggregate_totals(report: &SalesReport) -> ReportTotals {
    let branch_sales: f64 = report.branches.iter().map(|b| b.total_sales).sum();
    let branch_orders = report
        .branches
        .iter()
        .fold(0u64, |acc, b| acc.saturating_add(b.total_orders));
    ReportTotals {
        total_sales: branch_sales + report.website.total_sales,
        total_orders: branch_orders.saturating_add(report.website.total_orders),
    }
}

/// Sales per channel label summed across all branches, in order of first
/// occurrence. Channel counts are tiny, so a linear scan beats a map.
pub fn channel_distribution(report: &SalesReport) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for branch in &report.branches {
        for channel in &branch.channels {
            let label = channel.name.label();
            match totals.iter_mut().find(|(name, _)| name == label) {
                Some((_, sum)) => *sum += channel.sales,
                None => totals.push((label.to_string(), channel.sales)),
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ChannelKind;

    fn test_branch() -> BranchRecord {
        recompute_branch(BranchRecord {
            name: "Maadi".to_string(),
            localized_name: "المعادي".to_string(),
            channels: vec![
                ChannelRecord::from_leaf(ChannelKind::CallCentre, 100.0, 4),
                ChannelRecord::from_leaf(ChannelKind::Insta, 50.0, 2),
            ],
            total_sales: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
        })
    }

    #[test]
    fn test_channel_edit_updates_branch_totals() {
        let updated = ChannelRecord {
            name: ChannelKind::Insta,
            sales: 150.0,
            orders: 6,
            avg_order_value: 999.0, // stale on purpose, must be recomputed
            cancelled_orders: 0,
            cancelled_value: 0.0,
        };
        let branch = recompute_channel_edit(test_branch(), 1, updated).unwrap();

        assert_eq!(branch.channels[1].avg_order_value, 25.0);
        assert_eq!(branch.total_sales, 250.0);
        assert_eq!(branch.total_orders, 10);
        assert_eq!(branch.avg_order_value, 25.0);
    }

    #[test]
    fn test_channel_edit_zero_orders_with_sales() {
        let updated = ChannelRecord {
            name: ChannelKind::CallCentre,
            sales: 100.0,
            orders: 0,
            avg_order_value: 0.0,
            cancelled_orders: 0,
            cancelled_value: 0.0,
        };
        let branch = recompute_channel_edit(test_branch(), 0, updated).unwrap();

        assert_eq!(branch.channels[0].avg_order_value, 0.0);
        assert_eq!(branch.total_orders, 2);
        assert_eq!(branch.total_sales, 150.0);
    }

    #[test]
    fn test_channel_edit_index_out_of_range() {
        let branch = test_branch();
        let channel = branch.channels[0].clone();
        let err = recompute_channel_edit(branch, 2, channel).unwrap_err();
        assert!(matches!(err, IngestError::ChannelIndex { index: 2, len: 2 }));
    }

    #[test]
    fn test_website_recompute_is_idempotent() {
        let web = recompute_website(WebsiteRecord {
            visits: 2000,
            total_sales: 900.0,
            total_orders: 30,
            completed_orders: 25,
            cancelled_orders: 5,
            cancelled_value: 120.0,
            conversion_rate: 0.0,
            cancellation_rate: 0.0,
            avg_order_value: 0.0,
        });

        assert_eq!(web.conversion_rate, 1.5);
        assert_eq!(web.cancellation_rate, 5.0 / 30.0 * 100.0);
        assert_eq!(web.avg_order_value, 30.0);
        assert_eq!(recompute_website(web.clone()), web);
    }

    #[test]
    fn test_website_zero_denominators() {
        let web = recompute_website(WebsiteRecord {
            visits: 0,
            total_sales: 500.0,
            total_orders: 0,
            completed_orders: 0,
            cancelled_orders: 0,
            cancelled_value: 0.0,
            conversion_rate: 9.0,
            cancellation_rate: 9.0,
            avg_order_value: 9.0,
        });

        assert_eq!(web.conversion_rate, 0.0);
        assert_eq!(web.cancellation_rate, 0.0);
        assert_eq!(web.avg_order_value, 0.0);
    }

    #[test]
    fn test_aggregate_totals_include_website() {
        let report = SalesReport::default_dataset();
        let totals = aggregate_totals(&report);

        let expected_sales: f64 = report
            .branches
            .iter()
            .map(|b| b.total_sales)
            .sum::<f64>()
            + report.website.total_sales;
        assert_eq!(totals.total_sales, expected_sales);
        assert_eq!(totals.total_orders, 1429 + 2163 + 1628 + 3104 + 206);
    }

    #[test]
    fn test_channel_distribution_order_and_sums() {
        let report = SalesReport::default_dataset();
        let dist = channel_distribution(&report);

        assert_eq!(dist.len(), 3);
        assert_eq!(dist[0].0, "Call Centre");
        assert_eq!(dist[1].0, "Insta");
        assert_eq!(dist[2].0, "Talabat");
        assert_eq!(dist[0].1, 139322.55 + 226896.76 + 173787.06 + 221016.15);
    }

    #[test]
    fn test_order_sums_clamp_at_u64_max() {
        let branch = recompute_branch(BranchRecord {
            name: "Maadi".to_string(),
            localized_name: "المعادي".to_string(),
            channels: vec![
                ChannelRecord::from_leaf(ChannelKind::CallCentre, 1.0, u64::MAX),
                ChannelRecord::from_leaf(ChannelKind::Insta, 1.0, u64::MAX),
            ],
            total_sales: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
        });
        assert_eq!(branch.total_orders, u64::MAX);
        assert_eq!(branch.avg_order_value, 2.0 / u64::MAX as f64);

        let mut report = SalesReport::default_dataset();
        report.branches.push(branch);
        report.website.total_orders = u64::MAX;
        let totals = aggregate_totals(&report);
        assert_eq!(totals.total_orders, u64::MAX);
    }

    #[test]
    fn test_report_recompute_handles_extreme_website_counts() {
        let mut report = SalesReport::default_dataset();
        report.website.completed_orders = u64::MAX;
        report.website.cancelled_orders = u64::MAX;

        // The convention check must clamp, not overflow
        let repaired = recompute_report(report);
        assert_eq!(repaired.website.completed_orders, u64::MAX);
        assert_eq!(repaired.website.cancelled_orders, u64::MAX);
    }

    #[test]
    fn test_report_recompute_repairs_stale_derived_fields() {
        let mut report = SalesReport::default_dataset();
        report.branches[0].total_sales = -1.0;
        report.branches[0].channels[0].avg_order_value = -1.0;
        report.website.conversion_rate = -1.0;

        let repaired = recompute_report(report);
        assert_eq!(repaired, SalesReport::default_dataset());
    }
}
