// src/report.rs

use serde::Deserialize;
use serde::Serialize;

/// The fixed set of in-branch sales channels. `Website` is not a branch
/// channel; it gets its own record on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    #[serde(rename = "Call Centre")]
    CallCentre,
    Insta,
    Talabat,
}

impl ChannelKind {
    /// Display label, also the serialized name.
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::CallCentre => "Call Centre",
            ChannelKind::Insta => "Insta",
            ChannelKind::Talabat => "Talabat",
        }
    }
}

/// One sales channel within one branch.
///
/// `avg_order_value` is derived and never set directly; every constructor
/// and edit path goes through the recompute functions in `aggregate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub name: ChannelKind,
    pub sales: f64,
    pub orders: u64,
    pub avg_order_value: f64,
    #[serde(default)]
    pub cancelled_orders: u64,
    #[serde(default)]
    pub cancelled_value: f64,
}

impl ChannelRecord {
    /// Build a channel from its independent leaf values, deriving the
    /// average order value.
    pub fn from_leaf(name: ChannelKind, sales: f64, orders: u64) -> Self {
        ChannelRecord {
            name,
            sales,
            orders,
            avg_order_value: if orders > 0 { sales / orders as f64 } else { 0.0 },
            cancelled_orders: 0,
            cancelled_value: 0.0,
        }
    }
}

/// One physical or virtual sales location. Totals and the average are
/// derived from `channels`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    pub name: String,
    pub localized_name: String,
    pub channels: Vec<ChannelRecord>,
    pub total_sales: f64,
    pub total_orders: u64,
    pub avg_order_value: f64,
}

/// The online storefront. Structurally parallel to a branch but tracks
/// visits and cancellations, with three derived rates/averages.
///
/// `conversion_rate` and `cancellation_rate` are percentages on a 0–100
/// scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRecord {
    pub visits: u64,
    pub total_sales: f64,
    pub total_orders: u64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
    pub cancelled_value: f64,
    pub conversion_rate: f64,
    pub cancellation_rate: f64,
    pub avg_order_value: f64,
}

/// Aggregate root handed to the store and the presentation layer. Any
/// instance that leaves this crate satisfies the derived-field invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub branches: Vec<BranchRecord>,
    pub website: WebsiteRecord,
}

impl SalesReport {
    /// The fixed dataset the dashboard starts from (and resets to).
    ///
    /// Only leaf values are listed here; derived fields are recomputed so
    /// the defaults satisfy the invariants exactly.
    pub fn default_dataset() -> SalesReport {
        let branch = |name: &str, localized: &str, leaves: [(f64, u64); 3]| BranchRecord {
            name: name.to_string(),
            localized_name: localized.to_string(),
            channels: vec![
                ChannelRecord::from_leaf(ChannelKind::CallCentre, leaves[0].0, leaves[0].1),
                ChannelRecord::from_leaf(ChannelKind::Insta, leaves[1].0, leaves[1].1),
                ChannelRecord::from_leaf(ChannelKind::Talabat, leaves[2].0, leaves[2].1),
            ],
            total_sales: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
        };

        let report = SalesReport {
            branches: vec![
                branch(
                    "Maadi",
                    "المعادي",
                    [(139322.55, 198), (270006.16, 536), (240079.0, 695)],
                ),
                branch(
                    "Heliopolis",
                    "مصر الجديدة",
                    [(226896.76, 335), (332023.66, 631), (389231.71, 1197)],
                ),
                branch(
                    "Tagamoa",
                    "التجمع",
                    [(173787.06, 230), (314532.0, 581), (273711.53, 817)],
                ),
                branch(
                    "Dark",
                    "Dark Store",
                    [(221016.15, 386), (339310.0, 724), (618680.25, 1994)],
                ),
            ],
            website: WebsiteRecord {
                visits: 23000,
                total_sales: 135591.82,
                total_orders: 206,
                completed_orders: 184,
                cancelled_orders: 22,
                cancelled_value: 11695.9,
                conversion_rate: 0.0,
                cancellation_rate: 0.0,
                avg_order_value: 0.0,
            },
        };

        crate::aggregate::recompute_report(report)
    }
}
