use super::DecodeSchema;
use crate::aggregate;
use crate::report::{BranchRecord, ChannelRecord, SalesReport, WebsiteRecord};

/// Read cursor over the flat token sequence. Reads past the end yield
/// zero — the decoder is lenient by design, document formats are not
/// guaranteed.
struct Cursor<'a> {
    tokens: &'a [f64],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [f64]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn next(&mut self) -> f64 {
        let value = self.tokens.get(self.pos).copied().unwrap_or(0.0);
        self.pos += 1;
        value
    }

    fn next_count(&mut self) -> u64 {
        self.next() as u64
    }
}

/// Map the token sequence onto the schema's structure: for each branch,
/// two tokens per channel (sales, orders) in schema order, then the
/// six-token website block. All derived fields come out of the
/// aggregation engine, never from the document.
pub fn decode(tokens: &[f64], schema: &DecodeSchema) -> SalesReport {
    let mut cursor = Cursor::new(tokens);

    let branches = schema
        .branches
        .iter()
        .map(|spec| {
            let channels = schema
                .channels
                .iter()
                .map(|&kind| {
                    let sales = cursor.next();
                    let orders = cursor.next_count();
                    ChannelRecord::from_leaf(kind, sales, orders)
                })
                .collect();

            aggregate::recompute_branch(BranchRecord {
                name: spec.name.clone(),
                localized_name: spec.localized_name.clone(),
                channels,
                total_sales: 0.0,
                total_orders: 0,
                avg_order_value: 0.0,
            })
        })
        .collect();

    let website = aggregate::recompute_website(WebsiteRecord {
        visits: cursor.next_count(),
        total_sales: cursor.next(),
        total_orders: cursor.next_count(),
        completed_orders: cursor.next_count(),
        cancelled_orders: cursor.next_count(),
        cancelled_value: cursor.next(),
        conversion_rate: 0.0,
        cancellation_rate: 0.0,
        avg_order_value: 0.0,
    });

    SalesReport { branches, website }
}
