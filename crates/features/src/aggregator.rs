//! Order aggregation.
//!
//! Collapses cleaned transaction lines into one total per invoice.

use promo_core::numeric::CompensatedSum;
use promo_core::{InvoiceNo, OrderTotals, TransactionLine};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulator for a single order.
#[derive(Debug, Clone, Default)]
struct OrderAccumulator {
    total: CompensatedSum,
    line_count: u32,
}

impl OrderAccumulator {
    fn add(&mut self, line: &TransactionLine) {
        self.total.add(line.line_total);
        self.line_count += 1;
    }
}

/// Order aggregator that sums line totals by invoice.
#[derive(Debug, Clone, Default)]
pub struct OrderAggregator {
    /// Accumulators by invoice.
    orders: BTreeMap<InvoiceNo, OrderAccumulator>,
    /// Lines seen.
    line_count: usize,
}

impl OrderAggregator {
    /// Create a new order aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cleaned line.
    pub fn add_line(&mut self, line: &TransactionLine) {
        // Avoid allocating a key for invoices already present.
        match self.orders.get_mut(line.invoice_no.as_str()) {
            Some(acc) => acc.add(line),
            None => self
                .orders
                .entry(line.invoice_no.clone())
                .or_default()
                .add(line),
        }
        self.line_count += 1;
    }

    /// Add multiple lines.
    pub fn add_lines(&mut self, lines: &[TransactionLine]) {
        for line in lines {
            self.add_line(line);
        }
    }

    /// Number of distinct orders seen.
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of lines seen.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Lines in a given order.
    pub fn lines_in(&self, invoice_no: &str) -> Option<u32> {
        self.orders.get(invoice_no).map(|acc| acc.line_count)
    }

    /// Current per-order totals.
    pub fn totals(&self) -> OrderTotals {
        self.orders
            .iter()
            .map(|(invoice, acc)| (invoice.clone(), acc.total.value()))
            .collect()
    }
}

/// Sum line totals per invoice.
pub fn aggregate(lines: &[TransactionLine]) -> OrderTotals {
    let mut aggregator = OrderAggregator::new();
    aggregator.add_lines(lines);

    debug!(
        lines = aggregator.line_count(),
        orders = aggregator.order_count(),
        "Aggregated lines into orders"
    );

    aggregator.totals()
}
