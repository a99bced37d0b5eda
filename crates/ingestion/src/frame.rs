//! Tabular raw input and required-column resolution.
//!
//! The acquisition layer hands over a header row plus string cells. This module
//! locates the required columns and turns each row into a [`RawTransaction`],
//! leaving per-row validity to the cleaner.

use promo_core::config::ColumnNames;
use promo_core::{Error, RawTransaction, Result};

/// Header plus rows of optional string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    /// Column names, in cell order.
    pub columns: Vec<String>,
    /// Rows of cells. `None` or blank cells are missing values.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Positions of the required columns within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    invoice_no: usize,
    invoice_date: usize,
    quantity: usize,
    unit_price: usize,
}

impl RawFrame {
    /// Create a frame from a header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }

    fn resolve(&self, names: &ColumnNames) -> Result<ColumnIndex> {
        let required = [
            &names.invoice_no,
            &names.invoice_date,
            &names.quantity,
            &names.unit_price,
        ];

        let positions: Vec<Option<usize>> =
            required.iter().map(|name| self.position(name)).collect();

        let missing: Vec<&str> = required
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.as_str())
            .collect();

        match positions.as_slice() {
            [Some(invoice_no), Some(invoice_date), Some(quantity), Some(unit_price)] => {
                Ok(ColumnIndex {
                    invoice_no: *invoice_no,
                    invoice_date: *invoice_date,
                    quantity: *quantity,
                    unit_price: *unit_price,
                })
            }
            _ => Err(Error::schema(missing)),
        }
    }

    /// Convert every row into a raw transaction.
    ///
    /// Fails with [`Error::Schema`] when a required column is absent from the
    /// header. Missing or unparseable cells become `None`; a missing invoice
    /// number becomes an empty string.
    pub fn records(&self, names: &ColumnNames) -> Result<Vec<RawTransaction>> {
        let index = self.resolve(names)?;

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let cell = |i: usize| {
                    row.get(i)
                        .and_then(|c| c.as_deref())
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                };

                RawTransaction {
                    invoice_no: cell(index.invoice_no).unwrap_or_default().to_string(),
                    invoice_date: cell(index.invoice_date).map(str::to_string),
                    quantity: cell(index.quantity).and_then(parse_quantity),
                    unit_price: cell(index.unit_price).and_then(parse_price),
                }
            })
            .collect())
    }
}

/// Integer quantity; integral floats such as "6.0" are accepted.
fn parse_quantity(s: &str) -> Option<i64> {
    if let Ok(q) = s.parse::<i64>() {
        return Some(q);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_price(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn test_records_in_any_column_order() {
        let frame = RawFrame::new(
            header(&["UnitPrice", "StockCode", "InvoiceNo", "Quantity", "InvoiceDate"]),
            vec![row(&["2.55", "85123A", "536365", "6", "12/1/2010 8:26"])],
        );

        let records = frame.records(&ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].invoice_no, "536365");
        assert_eq!(records[0].quantity, Some(6));
        assert_eq!(records[0].unit_price, Some(2.55));
        assert_eq!(records[0].invoice_date.as_deref(), Some("12/1/2010 8:26"));
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let frame = RawFrame::new(header(&["InvoiceNo", "InvoiceDate"]), vec![]);

        match frame.records(&ColumnNames::default()) {
            Err(Error::Schema { missing }) => {
                assert_eq!(missing, vec!["Quantity".to_string(), "UnitPrice".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_frame_with_full_header_is_ok() {
        let frame = RawFrame::new(
            header(&["InvoiceNo", "InvoiceDate", "Quantity", "UnitPrice"]),
            vec![],
        );
        assert!(frame.records(&ColumnNames::default()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_and_bad_cells_become_none() {
        let frame = RawFrame::new(
            header(&["InvoiceNo", "InvoiceDate", "Quantity", "UnitPrice"]),
            vec![
                vec![Some("1".into()), None, Some("  ".into()), Some("abc".into())],
                vec![Some("2".into()), Some("2011-01-01".into()), Some("3.0".into())],
                vec![None, Some("2011-01-01".into()), Some("2.5".into()), Some("NaN".into())],
            ],
        );

        let records = frame.records(&ColumnNames::default()).unwrap();
        assert_eq!(records[0].invoice_date, None);
        assert_eq!(records[0].quantity, None);
        assert_eq!(records[0].unit_price, None);

        // Short row: the unit price cell does not exist.
        assert_eq!(records[1].quantity, Some(3));
        assert_eq!(records[1].unit_price, None);

        assert_eq!(records[2].invoice_no, "");
        assert_eq!(records[2].quantity, None);
        assert_eq!(records[2].unit_price, None);
    }

    #[test]
    fn test_custom_column_names() {
        let names = ColumnNames {
            invoice_no: "order_id".into(),
            invoice_date: "ts".into(),
            quantity: "qty".into(),
            unit_price: "price".into(),
        };
        let frame = RawFrame::new(
            header(&["order_id", "ts", "qty", "price"]),
            vec![row(&["A1", "2011-02-03", "-1", "4.0"])],
        );

        let records = frame.records(&names).unwrap();
        assert_eq!(records[0].quantity, Some(-1));
    }
}
