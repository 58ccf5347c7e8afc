//! Receipt
//!
//! Terminal tables for quotes, placed orders and the catalog.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::Catalog,
    pricing::{LineItems, PricingError},
    prices::format_whole,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Priced line items ready to print
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    line_items: &'a LineItems,
}

impl<'a> Receipt<'a> {
    /// Receipt for `line_items`.
    pub fn new(line_items: &'a LineItems) -> Self {
        Self { line_items }
    }

    /// Writes the line item table followed by the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the total cannot be computed or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        let mut category_rows = Vec::new();

        builder.push_record(["", "Category", "Product", "Spec", "Part", "Price"]);

        let mut previous = None;

        for (idx, item) in self.line_items.items().iter().enumerate() {
            if previous != Some(item.category) {
                category_rows.push(idx + 1);
                previous = Some(item.category);
            }

            builder.push_record([
                format!("#{}", idx + 1),
                item.category.to_string(),
                item.product.clone(),
                item.spec.clone(),
                item.part.clone(),
                item.price.to_string(),
            ]);
        }

        write_table(&mut out, builder, &category_rows, 5)?;

        let total = self.line_items.total()?;

        writeln!(out, " \x1b[1mTotal:\x1b[0m {}", format_whole(&total)).map_err(|_err| ReceiptError::IO)?;

        for summary in self.line_items.summaries() {
            writeln!(out, "  - {}", summary.text).map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

/// Writes every purchasable catalog entry as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_catalog(mut out: impl io::Write, catalog: &Catalog) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();
    let mut category_rows = Vec::new();
    let mut previous = None;

    builder.push_record(["Category", "Kind", "Id", "Name", "Price"]);

    for (idx, entry) in catalog.entries().iter().enumerate() {
        if previous != Some(entry.category) {
            category_rows.push(idx + 1);
            previous = Some(entry.category);
        }

        builder.push_record([
            entry.category.to_string(),
            format!("{:?}", entry.kind),
            entry.id.to_string(),
            entry.name.to_string(),
            entry.price.map(|price| price.to_string()).unwrap_or_default(),
        ]);
    }

    write_table(&mut out, builder, &category_rows, 4)?;

    let part_rate = (catalog.ceramic_part_rate() * Decimal::ONE_HUNDRED).normalize();

    writeln!(out, " Ceramic per-part rate: {part_rate}%").map_err(|_err| ReceiptError::IO)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    category_rows: &[usize],
    price_column: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in category_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(price_column..price_column + 1), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{catalog::ServiceCategory, draft::OrderDraft, pricing::expand_to_line_items};

    #[test]
    fn receipt_lists_items_and_total() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.set_ppf_series(Some("carat"));
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");

        let line_items = expand_to_line_items(&draft, &catalog)?;
        let mut out = Vec::new();

        Receipt::new(&line_items).write_to(&mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(printed.contains("Standart Yıkama"));
        assert!(printed.contains("Kaput"));
        assert!(printed.contains("2900"));
        assert!(printed.contains("PPF OLEX Carat Series (1 Parça)"));

        Ok(())
    }

    #[test]
    fn empty_receipt_totals_zero() -> TestResult {
        let catalog = Catalog::builtin()?;
        let line_items = expand_to_line_items(&OrderDraft::new(), &catalog)?;
        let mut out = Vec::new();

        Receipt::new(&line_items).write_to(&mut out)?;

        assert!(String::from_utf8(out)?.contains("Total:"));

        Ok(())
    }

    #[test]
    fn catalog_table_lists_every_entry() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut out = Vec::new();

        write_catalog(&mut out, &catalog)?;

        let printed = String::from_utf8(out)?;

        for entry in catalog.entries() {
            assert!(printed.contains(entry.id), "missing {}", entry.id);
        }

        Ok(())
    }
}
