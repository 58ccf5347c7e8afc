//! Ledger Models

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::envelope::{Record, parse_instant};

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money in
    Income,
    /// Money out
    Expense,
}

impl TransactionKind {
    /// Backend type code: 1 for income, 0 for expense.
    pub fn code(self) -> u8 {
        match self {
            TransactionKind::Income => 1,
            TransactionKind::Expense => 0,
        }
    }

    /// Category used when an entry has none
    pub fn default_category(self) -> &'static str {
        match self {
            TransactionKind::Income => "Gelir",
            TransactionKind::Expense => "Gider",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_category())
    }
}

/// Income or expense entry
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub title: String,
    pub description: String,
    pub amount: Decimal,
    pub date: Option<Timestamp>,
    pub category: String,
}

impl Transaction {
    pub(crate) fn from_record(record: &Record<'_>, time_zone: &TimeZone) -> Option<Self> {
        let id = record.string(&["id"])?;

        let is_income = record.i64(&["type"]).map(|code| code == 1).or_else(|| record.bool(&["isIncome"]));
        let kind = if is_income.unwrap_or(false) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };

        let description = record.string(&["description"]).unwrap_or_default();

        Some(Self {
            id,
            kind,
            title: record
                .string(&["title"])
                .unwrap_or_else(|| description.clone()),
            description,
            amount: record.decimal(&["amount"]).unwrap_or_default(),
            date: record
                .string(&["date", "createdAt"])
                .and_then(|text| parse_instant(&text, time_zone)),
            category: record
                .string(&["category"])
                .unwrap_or_else(|| kind.default_category().to_string()),
        })
    }
}

/// Entries newest first; undated entries last.
pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Body for recording a ledger entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: u8,
    pub date: Timestamp,
}

impl NewTransaction {
    /// Entry of `kind` with the title repeated as description when none is given.
    pub fn new(
        kind: TransactionKind,
        title: impl Into<String>,
        description: Option<String>,
        amount: Decimal,
        date: Timestamp,
    ) -> Self {
        let title = title.into();

        Self {
            description: description.unwrap_or_else(|| title.clone()),
            title,
            amount,
            kind: kind.code(),
            date,
        }
    }
}
