//! Personnel Models

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::envelope::Record;

/// Role shown when the backend has none
pub const DEFAULT_ROLE: &str = "Personel";

const DEFAULT_FIRST_NAME: &str = "Ad";
const DEFAULT_LAST_NAME: &str = "Soyad";

/// Staff member
#[derive(Debug, Clone, PartialEq)]
pub struct Personnel {
    pub id: u64,
    pub name: String,
    pub role: String,
    pub salary: Decimal,
}

impl Personnel {
    pub(crate) fn from_record(record: &Record<'_>) -> Option<Self> {
        let id = record.u64(&["id", "personnelId"])?;

        let name = record.string(&["fullName", "name"]).unwrap_or_else(|| {
            [record.string(&["firstName"]), record.string(&["lastName"])]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        });

        Some(Self {
            id,
            name,
            role: record
                .string(&["position", "role"])
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            salary: record.decimal(&["salary"]).unwrap_or_default(),
        })
    }
}

/// Body for hiring a staff member
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonnel {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub salary: Decimal,
    pub start_date: Date,
}

impl NewPersonnel {
    /// Split `full_name` into first and last name. The last word is the last
    /// name; a missing part gets a placeholder.
    pub fn new(full_name: &str, position: Option<&str>, salary: Decimal, start_date: Date) -> Self {
        let mut words: Vec<&str> = full_name.split_whitespace().collect();
        let last_name = if words.len() > 1 { words.pop() } else { None };
        let first_name = words.join(" ");

        Self {
            first_name: if first_name.is_empty() {
                DEFAULT_FIRST_NAME.to_string()
            } else {
                first_name
            },
            last_name: last_name.unwrap_or(DEFAULT_LAST_NAME).to_string(),
            position: position
                .map(str::trim)
                .filter(|position| !position.is_empty())
                .unwrap_or(DEFAULT_ROLE)
                .to_string(),
            salary,
            start_date,
        }
    }
}

/// Body for changing a staff member's details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelUpdate {
    pub id: u64,
    #[serde(flatten)]
    pub details: NewPersonnel,
}
