//! Order Models

use baglan::{draft::PlateLookup, order::OrderStatus};
use jiff::{Timestamp, tz::TimeZone};
use rust_decimal::Decimal;

use crate::envelope::{Record, parse_instant};

/// Name shown when an order has no customer
pub const GUEST_CUSTOMER: &str = "Misafir";

/// Plate shown when an order has none
pub const NO_PLATE: &str = "---";

/// Result of creating an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    /// Id assigned by the backend, when it returned one
    pub id: Option<String>,
}

/// An order as listed by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub id: String,
    pub customer: String,
    pub vehicle: String,
    pub plate: String,
    pub status: OrderStatus,
    pub date: Option<Timestamp>,
    pub total_price: Decimal,
    pub services: Vec<String>,
    pub assigned_staff: Vec<String>,
}

impl OrderSummary {
    /// Read a listed order. Records without an id are skipped.
    pub(crate) fn from_record(record: &Record<'_>, time_zone: &TimeZone) -> Option<Self> {
        let id = record.string(&["id", "orderId"])?;

        let status = record
            .i64(&["statusId", "status"])
            .and_then(OrderStatus::from_id)
            .or_else(|| {
                record
                    .string(&["statusName", "status"])
                    .and_then(|name| name.parse().ok())
            })
            .unwrap_or_default();

        let assigned_staff = record
            .array(&["personnels", "personnel"])
            .map(|people| {
                people
                    .iter()
                    .filter_map(Record::new)
                    .filter_map(|person| staff_name(&person))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            id,
            customer: record
                .string(&["customerInfo", "customerName"])
                .unwrap_or_else(|| GUEST_CUSTOMER.to_string()),
            vehicle: record
                .string(&["vehicleInfo", "vehicle"])
                .unwrap_or_default(),
            plate: record
                .string(&["vehiclePlate", "plate", "plateNumber"])
                .unwrap_or_else(|| NO_PLATE.to_string()),
            status,
            date: record
                .string(&["date", "appointmentDate"])
                .and_then(|text| parse_instant(&text, time_zone)),
            total_price: record.decimal(&["totalPrice", "total"]).unwrap_or_default(),
            services: record.strings(&["summaryList", "services"]),
            assigned_staff,
        })
    }
}

/// Customer and vehicle found by a plate search, if any field is present.
pub(crate) fn plate_lookup(record: &Record<'_>) -> Option<PlateLookup> {
    let lookup = PlateLookup {
        customer_name: record.string(&["customerName", "fullName", "customerInfo"]),
        phone: record.string(&["customerPhone", "phone", "phoneNumber"]),
        brand: record.string(&["brand"]),
        model: record.string(&["model"]),
    };

    let found = lookup.customer_name.is_some()
        || lookup.phone.is_some()
        || lookup.brand.is_some()
        || lookup.model.is_some();

    found.then_some(lookup)
}

fn staff_name(person: &Record<'_>) -> Option<String> {
    person.string(&["fullName", "name"]).or_else(|| {
        let full = [
            person.string(&["firstName"]),
            person.string(&["lastName"]),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        (!full.is_empty()).then_some(full)
    })
}
