//! Orders
//!
//! The request body sent to create an order, the update body used to assign
//! staff or change status, and the local view of an order once it exists.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::DateTime, tz::TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::{Catalog, ServiceCategory},
    draft::{OrderDraft, PaymentMethod},
    pricing::{LineItem, PricingError, expand_to_line_items},
    prices::to_major,
};

/// Personnel id meaning "not assigned yet"
pub const UNASSIGNED: u64 = 0;

/// Errors building an order request
#[derive(Debug, Error)]
pub enum OrderError {
    /// Date or time missing
    #[error("Appointment date and time are required")]
    MissingAppointment,

    /// No payment method
    #[error("A payment method is required")]
    MissingPaymentMethod,

    /// Appointment could not be placed in the shop's time zone
    #[error("Invalid appointment time: {0}")]
    Appointment(#[from] jiff::Error),

    /// Line items could not be priced
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A priced line item as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedService {
    /// Category label
    pub category: ServiceCategory,

    /// Product or service name
    pub product: String,

    /// Variant; may be empty
    pub spec: String,

    /// Body part or glass area
    pub part: String,

    /// Price in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&LineItem> for SelectedService {
    fn from(item: &LineItem) -> Self {
        Self {
            category: item.category,
            product: item.product.clone(),
            spec: item.spec.clone(),
            part: item.part.clone(),
            price: to_major(&item.price),
        }
    }
}

/// Body of an order creation request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub customer_phone: String,
    /// Customer email
    pub customer_email: String,
    /// Licence plate
    pub plate_number: String,
    /// Vehicle make
    pub brand: String,
    /// Vehicle model
    pub model: String,
    /// Vehicle colour
    pub color: String,
    /// Model year
    pub year: String,
    /// Assigned staff member, [`UNASSIGNED`] for none
    pub personnel_id: u64,
    /// Appointment instant
    pub date: Timestamp,
    /// Sum of every selected service price
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Whether payment was taken
    pub is_paid: bool,
    /// Line items
    pub selected_services: Vec<SelectedService>,
    /// Per-category descriptions, kept for the local order view
    #[serde(skip)]
    pub summaries: Vec<String>,
}

impl NewOrderRequest {
    /// Build the creation request for `draft`.
    ///
    /// The appointment's civil date and time are read in `time_zone` and sent
    /// as a UTC instant. The total is the sum of the line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment or payment method is missing, the
    /// appointment does not exist in `time_zone`, or pricing fails.
    pub fn build(
        draft: &OrderDraft,
        catalog: &Catalog,
        personnel_id: Option<u64>,
        time_zone: &TimeZone,
    ) -> Result<Self, OrderError> {
        let appointment = draft.appointment();
        let (Some(date), Some(time)) = (appointment.date, appointment.time) else {
            return Err(OrderError::MissingAppointment);
        };

        let method = draft.payment().method.ok_or(OrderError::MissingPaymentMethod)?;
        let instant = DateTime::from_parts(date, time)
            .to_zoned(time_zone.clone())?
            .timestamp();

        let line_items = expand_to_line_items(draft, catalog)?;
        let total = line_items.total()?;

        let customer = draft.customer();
        let vehicle = draft.vehicle();

        Ok(Self {
            customer_name: customer.name.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            customer_email: customer.email.trim().to_string(),
            plate_number: vehicle.plate.trim().to_string(),
            brand: vehicle.brand.trim().to_string(),
            model: vehicle.model.trim().to_string(),
            color: vehicle.color.trim().to_string(),
            year: vehicle.year.trim().to_string(),
            personnel_id: personnel_id.unwrap_or(UNASSIGNED),
            date: instant,
            total_price: to_major(&total),
            payment_method: method,
            is_paid: draft.payment().is_paid,
            selected_services: line_items.items().iter().map(SelectedService::from).collect(),
            summaries: line_items
                .summaries()
                .iter()
                .map(|summary| summary.text.clone())
                .collect(),
        })
    }
}

/// Order lifecycle states, numbered as the backend numbers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Waiting to be worked on
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    /// Backend status id
    pub fn id(self) -> u8 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::InProgress => 2,
            OrderStatus::Completed => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// Status for a backend id
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::InProgress),
            3 => Some(OrderStatus::Completed),
            4 => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Turkish label
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Bekliyor",
            OrderStatus::InProgress => "İşlemde",
            OrderStatus::Completed => "Tamamlandı",
            OrderStatus::Cancelled => "İptal",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised order status
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    /// Accepts English and Turkish names in any case, and numeric ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .replace('İ', "i")
            .to_lowercase()
            .replace(['-', '_', ' '], "");

        match normalized.as_str() {
            "1" | "pending" | "bekliyor" | "beklemede" => Ok(OrderStatus::Pending),
            "2" | "inprogress" | "progress" | "işlemde" => Ok(OrderStatus::InProgress),
            "3" | "completed" | "tamamlandı" => Ok(OrderStatus::Completed),
            "4" | "cancelled" | "canceled" | "iptal" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownOrderStatus(s.to_string())),
        }
    }
}

/// Whether an order has been paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// Paid
    Paid,
    /// Outstanding
    Pending,
}

impl From<bool> for PaymentStatus {
    fn from(is_paid: bool) -> Self {
        if is_paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Paid => "Ödendi",
            PaymentStatus::Pending => "Bekliyor",
        })
    }
}

/// Body of an order update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    /// Order to change
    pub order_id: String,
    /// Vehicle or free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status id
    pub status_id: u8,
    /// Staff assigned to the order
    pub personnel_ids: Vec<u64>,
}

impl OrderUpdate {
    /// Update that sets `status` and replaces the assigned staff.
    pub fn new(order_id: impl Into<String>, status: OrderStatus, personnel_ids: Vec<u64>) -> Self {
        Self {
            order_id: order_id.into(),
            description: None,
            status_id: status.id(),
            personnel_ids,
        }
    }
}

/// Identity of an order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderId {
    /// Assigned by the backend
    Server(String),
    /// Generated locally because the backend did not return one
    Placeholder(Uuid),
}

impl OrderId {
    /// A fresh placeholder id.
    pub fn placeholder() -> Self {
        OrderId::Placeholder(Uuid::now_v7())
    }

    /// Whether this id was generated locally.
    pub fn is_provisional(&self) -> bool {
        matches!(self, OrderId::Placeholder(_))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Server(id) => f.write_str(id),
            OrderId::Placeholder(id) => write!(f, "local-{id}"),
        }
    }
}

/// Local view of a placed order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Identity
    pub id: OrderId,
    /// Customer name
    pub customer_name: String,
    /// "Brand Model"
    pub vehicle: String,
    /// Licence plate
    pub plate: String,
    /// Lifecycle state
    pub status: OrderStatus,
    /// Appointment instant
    pub date: Timestamp,
    /// Per-category descriptions
    pub services: Vec<String>,
    /// Order total in major units
    pub total_price: Decimal,
    /// Payment state
    pub payment_status: PaymentStatus,
    /// Assigned staff names
    pub assigned_staff: Vec<String>,
}

impl Order {
    /// The order as it looks right after `request` was accepted.
    pub fn placed(id: OrderId, request: &NewOrderRequest) -> Self {
        let vehicle = format!("{} {}", request.brand, request.model)
            .trim()
            .to_string();

        Self {
            id,
            customer_name: request.customer_name.clone(),
            vehicle,
            plate: request.plate_number.clone(),
            status: OrderStatus::Pending,
            date: request.date,
            services: request.summaries.clone(),
            total_price: request.total_price,
            payment_status: request.is_paid.into(),
            assigned_staff: Vec::new(),
        }
    }
}
