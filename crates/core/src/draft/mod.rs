//! Order draft
//!
//! The in-progress order assembled by the wizard. Every mutation is a shallow
//! merge with no validation; completeness is checked by [`crate::gate`] and
//! prices by [`crate::pricing`], both against the current state.

use std::{fmt, str::FromStr};

use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ServiceCategory;

pub mod fixture;
pub mod selections;

pub use fixture::{DraftFixture, DraftFixtureError};
pub use selections::{
    CeramicSelection, ChosenSet, PpfSelection, ServiceSelections, WashSelection,
    WindowFilmSelection,
};

/// Customer contact details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: String,
}

/// Customer fields editable in the first step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// Full name
    Name,
    /// Phone number
    Phone,
    /// Email address
    Email,
}

/// Vehicle details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vehicle {
    /// Make
    pub brand: String,
    /// Model
    pub model: String,
    /// Model year, as typed
    pub year: String,
    /// Licence plate
    pub plate: String,
    /// Colour
    pub color: String,
}

/// Vehicle fields editable in the first step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleField {
    /// Make
    Brand,
    /// Model
    Model,
    /// Model year
    Year,
    /// Licence plate
    Plate,
    /// Colour
    Color,
}

/// Appointment slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Appointment {
    /// Day
    pub date: Option<Date>,
    /// Time of day
    pub time: Option<Time>,
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash
    #[serde(rename = "Nakit")]
    Cash,

    /// Credit card
    #[serde(rename = "Kredi Kartı")]
    CreditCard,

    /// Bank transfer
    #[serde(rename = "Havale")]
    BankTransfer,

    /// Pay on a later visit
    #[serde(rename = "Daha Sonra")]
    Later,
}

impl PaymentMethod {
    /// Label used by the backend.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Nakit",
            PaymentMethod::CreditCard => "Kredi Kartı",
            PaymentMethod::BankTransfer => "Havale",
            PaymentMethod::Later => "Daha Sonra",
        }
    }

    /// Whether choosing this method means the money is taken now.
    pub fn settles_immediately(self) -> bool {
        !matches!(self, PaymentMethod::Later)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised payment method name
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "nakit" => Ok(PaymentMethod::Cash),
            "card" | "credit-card" | "credit card" | "kredi kartı" => Ok(PaymentMethod::CreditCard),
            "transfer" | "bank-transfer" | "bank transfer" | "havale" => {
                Ok(PaymentMethod::BankTransfer)
            }
            "later" | "daha sonra" => Ok(PaymentMethod::Later),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Payment choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Payment {
    /// Chosen method
    pub method: Option<PaymentMethod>,
    /// Whether payment has been taken
    pub is_paid: bool,
}

/// Customer and vehicle details the backend already knows for a plate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlateLookup {
    /// Customer name
    pub customer_name: Option<String>,
    /// Customer phone
    pub phone: Option<String>,
    /// Vehicle make
    pub brand: Option<String>,
    /// Vehicle model
    pub model: Option<String>,
}

/// A single change to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftUpdate {
    /// Set a customer field
    Customer(CustomerField, String),
    /// Set a vehicle field
    Vehicle(VehicleField, String),
    /// Set the appointment day
    AppointmentDate(Date),
    /// Set the appointment time
    AppointmentTime(Time),
    /// Choose a payment method
    PaymentMethod(PaymentMethod),
    /// Override whether payment was taken
    Paid(bool),
    /// Toggle a catalog item within a category
    ToggleService(ServiceCategory, String),
    /// Choose or clear the PPF series
    PpfSeries(Option<String>),
    /// Choose or clear the PPF thickness
    PpfMicron(Option<u16>),
    /// Choose or clear the ceramic product
    CeramicProduct(Option<String>),
    /// Choose or clear the window film
    WindowFilmProduct(Option<String>),
}

/// In-progress order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    customer: Customer,
    vehicle: Vehicle,
    services: ServiceSelections,
    appointment: Appointment,
    payment: Payment,
}

impl OrderDraft {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a draft by applying updates in order.
    pub fn from_updates(updates: impl IntoIterator<Item = DraftUpdate>) -> Self {
        let mut draft = Self::new();

        for update in updates {
            draft.apply(update);
        }

        draft
    }

    /// Customer details
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Vehicle details
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Service selections
    pub fn services(&self) -> &ServiceSelections {
        &self.services
    }

    /// Appointment slot
    pub fn appointment(&self) -> &Appointment {
        &self.appointment
    }

    /// Payment choice
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    /// Apply one update.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Customer(field, value) => self.set_customer_field(field, value),
            DraftUpdate::Vehicle(field, value) => self.set_vehicle_field(field, value),
            DraftUpdate::AppointmentDate(date) => self.appointment.date = Some(date),
            DraftUpdate::AppointmentTime(time) => self.appointment.time = Some(time),
            DraftUpdate::PaymentMethod(method) => self.set_payment_method(method),
            DraftUpdate::Paid(is_paid) => self.set_paid(is_paid),
            DraftUpdate::ToggleService(category, item_id) => {
                self.toggle_service_item(category, &item_id);
            }
            DraftUpdate::PpfSeries(series_id) => self.set_ppf_series(series_id.as_deref()),
            DraftUpdate::PpfMicron(micron) => self.set_ppf_micron(micron),
            DraftUpdate::CeramicProduct(product_id) => {
                self.set_ceramic_product(product_id.as_deref());
            }
            DraftUpdate::WindowFilmProduct(product_id) => {
                self.set_window_film_product(product_id.as_deref());
            }
        }
    }

    /// Set one customer field.
    pub fn set_customer_field(&mut self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();

        match field {
            CustomerField::Name => self.customer.name = value,
            CustomerField::Phone => self.customer.phone = value,
            CustomerField::Email => self.customer.email = value,
        }
    }

    /// Set one vehicle field.
    pub fn set_vehicle_field(&mut self, field: VehicleField, value: impl Into<String>) {
        let value = value.into();

        match field {
            VehicleField::Brand => self.vehicle.brand = value,
            VehicleField::Model => self.vehicle.model = value,
            VehicleField::Year => self.vehicle.year = value,
            VehicleField::Plate => self.vehicle.plate = value,
            VehicleField::Color => self.vehicle.color = value,
        }
    }

    /// Set the appointment day and time.
    pub fn set_appointment(&mut self, date: Date, time: Time) {
        self.appointment = Appointment {
            date: Some(date),
            time: Some(time),
        };
    }

    /// Choose a payment method. Any method other than "later" marks the order paid.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment = Payment {
            method: Some(method),
            is_paid: method.settles_immediately(),
        };
    }

    /// Override the paid flag.
    pub fn set_paid(&mut self, is_paid: bool) {
        self.payment.is_paid = is_paid;
    }

    /// Toggle an item in a category: wash service ids for wash, vehicle part
    /// ids for PPF and ceramic, glass part ids for window film. Returns whether
    /// the item is now chosen.
    pub fn toggle_service_item(&mut self, category: ServiceCategory, item_id: &str) -> bool {
        self.services.toggle(category, item_id)
    }

    /// Choose or clear the PPF series. Changing it clears micron and parts.
    pub fn set_ppf_series(&mut self, series_id: Option<&str>) {
        self.services.ppf.set_series(series_id);
    }

    /// Choose or clear the PPF thickness.
    pub fn set_ppf_micron(&mut self, micron: Option<u16>) {
        self.services.ppf.set_micron(micron);
    }

    /// Choose or clear the ceramic product.
    pub fn set_ceramic_product(&mut self, product_id: Option<&str>) {
        self.services.ceramic.set_product(product_id);
    }

    /// Choose or clear the window film.
    pub fn set_window_film_product(&mut self, product_id: Option<&str>) {
        self.services.window_film.set_product(product_id);
    }

    /// Fill empty customer and vehicle fields from a plate lookup. Fields the
    /// user already typed are kept.
    pub fn prefill_from_lookup(&mut self, lookup: &PlateLookup) {
        fill_if_blank(&mut self.customer.name, lookup.customer_name.as_deref());
        fill_if_blank(&mut self.customer.phone, lookup.phone.as_deref());
        fill_if_blank(&mut self.vehicle.brand, lookup.brand.as_deref());
        fill_if_blank(&mut self.vehicle.model, lookup.model.as_deref());
    }
}

fn fill_if_blank(field: &mut String, value: Option<&str>) {
    if let Some(value) = value
        && field.trim().is_empty()
    {
        *field = value.to_string();
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};

    use super::*;

    #[test]
    fn new_draft_is_empty() {
        let draft = OrderDraft::new();

        assert!(draft.services().is_empty());
        assert_eq!(draft.payment().method, None);
        assert_eq!(draft.appointment().date, None);
    }

    #[test]
    fn field_setters_merge_without_touching_siblings() {
        let mut draft = OrderDraft::new();

        draft.set_customer_field(CustomerField::Name, "Ayşe Yılmaz");
        draft.set_customer_field(CustomerField::Phone, "0555 000 00 00");
        draft.set_vehicle_field(VehicleField::Plate, "34 ABC 123");
        draft.set_vehicle_field(VehicleField::Brand, "Renault");

        assert_eq!(draft.customer().name, "Ayşe Yılmaz");
        assert_eq!(draft.customer().phone, "0555 000 00 00");
        assert_eq!(draft.customer().email, "");
        assert_eq!(draft.vehicle().plate, "34 ABC 123");
        assert_eq!(draft.vehicle().brand, "Renault");
    }

    #[test]
    fn payment_method_sets_paid_flag() {
        let mut draft = OrderDraft::new();

        draft.set_payment_method(PaymentMethod::Cash);
        assert!(draft.payment().is_paid);

        draft.set_payment_method(PaymentMethod::Later);
        assert!(!draft.payment().is_paid);

        draft.set_paid(true);
        assert!(draft.payment().is_paid);
        assert_eq!(draft.payment().method, Some(PaymentMethod::Later));
    }

    #[test]
    fn toggle_reports_membership() {
        let mut draft = OrderDraft::new();

        assert!(draft.toggle_service_item(ServiceCategory::Wash, "standard-wash"));
        assert!(draft.services().is_selected(ServiceCategory::Wash));

        assert!(!draft.toggle_service_item(ServiceCategory::Wash, "standard-wash"));
        assert!(!draft.services().is_selected(ServiceCategory::Wash));
    }

    #[test]
    fn wash_toggle_round_trip_restores_draft() {
        let mut draft = OrderDraft::new();
        draft.toggle_service_item(ServiceCategory::Wash, "engine-wash");
        let before = draft.clone();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");

        assert_eq!(draft, before);
    }

    #[test]
    fn changing_ppf_series_cascades() {
        let mut draft = OrderDraft::new();

        draft.set_ppf_series(Some("platinum"));
        draft.set_ppf_micron(Some(210));
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");
        draft.set_ppf_series(Some("carat"));

        assert_eq!(draft.services().ppf().micron(), None);
        assert!(draft.services().ppf().parts().is_empty());
    }

    #[test]
    fn apply_matches_direct_calls() {
        let updates = [
            DraftUpdate::Customer(CustomerField::Name, "Mehmet".to_string()),
            DraftUpdate::Vehicle(VehicleField::Model, "Clio".to_string()),
            DraftUpdate::AppointmentDate(date(2026, 10, 20)),
            DraftUpdate::AppointmentTime(time(10, 0, 0, 0)),
            DraftUpdate::PaymentMethod(PaymentMethod::CreditCard),
            DraftUpdate::PpfSeries(Some("carat".to_string())),
            DraftUpdate::ToggleService(ServiceCategory::Ppf, "hood".to_string()),
        ];

        let draft = OrderDraft::from_updates(updates);

        let mut expected = OrderDraft::new();
        expected.set_customer_field(CustomerField::Name, "Mehmet");
        expected.set_vehicle_field(VehicleField::Model, "Clio");
        expected.set_appointment(date(2026, 10, 20), time(10, 0, 0, 0));
        expected.set_payment_method(PaymentMethod::CreditCard);
        expected.set_ppf_series(Some("carat"));
        expected.toggle_service_item(ServiceCategory::Ppf, "hood");

        assert_eq!(draft, expected);
    }

    #[test]
    fn prefill_only_fills_blank_fields() {
        let mut draft = OrderDraft::new();
        draft.set_customer_field(CustomerField::Name, "Typed Name");

        draft.prefill_from_lookup(&PlateLookup {
            customer_name: Some("Stored Name".to_string()),
            phone: Some("0212 111 11 11".to_string()),
            brand: Some("Fiat".to_string()),
            model: None,
        });

        assert_eq!(draft.customer().name, "Typed Name");
        assert_eq!(draft.customer().phone, "0212 111 11 11");
        assert_eq!(draft.vehicle().brand, "Fiat");
        assert_eq!(draft.vehicle().model, "");
    }

    #[test]
    fn payment_method_parses_english_and_turkish_names() {
        assert_eq!("cash".parse(), Ok(PaymentMethod::Cash));
        assert_eq!("Nakit".parse(), Ok(PaymentMethod::Cash));
        assert_eq!("Kredi Kartı".parse(), Ok(PaymentMethod::CreditCard));
        assert_eq!("havale".parse(), Ok(PaymentMethod::BankTransfer));
        assert_eq!("later".parse(), Ok(PaymentMethod::Later));
        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(UnknownPaymentMethod("cheque".to_string()))
        );
    }
}
