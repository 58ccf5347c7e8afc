//! Draft Fixtures
//!
//! YAML description of a complete draft, turned into the [`DraftUpdate`]s a
//! user would have made in the wizard.

use std::{fs, io, path::Path};

use jiff::civil::{Date, Time};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::ServiceCategory,
    draft::{CustomerField, DraftUpdate, OrderDraft, PaymentMethod, UnknownPaymentMethod, VehicleField},
};

/// Draft fixture errors
#[derive(Debug, Error)]
pub enum DraftFixtureError {
    /// IO error reading the fixture file
    #[error("Failed to read draft file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Date or time could not be parsed
    #[error("Invalid appointment {field}: {source}")]
    Appointment {
        /// `date` or `time`
        field: &'static str,
        /// Parse error
        source: jiff::Error,
    },

    /// Payment method not recognised
    #[error(transparent)]
    PaymentMethod(#[from] UnknownPaymentMethod),
}

/// Draft file
#[derive(Debug, Default, Deserialize)]
pub struct DraftFixture {
    /// Customer details
    #[serde(default)]
    pub customer: CustomerFixture,

    /// Vehicle details
    #[serde(default)]
    pub vehicle: VehicleFixture,

    /// Chosen services
    #[serde(default)]
    pub services: ServicesFixture,

    /// Appointment slot
    #[serde(default)]
    pub appointment: AppointmentFixture,

    /// Payment choice
    #[serde(default)]
    pub payment: PaymentFixture,
}

/// Customer section
#[derive(Debug, Default, Deserialize)]
pub struct CustomerFixture {
    /// Full name
    pub name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// Vehicle section
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFixture {
    /// Make
    pub brand: Option<String>,
    /// Model
    pub model: Option<String>,
    /// Model year
    pub year: Option<String>,
    /// Licence plate
    pub plate: Option<String>,
    /// Colour
    pub color: Option<String>,
}

/// Services section
#[derive(Debug, Default, Deserialize)]
pub struct ServicesFixture {
    /// Wash service ids
    #[serde(default)]
    pub wash: Vec<String>,

    /// PPF choice
    pub ppf: Option<PpfFixture>,

    /// Ceramic choice
    pub ceramic: Option<ProductPartsFixture>,

    /// Window film choice
    pub window_film: Option<ProductPartsFixture>,
}

/// PPF choice
#[derive(Debug, Default, Deserialize)]
pub struct PpfFixture {
    /// Series id
    pub series: Option<String>,
    /// Thickness
    pub micron: Option<u16>,
    /// Vehicle part ids
    #[serde(default)]
    pub parts: Vec<String>,
}

/// Product with optional parts
#[derive(Debug, Default, Deserialize)]
pub struct ProductPartsFixture {
    /// Product id
    pub product: Option<String>,
    /// Part ids
    #[serde(default)]
    pub parts: Vec<String>,
}

/// Appointment section, e.g. `date: 2026-10-20`, `time: "10:30"`
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentFixture {
    /// ISO date
    pub date: Option<String>,
    /// 24-hour time
    pub time: Option<String>,
}

/// Payment section
#[derive(Debug, Default, Deserialize)]
pub struct PaymentFixture {
    /// Method name, English or Turkish
    pub method: Option<String>,
    /// Override for the paid flag
    pub paid: Option<bool>,
}

impl DraftFixture {
    /// Parse a draft fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DraftFixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a draft fixture from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DraftFixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// The updates that produce this draft, in wizard order.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment or payment method cannot be parsed.
    pub fn into_updates(self) -> Result<Vec<DraftUpdate>, DraftFixtureError> {
        let mut updates = Vec::new();

        let customer = [
            (CustomerField::Name, self.customer.name),
            (CustomerField::Phone, self.customer.phone),
            (CustomerField::Email, self.customer.email),
        ];

        for (field, value) in customer {
            if let Some(value) = value {
                updates.push(DraftUpdate::Customer(field, value));
            }
        }

        let vehicle = [
            (VehicleField::Brand, self.vehicle.brand),
            (VehicleField::Model, self.vehicle.model),
            (VehicleField::Year, self.vehicle.year),
            (VehicleField::Plate, self.vehicle.plate),
            (VehicleField::Color, self.vehicle.color),
        ];

        for (field, value) in vehicle {
            if let Some(value) = value {
                updates.push(DraftUpdate::Vehicle(field, value));
            }
        }

        let services = self.services;

        for service_id in services.wash {
            updates.push(DraftUpdate::ToggleService(ServiceCategory::Wash, service_id));
        }

        if let Some(ppf) = services.ppf {
            updates.push(DraftUpdate::PpfSeries(ppf.series));
            updates.push(DraftUpdate::PpfMicron(ppf.micron));
            push_parts(&mut updates, ServiceCategory::Ppf, ppf.parts);
        }

        if let Some(ceramic) = services.ceramic {
            updates.push(DraftUpdate::CeramicProduct(ceramic.product));
            push_parts(&mut updates, ServiceCategory::Ceramic, ceramic.parts);
        }

        if let Some(film) = services.window_film {
            updates.push(DraftUpdate::WindowFilmProduct(film.product));
            push_parts(&mut updates, ServiceCategory::WindowFilm, film.parts);
        }

        if let Some(date) = self.appointment.date {
            let date = date
                .trim()
                .parse::<Date>()
                .map_err(|source| DraftFixtureError::Appointment { field: "date", source })?;

            updates.push(DraftUpdate::AppointmentDate(date));
        }

        if let Some(time) = self.appointment.time {
            let time = time
                .trim()
                .parse::<Time>()
                .map_err(|source| DraftFixtureError::Appointment { field: "time", source })?;

            updates.push(DraftUpdate::AppointmentTime(time));
        }

        if let Some(method) = self.payment.method {
            updates.push(DraftUpdate::PaymentMethod(method.parse::<PaymentMethod>()?));
        }

        if let Some(paid) = self.payment.paid {
            updates.push(DraftUpdate::Paid(paid));
        }

        Ok(updates)
    }

    /// Build the draft this fixture describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment or payment method cannot be parsed.
    pub fn into_draft(self) -> Result<OrderDraft, DraftFixtureError> {
        Ok(OrderDraft::from_updates(self.into_updates()?))
    }
}

fn push_parts(updates: &mut Vec<DraftUpdate>, category: ServiceCategory, parts: Vec<String>) {
    updates.extend(
        parts
            .into_iter()
            .map(|part_id| DraftUpdate::ToggleService(category, part_id)),
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;

    const FULL_DRAFT: &str = r#"
customer:
  name: Ayşe Yılmaz
  phone: 0555 123 45 67
vehicle:
  brand: Renault
  model: Clio
  plate: 34 ABC 123
services:
  wash: [standard-wash]
  ppf:
    series: carat
    micron: 150
    parts: [hood]
appointment:
  date: 2026-10-20
  time: "10:30"
payment:
  method: Nakit
"#;

    #[test]
    fn full_draft_builds_expected_state() -> TestResult {
        let draft = DraftFixture::from_yaml_str(FULL_DRAFT)?.into_draft()?;

        assert_eq!(draft.customer().name, "Ayşe Yılmaz");
        assert_eq!(draft.vehicle().plate, "34 ABC 123");
        assert!(draft.services().wash().services().contains("standard-wash"));
        assert_eq!(draft.services().ppf().series(), Some("carat"));
        assert_eq!(draft.services().ppf().micron(), Some(150));
        assert!(draft.services().ppf().parts().contains("hood"));
        assert_eq!(draft.appointment().date, Some(date(2026, 10, 20)));
        assert_eq!(draft.appointment().time, Some(time(10, 30, 0, 0)));
        assert_eq!(draft.payment().method, Some(PaymentMethod::Cash));
        assert!(draft.payment().is_paid);

        Ok(())
    }

    #[test]
    fn series_is_set_before_its_parts() -> TestResult {
        let updates = DraftFixture::from_yaml_str(FULL_DRAFT)?.into_updates()?;

        let series = updates
            .iter()
            .position(|u| matches!(u, DraftUpdate::PpfSeries(_)))
            .ok_or("missing series update")?;
        let hood = updates
            .iter()
            .position(|u| matches!(u, DraftUpdate::ToggleService(ServiceCategory::Ppf, _)))
            .ok_or("missing part update")?;

        assert!(series < hood);

        Ok(())
    }

    #[test]
    fn empty_fixture_is_empty_draft() -> TestResult {
        let draft = DraftFixture::from_yaml_str("{}")?.into_draft()?;

        assert_eq!(draft, OrderDraft::new());

        Ok(())
    }

    #[test]
    fn bad_time_is_reported() -> TestResult {
        let fixture = DraftFixture::from_yaml_str("appointment:\n  time: \"half past ten\"\n")?;

        assert!(matches!(
            fixture.into_updates(),
            Err(DraftFixtureError::Appointment { field: "time", .. })
        ));

        Ok(())
    }

    #[test]
    fn unknown_payment_method_is_reported() -> TestResult {
        let fixture = DraftFixture::from_yaml_str("payment:\n  method: cheque\n")?;

        assert!(matches!(
            fixture.into_updates(),
            Err(DraftFixtureError::PaymentMethod(_))
        ));

        Ok(())
    }

    #[test]
    fn load_reads_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("draft.yml");

        fs::write(&path, FULL_DRAFT)?;

        let draft = DraftFixture::load(&path)?.into_draft()?;

        assert_eq!(draft.vehicle().model, "Clio");

        Ok(())
    }
}
