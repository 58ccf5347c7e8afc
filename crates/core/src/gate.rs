//! Step gate
//!
//! Decides whether the wizard may move forward from a step. Checks read the
//! draft as it is now; nothing is cached between calls.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    draft::OrderDraft,
    pricing::{PricingError, grand_total},
};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    /// Customer and vehicle details
    Customer,
    /// Service selection
    Services,
    /// Appointment slot
    Appointment,
    /// Payment and confirmation
    Payment,
}

impl WizardStep {
    /// Every step, first to last.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Customer,
        WizardStep::Services,
        WizardStep::Appointment,
        WizardStep::Payment,
    ];

    /// 1-based step number.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Customer => 1,
            WizardStep::Services => 2,
            WizardStep::Appointment => 3,
            WizardStep::Payment => 4,
        }
    }

    /// The step after this one.
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Customer => Some(WizardStep::Services),
            WizardStep::Services => Some(WizardStep::Appointment),
            WizardStep::Appointment => Some(WizardStep::Payment),
            WizardStep::Payment => None,
        }
    }

    /// The step before this one.
    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Customer => None,
            WizardStep::Services => Some(WizardStep::Customer),
            WizardStep::Appointment => Some(WizardStep::Services),
            WizardStep::Payment => Some(WizardStep::Appointment),
        }
    }

    /// Step title as shown in the wizard.
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Customer => "Müşteri & Araç",
            WizardStep::Services => "Hizmetler",
            WizardStep::Appointment => "Randevu",
            WizardStep::Payment => "Ödeme",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Fields required by the customer step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// Customer name
    CustomerName,
    /// Customer phone
    CustomerPhone,
    /// Vehicle make
    Brand,
    /// Vehicle model
    Model,
    /// Licence plate
    Plate,
}

impl RequiredField {
    /// Field label
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::CustomerName => "customer name",
            RequiredField::CustomerPhone => "customer phone",
            RequiredField::Brand => "brand",
            RequiredField::Model => "model",
            RequiredField::Plate => "plate",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Missing required fields, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub SmallVec<[RequiredField; 5]>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{field}")?;
        }

        Ok(())
    }
}

/// Why a step may not be left.
#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    /// Customer or vehicle fields are blank
    #[error("Missing required fields: {0}")]
    MissingFields(MissingFields),

    /// Nothing priced above zero is selected
    #[error("Select at least one service")]
    NothingBillable,

    /// Date or time not chosen
    #[error("Choose an appointment date and time")]
    MissingAppointment,

    /// No payment method
    #[error("Choose a payment method")]
    MissingPaymentMethod,

    /// Total could not be computed
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Check whether `step` is complete for `draft`.
///
/// # Errors
///
/// Returns the first reason the step is incomplete. For the customer step,
/// every blank field is listed.
pub fn check_step(step: WizardStep, draft: &OrderDraft, catalog: &Catalog) -> Result<(), GateError> {
    match step {
        WizardStep::Customer => check_customer(draft),
        WizardStep::Services => {
            if grand_total(draft, catalog)?.to_minor_units() > 0 {
                Ok(())
            } else {
                Err(GateError::NothingBillable)
            }
        }
        WizardStep::Appointment => {
            let appointment = draft.appointment();

            if appointment.date.is_some() && appointment.time.is_some() {
                Ok(())
            } else {
                Err(GateError::MissingAppointment)
            }
        }
        WizardStep::Payment => {
            if draft.payment().method.is_some() {
                Ok(())
            } else {
                Err(GateError::MissingPaymentMethod)
            }
        }
    }
}

fn check_customer(draft: &OrderDraft) -> Result<(), GateError> {
    let customer = draft.customer();
    let vehicle = draft.vehicle();

    let fields = [
        (RequiredField::CustomerName, &customer.name),
        (RequiredField::CustomerPhone, &customer.phone),
        (RequiredField::Brand, &vehicle.brand),
        (RequiredField::Model, &vehicle.model),
        (RequiredField::Plate, &vehicle.plate),
    ];

    let missing: SmallVec<[RequiredField; 5]> = fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GateError::MissingFields(MissingFields(missing)))
    }
}
