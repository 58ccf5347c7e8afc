//! Wizard
//!
//! Four editing steps followed by a single submission. While a submission is
//! in flight the wizard refuses navigation, edits and closing; a failure
//! returns to the payment step with the draft untouched.

use thiserror::Error;

use crate::{
    catalog::Catalog,
    draft::OrderDraft,
    gate::{GateError, WizardStep, check_step},
};

/// Where the wizard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// User is filling in a step
    Editing(WizardStep),
    /// Order has been sent and no answer has arrived yet
    Submitting,
    /// Order was accepted
    Succeeded,
    /// Wizard was dismissed
    Closed,
}

/// Wizard transition errors
#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    /// A submission is in flight
    #[error("An order is already being submitted")]
    Busy,

    /// The wizard has succeeded or been closed
    #[error("The wizard is no longer open")]
    Finished,

    /// Current step is incomplete
    #[error("Step {step} is incomplete: {source}")]
    Incomplete {
        /// Step that failed its check
        step: WizardStep,
        /// Reason
        source: GateError,
    },

    /// `advance` at the last step; use `begin_submit`
    #[error("Already at the last step")]
    AtLastStep,

    /// `back` at the first step
    #[error("Already at the first step")]
    AtFirstStep,

    /// Submission started before the payment step
    #[error("Orders can only be submitted from the payment step")]
    NotAtPaymentStep,

    /// Submission result reported with nothing in flight
    #[error("No submission is in flight")]
    NotSubmitting,
}

/// Order creation wizard state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    phase: WizardPhase,
    last_failure: Option<String>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// A wizard at the first step.
    pub fn new() -> Self {
        Self {
            phase: WizardPhase::Editing(WizardStep::Customer),
            last_failure: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Step being edited, if any.
    pub fn step(&self) -> Option<WizardStep> {
        match self.phase {
            WizardPhase::Editing(step) => Some(step),
            _ => None,
        }
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    /// Message of the last failed submission, cleared when a new one starts.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Whether the draft may be changed right now.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Busy`] while submitting and
    /// [`WizardError::Finished`] once the wizard is done.
    pub fn ensure_editable(&self) -> Result<WizardStep, WizardError> {
        match self.phase {
            WizardPhase::Editing(step) => Ok(step),
            WizardPhase::Submitting => Err(WizardError::Busy),
            WizardPhase::Succeeded | WizardPhase::Closed => Err(WizardError::Finished),
        }
    }

    /// Move to the next step if the current one is complete.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Incomplete`] with the gate's reason, or a phase
    /// error if the wizard is not editing.
    pub fn advance(&mut self, draft: &OrderDraft, catalog: &Catalog) -> Result<WizardStep, WizardError> {
        let step = self.ensure_editable()?;
        let next = step.next().ok_or(WizardError::AtLastStep)?;

        check_step(step, draft, catalog).map_err(|source| WizardError::Incomplete { step, source })?;

        self.phase = WizardPhase::Editing(next);

        Ok(next)
    }

    /// Move to the previous step. Never gated.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::AtFirstStep`] on the first step, or a phase
    /// error if the wizard is not editing.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.ensure_editable()?;
        let previous = step.previous().ok_or(WizardError::AtFirstStep)?;

        self.phase = WizardPhase::Editing(previous);

        Ok(previous)
    }

    /// Start submitting from the payment step. Every step is checked again,
    /// since earlier steps may have been edited after they were passed.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotAtPaymentStep`] before the last step,
    /// [`WizardError::Incomplete`] naming the first step whose check no
    /// longer holds, or
    /// [`WizardError::Busy`] if a submission is already in flight.
    pub fn begin_submit(&mut self, draft: &OrderDraft, catalog: &Catalog) -> Result<(), WizardError> {
        let step = self.ensure_editable()?;

        if step != WizardStep::Payment {
            return Err(WizardError::NotAtPaymentStep);
        }

        for step in WizardStep::ALL {
            check_step(step, draft, catalog).map_err(|source| WizardError::Incomplete { step, source })?;
        }

        self.phase = WizardPhase::Submitting;
        self.last_failure = None;

        Ok(())
    }

    /// Record a failed submission and return to the payment step.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotSubmitting`] if nothing is in flight.
    pub fn submit_failed(&mut self, message: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_submitting()?;

        self.phase = WizardPhase::Editing(WizardStep::Payment);
        self.last_failure = Some(message.into());

        Ok(())
    }

    /// Record an accepted submission.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotSubmitting`] if nothing is in flight.
    pub fn submit_succeeded(&mut self) -> Result<(), WizardError> {
        self.ensure_submitting()?;

        self.phase = WizardPhase::Succeeded;

        Ok(())
    }

    /// Dismiss the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Busy`] while submitting.
    pub fn close(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::Busy);
        }

        self.phase = WizardPhase::Closed;

        Ok(())
    }

    fn ensure_submitting(&self) -> Result<(), WizardError> {
        if self.is_submitting() {
            Ok(())
        } else {
            Err(WizardError::NotSubmitting)
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use testresult::TestResult;

    use super::*;
    use crate::{
        catalog::ServiceCategory,
        draft::{CustomerField, PaymentMethod, VehicleField},
    };

    fn complete_draft() -> OrderDraft {
        let mut draft = OrderDraft::new();

        draft.set_customer_field(CustomerField::Name, "Zeynep Demir");
        draft.set_customer_field(CustomerField::Phone, "0532 000 00 00");
        draft.set_vehicle_field(VehicleField::Brand, "Toyota");
        draft.set_vehicle_field(VehicleField::Model, "Corolla");
        draft.set_vehicle_field(VehicleField::Plate, "35 TT 350");
        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.set_appointment(date(2026, 10, 21), time(14, 0, 0, 0));
        draft.set_payment_method(PaymentMethod::Cash);

        draft
    }

    fn at_payment(draft: &OrderDraft, catalog: &Catalog) -> Result<Wizard, WizardError> {
        let mut wizard = Wizard::new();

        for _ in 0..3 {
            wizard.advance(draft, catalog)?;
        }

        Ok(wizard)
    }

    #[test]
    fn walks_all_steps_and_submits() -> TestResult {
        let catalog = Catalog::builtin()?;
        let draft = complete_draft();
        let mut wizard = at_payment(&draft, &catalog)?;

        assert_eq!(wizard.step(), Some(WizardStep::Payment));
        assert_eq!(wizard.advance(&draft, &catalog), Err(WizardError::AtLastStep));

        wizard.begin_submit(&draft, &catalog)?;
        assert!(wizard.is_submitting());

        wizard.submit_succeeded()?;
        assert_eq!(wizard.phase(), WizardPhase::Succeeded);

        Ok(())
    }

    #[test]
    fn advance_is_gated() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut wizard = Wizard::new();

        let result = wizard.advance(&OrderDraft::new(), &catalog);

        assert!(matches!(
            result,
            Err(WizardError::Incomplete {
                step: WizardStep::Customer,
                source: GateError::MissingFields(_)
            })
        ));
        assert_eq!(wizard.step(), Some(WizardStep::Customer));

        Ok(())
    }

    #[test]
    fn back_is_never_gated() -> TestResult {
        let catalog = Catalog::builtin()?;
        let draft = complete_draft();
        let mut wizard = Wizard::new();

        wizard.advance(&draft, &catalog)?;

        assert_eq!(wizard.back(), Ok(WizardStep::Customer));
        assert_eq!(wizard.back(), Err(WizardError::AtFirstStep));

        Ok(())
    }

    #[test]
    fn submitting_refuses_everything_else() -> TestResult {
        let catalog = Catalog::builtin()?;
        let draft = complete_draft();
        let mut wizard = at_payment(&draft, &catalog)?;

        wizard.begin_submit(&draft, &catalog)?;

        assert_eq!(wizard.begin_submit(&draft, &catalog), Err(WizardError::Busy));
        assert_eq!(wizard.back(), Err(WizardError::Busy));
        assert_eq!(wizard.close(), Err(WizardError::Busy));
        assert_eq!(wizard.ensure_editable(), Err(WizardError::Busy));

        Ok(())
    }

    #[test]
    fn failure_returns_to_payment_with_message() -> TestResult {
        let catalog = Catalog::builtin()?;
        let draft = complete_draft();
        let mut wizard = at_payment(&draft, &catalog)?;

        wizard.begin_submit(&draft, &catalog)?;
        wizard.submit_failed("Duplicate plate")?;

        assert_eq!(wizard.step(), Some(WizardStep::Payment));
        assert_eq!(wizard.last_failure(), Some("Duplicate plate"));

        wizard.begin_submit(&draft, &catalog)?;
        assert_eq!(wizard.last_failure(), None);

        Ok(())
    }

    #[test]
    fn submit_rechecks_earlier_steps() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = complete_draft();
        let mut wizard = at_payment(&draft, &catalog)?;

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");

        assert!(matches!(
            wizard.begin_submit(&draft, &catalog),
            Err(WizardError::Incomplete {
                step: WizardStep::Services,
                ..
            })
        ));

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.set_customer_field(CustomerField::Name, "");

        assert!(matches!(
            wizard.begin_submit(&draft, &catalog),
            Err(WizardError::Incomplete {
                step: WizardStep::Customer,
                ..
            })
        ));
        assert_eq!(wizard.step(), Some(WizardStep::Payment));

        Ok(())
    }

    #[test]
    fn submit_only_from_payment_step() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut wizard = Wizard::new();

        assert_eq!(
            wizard.begin_submit(&complete_draft(), &catalog),
            Err(WizardError::NotAtPaymentStep)
        );
        assert_eq!(wizard.submit_succeeded(), Err(WizardError::NotSubmitting));

        Ok(())
    }

    #[test]
    fn closed_wizard_is_finished() -> TestResult {
        let mut wizard = Wizard::new();

        wizard.close()?;

        assert_eq!(wizard.phase(), WizardPhase::Closed);
        assert_eq!(wizard.back(), Err(WizardError::Finished));

        Ok(())
    }
}
