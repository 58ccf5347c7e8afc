//! Order wizard session
//!
//! Binds the wizard state machine and the draft to the orders backend. The
//! draft is only ever changed through the session, so edits are refused for
//! as long as a submission is in flight.

use std::sync::Arc;

use baglan::{
    catalog::Catalog,
    draft::{DraftUpdate, OrderDraft},
    gate::WizardStep,
    order::{NewOrderRequest, Order, OrderId},
    pricing::{LineItems, PricingError, expand_to_line_items},
    wizard::{Wizard, WizardError, WizardPhase},
};
use jiff::tz::TimeZone;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{client::ApiError, orders::OrdersService};

/// Message recorded when an in-flight submission is abandoned.
pub const SUBMISSION_CANCELLED: &str = "Submission was cancelled before the server answered.";

/// A submission that did not produce an order. The draft is unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmissionFailure {
    /// User-visible text
    pub message: String,
}

impl From<WizardError> for SubmissionFailure {
    fn from(error: WizardError) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// One order being created
pub struct OrderWizard {
    wizard: Wizard,
    draft: OrderDraft,
    catalog: Catalog,
    orders: Arc<dyn OrdersService>,
    time_zone: TimeZone,
    personnel_id: Option<u64>,
}

impl std::fmt::Debug for OrderWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderWizard")
            .field("wizard", &self.wizard)
            .field("draft", &self.draft)
            .field("time_zone", &self.time_zone)
            .field("personnel_id", &self.personnel_id)
            .finish_non_exhaustive()
    }
}

impl OrderWizard {
    /// A fresh wizard at the first step with an empty draft.
    pub fn new(catalog: Catalog, orders: Arc<dyn OrdersService>, time_zone: TimeZone) -> Self {
        Self {
            wizard: Wizard::new(),
            draft: OrderDraft::new(),
            catalog,
            orders,
            time_zone,
            personnel_id: None,
        }
    }

    /// Assign the order to a staff member on creation.
    #[must_use]
    pub fn with_personnel(mut self, personnel_id: u64) -> Self {
        self.personnel_id = Some(personnel_id);
        self
    }

    /// Wizard state
    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Current draft
    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Catalog prices are read from
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Line items for the draft as it stands.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be computed.
    pub fn quote(&self) -> Result<LineItems, PricingError> {
        expand_to_line_items(&self.draft, &self.catalog)
    }

    /// Apply a change to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Busy`] while submitting and
    /// [`WizardError::Finished`] once the wizard is done.
    pub fn update(&mut self, update: DraftUpdate) -> Result<(), WizardError> {
        self.wizard.ensure_editable()?;
        self.draft.apply(update);

        Ok(())
    }

    /// Fill blank customer and vehicle fields from what the backend knows
    /// about the draft's plate. Returns whether anything was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup request fails.
    #[instrument(skip_all)]
    pub async fn prefill_from_plate(&mut self) -> Result<bool, ApiError> {
        if self.wizard.ensure_editable().is_err() {
            return Ok(false);
        }

        let Some(lookup) = self.orders.search_plate(&self.draft.vehicle().plate).await? else {
            return Ok(false);
        };

        self.draft.prefill_from_lookup(&lookup);

        Ok(true)
    }

    /// Move to the next step.
    ///
    /// # Errors
    ///
    /// See [`Wizard::advance`].
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        self.wizard.advance(&self.draft, &self.catalog)
    }

    /// Move to the previous step.
    ///
    /// # Errors
    ///
    /// See [`Wizard::back`].
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.wizard.back()
    }

    /// Dismiss the wizard.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Busy`] while submitting.
    pub fn close(&mut self) -> Result<(), WizardError> {
        self.wizard.close()
    }

    /// Submit the draft as a new order. The backend is called at most once.
    ///
    /// On success the wizard is finished and the placed order is returned,
    /// with a placeholder id if the backend sent none. On failure the wizard
    /// is back at the payment step and the draft is untouched. Dropping the
    /// returned future before it completes has the same effect as a failure.
    ///
    /// # Errors
    ///
    /// Returns the user-visible reason the order was not placed.
    #[instrument(skip_all, fields(plate = %self.draft.vehicle().plate))]
    pub async fn submit(&mut self) -> Result<Order, SubmissionFailure> {
        self.wizard.begin_submit(&self.draft, &self.catalog)?;

        let mut in_flight = InFlight::new(&mut self.wizard);

        let request = match NewOrderRequest::build(
            &self.draft,
            &self.catalog,
            self.personnel_id,
            &self.time_zone,
        ) {
            Ok(request) => request,
            Err(error) => return Err(in_flight.fail(error.to_string())),
        };

        match self.orders.create_order(&request).await {
            Ok(created) => {
                let id = created.id.map_or_else(OrderId::placeholder, OrderId::Server);

                if id.is_provisional() {
                    warn!(%id, "backend returned no order id; using a placeholder");
                }

                in_flight.succeed();

                info!(%id, total = %request.total_price, "order placed");

                Ok(Order::placed(id, &request))
            }
            Err(error) => {
                warn!(%error, "order submission failed");

                Err(in_flight.fail(error.user_message()))
            }
        }
    }

    /// Whether the wizard has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.wizard.phase(),
            WizardPhase::Succeeded | WizardPhase::Closed
        )
    }
}

/// Returns the wizard to the payment step unless the submission settles.
struct InFlight<'a> {
    wizard: &'a mut Wizard,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(wizard: &'a mut Wizard) -> Self {
        Self {
            wizard,
            settled: false,
        }
    }

    fn succeed(&mut self) {
        self.settled = true;

        if let Err(error) = self.wizard.submit_succeeded() {
            warn!(%error, "wizard was not submitting");
        }
    }

    fn fail(&mut self, message: String) -> SubmissionFailure {
        self.settled = true;

        if let Err(error) = self.wizard.submit_failed(message.clone()) {
            warn!(%error, "wizard was not submitting");
        }

        SubmissionFailure { message }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("submission abandoned");

            if let Err(error) = self.wizard.submit_failed(SUBMISSION_CANCELLED) {
                warn!(%error, "wizard was not submitting");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use baglan::{
        catalog::ServiceCategory,
        draft::{CustomerField, PaymentMethod, PlateLookup, VehicleField},
        order::{OrderStatus, OrderUpdate, PaymentStatus},
    };
    use jiff::civil::{date, time};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::orders::{CreatedOrder, MockOrdersService, OrderSummary};

    fn filled(orders: Arc<dyn OrdersService>) -> TestResult<OrderWizard> {
        let mut session = OrderWizard::new(
            Catalog::builtin()?,
            orders,
            TimeZone::fixed(jiff::tz::offset(3)),
        );

        for update in [
            DraftUpdate::Customer(CustomerField::Name, "Ayşe Yılmaz".to_string()),
            DraftUpdate::Customer(CustomerField::Phone, "0555 123 45 67".to_string()),
            DraftUpdate::Vehicle(VehicleField::Brand, "Renault".to_string()),
            DraftUpdate::Vehicle(VehicleField::Model, "Clio".to_string()),
            DraftUpdate::Vehicle(VehicleField::Plate, "34 ABC 123".to_string()),
            DraftUpdate::PpfSeries(Some("carat".to_string())),
            DraftUpdate::ToggleService(ServiceCategory::Ppf, "hood".to_string()),
            DraftUpdate::AppointmentDate(date(2026, 10, 20)),
            DraftUpdate::AppointmentTime(time(10, 30, 0, 0)),
            DraftUpdate::PaymentMethod(PaymentMethod::Cash),
        ] {
            session.update(update)?;
        }

        for _ in 0..3 {
            session.advance()?;
        }

        Ok(session)
    }

    #[tokio::test]
    async fn accepted_order_carries_server_id() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .withf(|request| request.total_price == Decimal::from(2500) && request.is_paid)
            .times(1)
            .returning(|_| Ok(CreatedOrder { id: Some("42".to_string()) }));

        let mut session = filled(Arc::new(orders))?;
        let order = session.submit().await?;

        assert_eq!(order.id, OrderId::Server("42".to_string()));
        assert_eq!(order.total_price, Decimal::from(2500));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(session.wizard().phase(), WizardPhase::Succeeded);
        assert!(session.is_finished());

        Ok(())
    }

    #[tokio::test]
    async fn missing_id_gets_placeholder() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .times(1)
            .returning(|_| Ok(CreatedOrder { id: None }));

        let mut session = filled(Arc::new(orders))?;
        let order = session.submit().await?;

        assert!(order.id.is_provisional());

        Ok(())
    }

    #[tokio::test]
    async fn rejection_keeps_draft_and_returns_to_payment() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().times(1).returning(|_| {
            Err(ApiError::Rejected {
                status: 400,
                message: Some("Duplicate plate".to_string()),
            })
        });

        let mut session = filled(Arc::new(orders))?;
        let before = session.draft().clone();

        let failure = session.submit().await.err().ok_or("expected failure")?;

        assert_eq!(failure.message, "Duplicate plate");
        assert_eq!(session.draft(), &before);
        assert_eq!(
            session.wizard().phase(),
            WizardPhase::Editing(WizardStep::Payment)
        );
        assert_eq!(session.wizard().last_failure(), Some("Duplicate plate"));

        session.update(DraftUpdate::Paid(false))?;

        Ok(())
    }

    #[tokio::test]
    async fn incomplete_payment_step_never_calls_backend() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().times(0);

        let mut session = OrderWizard::new(
            Catalog::builtin()?,
            Arc::new(orders),
            TimeZone::UTC,
        );

        let failure = session.submit().await.err().ok_or("expected failure")?;

        assert_eq!(failure.message, WizardError::NotAtPaymentStep.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn edits_after_reaching_payment_are_rechecked_on_submit() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().times(0);

        let mut session = filled(Arc::new(orders))?;

        session.update(DraftUpdate::ToggleService(ServiceCategory::Ppf, "hood".to_string()))?;
        session.update(DraftUpdate::Customer(CustomerField::Name, String::new()))?;

        let failure = session.submit().await.err().ok_or("expected failure")?;

        assert!(failure.message.starts_with("Step 1"));
        assert_eq!(
            session.wizard().phase(),
            WizardPhase::Editing(WizardStep::Payment)
        );

        session.update(DraftUpdate::Customer(CustomerField::Name, "Ayşe Yılmaz".to_string()))?;

        let failure = session.submit().await.err().ok_or("expected failure")?;

        assert!(failure.message.starts_with("Step 2"));

        Ok(())
    }

    struct Stalled;

    #[async_trait]
    impl OrdersService for Stalled {
        async fn create_order(&self, _request: &NewOrderRequest) -> Result<CreatedOrder, ApiError> {
            std::future::pending().await
        }

        async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
            Ok(Vec::new())
        }

        async fn search_plate(&self, _plate: &str) -> Result<Option<PlateLookup>, ApiError> {
            Ok(None)
        }

        async fn update_order(&self, _update: &OrderUpdate) -> Result<(), ApiError> {
            Ok(())
        }

        async fn delete_order(&self, _id: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn abandoned_submission_returns_to_payment() -> TestResult {
        let mut session = filled(Arc::new(Stalled))?;

        tokio::select! {
            biased;
            _ = session.submit() => return Err("stalled submission completed".into()),
            () = std::future::ready(()) => {}
        }

        assert_eq!(
            session.wizard().phase(),
            WizardPhase::Editing(WizardStep::Payment)
        );
        assert_eq!(session.wizard().last_failure(), Some(SUBMISSION_CANCELLED));
        assert!(session.draft().services().is_selected(ServiceCategory::Ppf));

        Ok(())
    }

    #[tokio::test]
    async fn plate_lookup_fills_blanks_only() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_search_plate()
            .withf(|plate| plate == "06 XY 42")
            .times(1)
            .returning(|_| {
                Ok(Some(PlateLookup {
                    customer_name: Some("Ali Kaya".to_string()),
                    phone: Some("0532 000 00 00".to_string()),
                    brand: Some("Fiat".to_string()),
                    model: Some("Egea".to_string()),
                }))
            });

        let mut session = OrderWizard::new(Catalog::builtin()?, Arc::new(orders), TimeZone::UTC);

        session.update(DraftUpdate::Vehicle(VehicleField::Plate, "06 XY 42".to_string()))?;
        session.update(DraftUpdate::Vehicle(VehicleField::Model, "Doblo".to_string()))?;

        assert!(session.prefill_from_plate().await?);
        assert_eq!(session.draft().customer().name, "Ali Kaya");
        assert_eq!(session.draft().vehicle().model, "Doblo");

        Ok(())
    }
}
