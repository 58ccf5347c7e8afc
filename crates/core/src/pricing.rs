//! Pricing
//!
//! Turns a draft's selections into priced line items. Category totals and the
//! grand total are sums over the same expansion, so the total sent with an
//! order always equals the sum of its line items. Ids missing from the catalog
//! are skipped rather than reported.

use rusty_money::iso::Currency;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, ServiceCategory},
    discounts::{DiscountError, rated_price},
    draft::{
        CeramicSelection, OrderDraft, PpfSelection, ServiceSelections, WashSelection,
        WindowFilmSelection,
    },
    prices::{Amount, PriceError, total_price},
};

/// Part label for a service applied to the whole vehicle
pub const WHOLE_PACKAGE: &str = "Tam Paket";

/// Part label for whole-vehicle ceramic coating
pub const WHOLE_VEHICLE: &str = "Tüm Araç";

/// Errors that can occur while pricing a draft.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Wrapped percentage error.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// One priced (category, product, part) row of an order
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Service category
    pub category: ServiceCategory,

    /// Product or service name
    pub product: String,

    /// Variant, e.g. film thickness or warranty period; may be empty
    pub spec: String,

    /// Body part or glass area, or [`WHOLE_PACKAGE`]
    pub part: String,

    /// Price resolved from the catalog
    pub price: Amount,
}

/// Human-readable description of one selected category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Category described
    pub category: ServiceCategory,

    /// Summary text, e.g. "PPF OLEX Carat Series (1 Parça)"
    pub text: String,
}

/// Expanded line items of a draft, in category order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItems {
    currency: &'static Currency,
    items: Vec<LineItem>,
    summaries: SmallVec<[CategorySummary; 4]>,
}

impl LineItems {
    fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            items: Vec::new(),
            summaries: SmallVec::new(),
        }
    }

    /// Line items
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// One summary per category that produced items.
    pub fn summaries(&self) -> &[CategorySummary] {
        &self.summaries
    }

    /// Summary texts joined with ", ".
    pub fn summary_text(&self) -> String {
        self.summaries
            .iter()
            .map(|summary| summary.text.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Currency of every price.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Whether no line items were produced.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of every line item price.
    ///
    /// # Errors
    ///
    /// Returns an error if the sum overflows.
    pub fn total(&self) -> Result<Amount, PricingError> {
        Ok(total_price(
            self.currency,
            self.items.iter().map(|item| item.price),
        )?)
    }

    /// Sum of the line item prices in `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sum overflows.
    pub fn category_total(&self, category: ServiceCategory) -> Result<Amount, PricingError> {
        Ok(total_price(
            self.currency,
            self.items
                .iter()
                .filter(|item| item.category == category)
                .map(|item| item.price),
        )?)
    }

    fn push(&mut self, category: ServiceCategory, product: &str, spec: &str, part: &str, price: Amount) {
        self.items.push(LineItem {
            category,
            product: product.to_string(),
            spec: spec.to_string(),
            part: part.to_string(),
            price,
        });
    }

    fn summarise(&mut self, category: ServiceCategory, text: String) {
        self.summaries.push(CategorySummary { category, text });
    }

    fn expand(
        &mut self,
        services: &ServiceSelections,
        category: ServiceCategory,
        catalog: &Catalog,
    ) -> Result<(), PricingError> {
        if !services.is_selected(category) {
            return Ok(());
        }

        match category {
            ServiceCategory::Wash => self.expand_wash(services.wash(), catalog),
            ServiceCategory::Ppf => self.expand_ppf(services.ppf(), catalog),
            ServiceCategory::Ceramic => self.expand_ceramic(services.ceramic(), catalog)?,
            ServiceCategory::WindowFilm => self.expand_window_film(services.window_film(), catalog),
        }

        Ok(())
    }

    fn expand_wash(&mut self, wash: &WashSelection, catalog: &Catalog) {
        let mut names = Vec::new();

        for service in wash.services().iter().filter_map(|id| catalog.wash_service(id)) {
            self.push(ServiceCategory::Wash, &service.name, "", WHOLE_PACKAGE, service.price);
            names.push(service.name.as_str());
        }

        for name in names {
            self.summarise(ServiceCategory::Wash, name.to_string());
        }
    }

    fn expand_ppf(&mut self, ppf: &PpfSelection, catalog: &Catalog) {
        let Some(series) = ppf.series().and_then(|id| catalog.ppf_series(id)) else {
            return;
        };

        let spec = ppf.micron().map(|micron| format!("{micron}μ")).unwrap_or_default();
        let mut count = 0;

        for part in ppf.parts().iter().filter_map(|id| catalog.vehicle_part(id)) {
            self.push(ServiceCategory::Ppf, &series.name, &spec, &part.name, part.price);
            count += 1;
        }

        if count > 0 {
            self.summarise(
                ServiceCategory::Ppf,
                format!("PPF {} ({count} Parça)", series.name),
            );
        }
    }

    fn expand_ceramic(
        &mut self,
        ceramic: &CeramicSelection,
        catalog: &Catalog,
    ) -> Result<(), PricingError> {
        let Some(product) = ceramic.product().and_then(|id| catalog.ceramic_product(id)) else {
            return Ok(());
        };

        if ceramic.is_per_part() {
            let rate = catalog.ceramic_part_rate();
            let mut count = 0;

            for part in ceramic.parts().iter().filter_map(|id| catalog.vehicle_part(id)) {
                let price = rated_price(&part.price, &rate)?;

                self.push(
                    ServiceCategory::Ceramic,
                    &product.name,
                    &product.duration,
                    &part.name,
                    price,
                );
                count += 1;
            }

            if count == 0 {
                return Ok(());
            }
        } else {
            self.push(
                ServiceCategory::Ceramic,
                &product.name,
                &product.duration,
                WHOLE_VEHICLE,
                product.price,
            );
        }

        self.summarise(ServiceCategory::Ceramic, product.name.clone());

        Ok(())
    }

    fn expand_window_film(&mut self, film: &WindowFilmSelection, catalog: &Catalog) {
        let Some(product) = film.product().and_then(|id| catalog.window_film(id)) else {
            return;
        };

        let mut count = 0;

        for glass in film.parts().iter().filter_map(|id| catalog.window_glass_part(id)) {
            self.push(ServiceCategory::WindowFilm, &product.name, "", &glass.name, glass.price);
            count += 1;
        }

        if count > 0 {
            self.summarise(
                ServiceCategory::WindowFilm,
                format!("Cam Filmi {} ({count} Cam)", product.name),
            );
        }
    }
}

/// Expand every selected category of `draft` into priced line items.
///
/// # Errors
///
/// Returns an error if a per-part ceramic price cannot be computed.
pub fn expand_to_line_items(draft: &OrderDraft, catalog: &Catalog) -> Result<LineItems, PricingError> {
    let mut line_items = LineItems::new(catalog.currency());

    for category in ServiceCategory::ALL {
        line_items.expand(draft.services(), category, catalog)?;
    }

    Ok(line_items)
}

/// Price of one category of `draft`; zero when the category is not selected.
///
/// # Errors
///
/// Returns an error if a per-part ceramic price cannot be computed or the sum
/// overflows.
pub fn category_total(
    draft: &OrderDraft,
    category: ServiceCategory,
    catalog: &Catalog,
) -> Result<Amount, PricingError> {
    let mut line_items = LineItems::new(catalog.currency());

    line_items.expand(draft.services(), category, catalog)?;

    line_items.total()
}

/// Price of every selected category of `draft`; zero when nothing is selected.
///
/// # Errors
///
/// Returns an error if a per-part ceramic price cannot be computed or the sum
/// overflows.
pub fn grand_total(draft: &OrderDraft, catalog: &Catalog) -> Result<Amount, PricingError> {
    expand_to_line_items(draft, catalog)?.total()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::TRY};
    use testresult::TestResult;

    use super::*;
    use crate::prices::zero;

    fn lira(amount: i64) -> Amount {
        Money::from_minor(amount * 100, TRY)
    }

    #[test]
    fn empty_draft_totals_zero() -> TestResult {
        let catalog = Catalog::builtin()?;
        let draft = OrderDraft::new();

        assert_eq!(grand_total(&draft, &catalog)?, zero(TRY));
        assert!(expand_to_line_items(&draft, &catalog)?.is_empty());

        for category in ServiceCategory::ALL {
            assert_eq!(category_total(&draft, category, &catalog)?, zero(TRY));
        }

        Ok(())
    }

    #[test]
    fn wash_then_ppf_then_deselect_wash() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        assert_eq!(grand_total(&draft, &catalog)?, lira(400));

        draft.set_ppf_series(Some("carat"));
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");
        assert_eq!(grand_total(&draft, &catalog)?, lira(2_900));

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        assert_eq!(grand_total(&draft, &catalog)?, lira(2_500));
        assert_eq!(category_total(&draft, ServiceCategory::Ppf, &catalog)?, lira(2_500));

        Ok(())
    }

    #[test]
    fn ppf_series_and_micron_add_nothing() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.set_ppf_series(Some("platinum"));
        draft.set_ppf_micron(Some(250));
        assert_eq!(grand_total(&draft, &catalog)?, zero(TRY));

        draft.toggle_service_item(ServiceCategory::Ppf, "hood");
        draft.toggle_service_item(ServiceCategory::Ppf, "roof");

        let line_items = expand_to_line_items(&draft, &catalog)?;

        assert_eq!(line_items.total()?, lira(4_500));
        assert_eq!(line_items.len(), 2);

        let first = line_items.items().first().ok_or("missing item")?;

        assert_eq!(first.product, "OLEX Platinum Series");
        assert_eq!(first.spec, "250μ");
        assert_eq!(first.part, "Kaput");

        Ok(())
    }

    #[test]
    fn ceramic_whole_vehicle_uses_flat_price() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.set_ceramic_product(Some("premium"));

        let line_items = expand_to_line_items(&draft, &catalog)?;
        let item = line_items.items().first().ok_or("missing item")?;

        assert_eq!(item.part, WHOLE_VEHICLE);
        assert_eq!(item.spec, "3 Yıl");
        assert_eq!(line_items.total()?, lira(8_000));

        Ok(())
    }

    #[test]
    fn ceramic_per_part_charges_half_of_each_part() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.set_ceramic_product(Some("standard"));
        draft.toggle_service_item(ServiceCategory::Ceramic, "hood");
        draft.toggle_service_item(ServiceCategory::Ceramic, "mirrors");

        assert_eq!(
            category_total(&draft, ServiceCategory::Ceramic, &catalog)?,
            lira(1_250 + 250)
        );

        Ok(())
    }

    #[test]
    fn ceramic_parts_without_product_contribute_nothing() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Ceramic, "hood");

        assert_eq!(grand_total(&draft, &catalog)?, zero(TRY));

        Ok(())
    }

    #[test]
    fn window_film_needs_product_and_glass() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::WindowFilm, "windshield");
        assert_eq!(grand_total(&draft, &catalog)?, zero(TRY));

        draft.set_window_film_product(Some("rayblock"));
        draft.toggle_service_item(ServiceCategory::WindowFilm, "sunroof");

        let line_items = expand_to_line_items(&draft, &catalog)?;

        assert_eq!(line_items.total()?, lira(3_000));
        assert_eq!(line_items.summary_text(), "Cam Filmi OLEX Rayblock (2 Cam)");

        Ok(())
    }

    #[test]
    fn stale_ids_are_skipped() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "discontinued-wash");
        draft.toggle_service_item(ServiceCategory::Wash, "engine-wash");
        draft.set_ppf_series(Some("retired-series"));
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");

        let line_items = expand_to_line_items(&draft, &catalog)?;

        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items.total()?, lira(600));

        Ok(())
    }

    #[test]
    fn ceramic_with_only_stale_parts_is_not_priced_whole() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.set_ceramic_product(Some("premium"));
        draft.toggle_service_item(ServiceCategory::Ceramic, "retired-part");

        let line_items = expand_to_line_items(&draft, &catalog)?;

        assert!(line_items.is_empty());
        assert_eq!(grand_total(&draft, &catalog)?, zero(TRY));

        Ok(())
    }

    #[test]
    fn line_items_follow_category_then_selection_order() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.set_window_film_product(Some("rayblock"));
        draft.toggle_service_item(ServiceCategory::WindowFilm, "rear-window");
        draft.set_ppf_series(Some("carat"));
        draft.toggle_service_item(ServiceCategory::Ppf, "roof");
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");
        draft.toggle_service_item(ServiceCategory::Wash, "engine-wash");

        let line_items = expand_to_line_items(&draft, &catalog)?;
        let parts: Vec<_> = line_items
            .items()
            .iter()
            .map(|item| (item.category, item.part.as_str()))
            .collect();

        assert_eq!(
            parts,
            [
                (ServiceCategory::Wash, WHOLE_PACKAGE),
                (ServiceCategory::Ppf, "Tavan"),
                (ServiceCategory::Ppf, "Kaput"),
                (ServiceCategory::WindowFilm, "Arka Cam"),
            ]
        );

        Ok(())
    }

    #[test]
    fn grand_total_equals_sum_of_category_totals_and_items() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.toggle_service_item(ServiceCategory::Wash, "detailed-cleaning");
        draft.set_ppf_series(Some("platinum"));
        draft.toggle_service_item(ServiceCategory::Ppf, "front-bumper");
        draft.set_ceramic_product(Some("premium"));
        draft.toggle_service_item(ServiceCategory::Ceramic, "roof");
        draft.set_window_film_product(Some("rayblock"));
        draft.toggle_service_item(ServiceCategory::WindowFilm, "side-windows");

        let line_items = expand_to_line_items(&draft, &catalog)?;
        let by_category = total_price(
            TRY,
            ServiceCategory::ALL
                .iter()
                .map(|&category| category_total(&draft, category, &catalog))
                .collect::<Result<Vec<_>, _>>()?,
        )?;

        assert_eq!(grand_total(&draft, &catalog)?, line_items.total()?);
        assert_eq!(by_category, line_items.total()?);
        assert_eq!(line_items.total()?, lira(400 + 1_500 + 1_500 + 1_000 + 3_000));

        Ok(())
    }

    #[test]
    fn pricing_is_idempotent() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");

        assert_eq!(
            expand_to_line_items(&draft, &catalog)?,
            expand_to_line_items(&draft, &catalog)?
        );

        Ok(())
    }

    #[test]
    fn summaries_describe_each_category() -> TestResult {
        let catalog = Catalog::builtin()?;
        let mut draft = OrderDraft::new();

        draft.toggle_service_item(ServiceCategory::Wash, "standard-wash");
        draft.set_ppf_series(Some("carat"));
        draft.toggle_service_item(ServiceCategory::Ppf, "hood");
        draft.set_ceramic_product(Some("premium"));

        let line_items = expand_to_line_items(&draft, &catalog)?;

        assert_eq!(
            line_items.summary_text(),
            "Standart Yıkama, PPF OLEX Carat Series (1 Parça), Premium Seramik"
        );

        Ok(())
    }
}
