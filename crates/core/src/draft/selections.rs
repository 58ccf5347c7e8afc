//! Per-category service selections
//!
//! One type per category, each carrying only what that category needs. Whether
//! a category counts towards the order is derived from its state, never stored.

use smallvec::SmallVec;

use crate::catalog::ServiceCategory;

/// Ordered set of chosen catalog ids, in the order they were chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChosenSet {
    ids: SmallVec<[String; 4]>,
}

impl ChosenSet {
    /// Add `id` if absent, remove it if present. Returns whether it is now chosen.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|chosen| chosen == id) {
            self.ids.remove(pos);

            false
        } else {
            self.ids.push(id.to_string());

            true
        }
    }

    /// Whether `id` is chosen.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|chosen| chosen == id)
    }

    /// Chosen ids in selection order.
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Iterate chosen ids.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of chosen ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is chosen.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Wash services chosen for the order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WashSelection {
    services: ChosenSet,
}

impl WashSelection {
    /// Chosen wash service ids.
    pub fn services(&self) -> &ChosenSet {
        &self.services
    }

    /// At least one service is chosen.
    pub fn is_selected(&self) -> bool {
        !self.services.is_empty()
    }

    pub(crate) fn toggle(&mut self, service_id: &str) -> bool {
        self.services.toggle(service_id)
    }
}

/// PPF series, thickness and body parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PpfSelection {
    series: Option<String>,
    micron: Option<u16>,
    parts: ChosenSet,
}

impl PpfSelection {
    /// Chosen series id.
    pub fn series(&self) -> Option<&str> {
        self.series.as_deref()
    }

    /// Chosen film thickness.
    pub fn micron(&self) -> Option<u16> {
        self.micron
    }

    /// Chosen vehicle part ids.
    pub fn parts(&self) -> &ChosenSet {
        &self.parts
    }

    /// At least one part is chosen.
    pub fn is_selected(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Switching to a different series drops the micron and parts chosen for
    /// the previous one.
    pub(crate) fn set_series(&mut self, series_id: Option<&str>) {
        if self.series.as_deref() == series_id {
            return;
        }

        self.series = series_id.map(str::to_string);
        self.micron = None;
        self.parts.clear();
    }

    pub(crate) fn set_micron(&mut self, micron: Option<u16>) {
        self.micron = micron;
    }

    pub(crate) fn toggle(&mut self, part_id: &str) -> bool {
        self.parts.toggle(part_id)
    }
}

/// Ceramic product, optionally restricted to some body parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CeramicSelection {
    product: Option<String>,
    parts: ChosenSet,
}

impl CeramicSelection {
    /// Chosen product id.
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// Body parts for per-part coating; empty means the whole vehicle.
    pub fn parts(&self) -> &ChosenSet {
        &self.parts
    }

    /// Priced per part rather than as a whole vehicle.
    pub fn is_per_part(&self) -> bool {
        !self.parts.is_empty()
    }

    /// A product is chosen.
    pub fn is_selected(&self) -> bool {
        self.product.is_some()
    }

    pub(crate) fn set_product(&mut self, product_id: Option<&str>) {
        if product_id.is_none() {
            self.parts.clear();
        }

        self.product = product_id.map(str::to_string);
    }

    pub(crate) fn toggle(&mut self, part_id: &str) -> bool {
        self.parts.toggle(part_id)
    }
}

/// Window film product and glass areas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFilmSelection {
    product: Option<String>,
    parts: ChosenSet,
}

impl WindowFilmSelection {
    /// Chosen film id.
    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// Chosen glass part ids.
    pub fn parts(&self) -> &ChosenSet {
        &self.parts
    }

    /// At least one glass part is chosen.
    pub fn is_selected(&self) -> bool {
        !self.parts.is_empty()
    }

    pub(crate) fn set_product(&mut self, product_id: Option<&str>) {
        if product_id.is_none() {
            self.parts.clear();
        }

        self.product = product_id.map(str::to_string);
    }

    pub(crate) fn toggle(&mut self, part_id: &str) -> bool {
        self.parts.toggle(part_id)
    }
}

/// Selections for all four categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelections {
    /// Wash
    pub(crate) wash: WashSelection,
    /// PPF
    pub(crate) ppf: PpfSelection,
    /// Ceramic
    pub(crate) ceramic: CeramicSelection,
    /// Window film
    pub(crate) window_film: WindowFilmSelection,
}

impl ServiceSelections {
    /// Wash selection
    pub fn wash(&self) -> &WashSelection {
        &self.wash
    }

    /// PPF selection
    pub fn ppf(&self) -> &PpfSelection {
        &self.ppf
    }

    /// Ceramic selection
    pub fn ceramic(&self) -> &CeramicSelection {
        &self.ceramic
    }

    /// Window film selection
    pub fn window_film(&self) -> &WindowFilmSelection {
        &self.window_film
    }

    /// Whether `category` counts towards the order.
    pub fn is_selected(&self, category: ServiceCategory) -> bool {
        match category {
            ServiceCategory::Wash => self.wash.is_selected(),
            ServiceCategory::Ppf => self.ppf.is_selected(),
            ServiceCategory::Ceramic => self.ceramic.is_selected(),
            ServiceCategory::WindowFilm => self.window_film.is_selected(),
        }
    }

    /// No category is selected.
    pub fn is_empty(&self) -> bool {
        !ServiceCategory::ALL
            .iter()
            .any(|&category| self.is_selected(category))
    }

    pub(crate) fn toggle(&mut self, category: ServiceCategory, item_id: &str) -> bool {
        match category {
            ServiceCategory::Wash => self.wash.toggle(item_id),
            ServiceCategory::Ppf => self.ppf.toggle(item_id),
            ServiceCategory::Ceramic => self.ceramic.toggle(item_id),
            ServiceCategory::WindowFilm => self.window_film.toggle(item_id),
        }
    }
}
