//! Service catalog
//!
//! Read-only reference lists of everything the shop sells: wash services, PPF
//! series and the body parts they are applied to, ceramic coatings, window
//! films and the glass they cover. Lookups are by string id and return
//! `Option`, since a draft may still hold ids from an older catalog.

use std::{fmt, fs, io, path::Path};

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::prices::{Amount, PriceError};

pub mod fixtures;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/default.yml");

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Prices in one catalog use different currencies
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The same id appears twice in one list
    #[error("Duplicate {list} id: {id}")]
    DuplicateId {
        /// Name of the list
        list: &'static str,
        /// The repeated id
        id: String,
    },
}

/// Service categories, in the order they appear on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    /// Washing and cleaning
    #[serde(rename = "Yıkama")]
    Wash,

    /// Paint protection film
    #[serde(rename = "PPF")]
    Ppf,

    /// Ceramic coating
    #[serde(rename = "Seramik")]
    Ceramic,

    /// Window film
    #[serde(rename = "Cam Filmi")]
    WindowFilm,
}

impl ServiceCategory {
    /// Every category, in line item order.
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Wash,
        ServiceCategory::Ppf,
        ServiceCategory::Ceramic,
        ServiceCategory::WindowFilm,
    ];

    /// Label used by the backend and on receipts.
    pub fn label(self) -> &'static str {
        match self {
            ServiceCategory::Wash => "Yıkama",
            ServiceCategory::Ppf => "PPF",
            ServiceCategory::Ceramic => "Seramik",
            ServiceCategory::WindowFilm => "Cam Filmi",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything stored in a [`Listing`].
pub trait Listed {
    /// Catalog id
    fn id(&self) -> &str;
}

/// Wash or cleaning service
#[derive(Debug, Clone, PartialEq)]
pub struct WashService {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Service price
    pub price: Amount,
}

/// PPF film series
#[derive(Debug, Clone, PartialEq)]
pub struct PpfSeries {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Available film thicknesses, in microns
    pub microns: SmallVec<[u16; 4]>,

    /// Starting price shown to customers. Orders are charged per part.
    pub base_price: Amount,
}

/// Vehicle body part, priced for film or coating application
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePart {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Application price for this part
    pub price: Amount,
}

/// Ceramic coating product
#[derive(Debug, Clone, PartialEq)]
pub struct CeramicProduct {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Warranty period label, e.g. "3 Yıl"
    pub duration: String,

    /// Whole-vehicle price
    pub price: Amount,
}

/// Window film product
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFilmProduct {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,
}

/// Window glass area, priced for film application
#[derive(Debug, Clone, PartialEq)]
pub struct WindowGlassPart {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Application price
    pub price: Amount,
}

macro_rules! impl_listed {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Listed for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )+
    };
}

impl_listed!(
    WashService,
    PpfSeries,
    VehiclePart,
    CeramicProduct,
    WindowFilmProduct,
    WindowGlassPart,
);

/// Ordered list of catalog entries with an id index.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    entries: Vec<T>,
    index: FxHashMap<String, usize>,
}

impl<T: Listed> Listing<T> {
    /// Append an entry, rejecting duplicate ids.
    pub(crate) fn push(&mut self, list: &'static str, entry: T) -> Result<(), CatalogError> {
        let id = entry.id().to_string();

        if self.index.contains_key(&id) {
            return Err(CatalogError::DuplicateId { list, id });
        }

        self.index.insert(id, self.entries.len());
        self.entries.push(entry);

        Ok(())
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).and_then(|&idx| self.entries.get(idx))
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<'a, T: Listed> IntoIterator for &'a Listing<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// What kind of purchasable unit a [`CatalogEntry`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Wash service
    Service,
    /// PPF series
    Series,
    /// Vehicle body part
    BodyPart,
    /// Ceramic or window film product
    Product,
    /// Window glass area
    GlassPart,
}

/// Flattened, read-only view of one catalog row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry<'a> {
    /// Catalog id
    pub id: &'a str,

    /// Display name
    pub name: &'a str,

    /// Unit price; `None` for products priced by their parts
    pub price: Option<Amount>,

    /// Category the entry belongs to
    pub category: ServiceCategory,

    /// Entry kind
    pub kind: EntryKind,
}

/// The shop catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: &'static Currency,
    ceramic_part_rate: Percentage,
    wash_services: Listing<WashService>,
    ppf_series: Listing<PpfSeries>,
    vehicle_parts: Listing<VehiclePart>,
    ceramic_products: Listing<CeramicProduct>,
    window_films: Listing<WindowFilmProduct>,
    window_glass_parts: Listing<WindowGlassPart>,
}

impl Catalog {
    /// The catalog shipped with the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded catalog is invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price or percentage is
    /// invalid, currencies are mixed or an id is repeated.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: fixtures::CatalogFixture = serde_norway::from_str(yaml)?;

        fixture.try_into()
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Currency of every price in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Fraction of a body part's price charged for per-part ceramic coating.
    pub fn ceramic_part_rate(&self) -> Percentage {
        self.ceramic_part_rate
    }

    /// Wash services
    pub fn wash_services(&self) -> &Listing<WashService> {
        &self.wash_services
    }

    /// PPF series
    pub fn ppf_series_list(&self) -> &Listing<PpfSeries> {
        &self.ppf_series
    }

    /// Vehicle body parts
    pub fn vehicle_parts(&self) -> &Listing<VehiclePart> {
        &self.vehicle_parts
    }

    /// Ceramic products
    pub fn ceramic_products(&self) -> &Listing<CeramicProduct> {
        &self.ceramic_products
    }

    /// Window film products
    pub fn window_films(&self) -> &Listing<WindowFilmProduct> {
        &self.window_films
    }

    /// Window glass parts
    pub fn window_glass_parts(&self) -> &Listing<WindowGlassPart> {
        &self.window_glass_parts
    }

    /// Look up a wash service.
    pub fn wash_service(&self, id: &str) -> Option<&WashService> {
        self.wash_services.get(id)
    }

    /// Look up a PPF series.
    pub fn ppf_series(&self, id: &str) -> Option<&PpfSeries> {
        self.ppf_series.get(id)
    }

    /// Look up a vehicle body part.
    pub fn vehicle_part(&self, id: &str) -> Option<&VehiclePart> {
        self.vehicle_parts.get(id)
    }

    /// Look up a ceramic product.
    pub fn ceramic_product(&self, id: &str) -> Option<&CeramicProduct> {
        self.ceramic_products.get(id)
    }

    /// Look up a window film product.
    pub fn window_film(&self, id: &str) -> Option<&WindowFilmProduct> {
        self.window_films.get(id)
    }

    /// Look up a window glass part.
    pub fn window_glass_part(&self, id: &str) -> Option<&WindowGlassPart> {
        self.window_glass_parts.get(id)
    }

    /// Every purchasable unit as a flat list, grouped by category.
    pub fn entries(&self) -> Vec<CatalogEntry<'_>> {
        let wash = self.wash_services.iter().map(|s| CatalogEntry {
            id: &s.id,
            name: &s.name,
            price: Some(s.price),
            category: ServiceCategory::Wash,
            kind: EntryKind::Service,
        });

        let series = self.ppf_series.iter().map(|s| CatalogEntry {
            id: &s.id,
            name: &s.name,
            price: Some(s.base_price),
            category: ServiceCategory::Ppf,
            kind: EntryKind::Series,
        });

        let parts = self.vehicle_parts.iter().map(|p| CatalogEntry {
            id: &p.id,
            name: &p.name,
            price: Some(p.price),
            category: ServiceCategory::Ppf,
            kind: EntryKind::BodyPart,
        });

        let ceramic = self.ceramic_products.iter().map(|p| CatalogEntry {
            id: &p.id,
            name: &p.name,
            price: Some(p.price),
            category: ServiceCategory::Ceramic,
            kind: EntryKind::Product,
        });

        let films = self.window_films.iter().map(|p| CatalogEntry {
            id: &p.id,
            name: &p.name,
            price: None,
            category: ServiceCategory::WindowFilm,
            kind: EntryKind::Product,
        });

        let glass = self.window_glass_parts.iter().map(|p| CatalogEntry {
            id: &p.id,
            name: &p.name,
            price: Some(p.price),
            category: ServiceCategory::WindowFilm,
            kind: EntryKind::GlassPart,
        });

        wash.chain(series)
            .chain(parts)
            .chain(ceramic)
            .chain(films)
            .chain(glass)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::TRY};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn builtin_catalog_loads() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.currency(), TRY);
        assert_eq!(catalog.wash_services().len(), 3);
        assert_eq!(catalog.ppf_series_list().len(), 2);
        assert_eq!(catalog.ceramic_products().len(), 2);
        assert_eq!(catalog.window_films().len(), 1);

        Ok(())
    }

    #[test]
    fn builtin_catalog_prices_match_shop_list() -> TestResult {
        let catalog = Catalog::builtin()?;

        let wash = catalog.wash_service("standard-wash").ok_or("missing wash")?;
        let hood = catalog.vehicle_part("hood").ok_or("missing hood")?;
        let carat = catalog.ppf_series("carat").ok_or("missing carat")?;

        assert_eq!(wash.price, Money::from_minor(40_000, TRY));
        assert_eq!(hood.price, Money::from_minor(250_000, TRY));
        assert_eq!(carat.microns.as_slice(), &[150, 180]);

        Ok(())
    }

    #[test]
    fn unknown_ids_are_none() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert!(catalog.wash_service("nope").is_none());
        assert!(catalog.vehicle_part("nope").is_none());
        assert!(catalog.window_glass_part("nope").is_none());

        Ok(())
    }

    #[test]
    fn listing_rejects_duplicate_ids() -> TestResult {
        let mut listing = Listing::default();

        listing.push(
            "wash",
            WashService {
                id: "a".to_string(),
                name: "A".to_string(),
                price: Money::from_minor(100, TRY),
            },
        )?;

        let result = listing.push(
            "wash",
            WashService {
                id: "a".to_string(),
                name: "A again".to_string(),
                price: Money::from_minor(200, TRY),
            },
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateId { list: "wash", id }) if id == "a"
        ));

        Ok(())
    }

    #[test]
    fn entries_cover_every_list_in_category_order() -> TestResult {
        let catalog = Catalog::builtin()?;
        let entries = catalog.entries();

        let expected = catalog.wash_services().len()
            + catalog.ppf_series_list().len()
            + catalog.vehicle_parts().len()
            + catalog.ceramic_products().len()
            + catalog.window_films().len()
            + catalog.window_glass_parts().len();

        assert_eq!(entries.len(), expected);
        assert_eq!(
            entries.first().map(|e| e.category),
            Some(ServiceCategory::Wash)
        );
        assert_eq!(
            entries.last().map(|e| e.kind),
            Some(EntryKind::GlassPart)
        );

        let film = entries
            .iter()
            .find(|e| e.id == "rayblock")
            .ok_or("missing film")?;

        assert_eq!(film.price, None);

        Ok(())
    }

    #[test]
    fn category_labels_match_backend() {
        let labels: Vec<_> = ServiceCategory::ALL.iter().map(|c| c.label()).collect();

        assert_eq!(labels, ["Yıkama", "PPF", "Seramik", "Cam Filmi"]);
        assert_eq!(ServiceCategory::WindowFilm.to_string(), "Cam Filmi");
    }
}
