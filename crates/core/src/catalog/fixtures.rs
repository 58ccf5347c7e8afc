//! Catalog Fixtures
//!
//! YAML shape of a catalog file and its conversion into a [`Catalog`].

use decimal_percentage::Percentage;
use rusty_money::{
    Money,
    iso::{Currency, TRY},
};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    catalog::{
        Catalog, CatalogError, CeramicProduct, Listing, PpfSeries, VehiclePart, WashService,
        WindowFilmProduct, WindowGlassPart,
    },
    prices::{Amount, parse_price},
};

const DEFAULT_CERAMIC_PART_RATE: f64 = 0.5;

/// Catalog file
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFixture {
    /// Wash services
    #[serde(default)]
    pub wash: Vec<PricedFixture>,

    /// PPF series and body parts
    #[serde(default)]
    pub ppf: PpfFixture,

    /// Ceramic products
    #[serde(default)]
    pub ceramic: CeramicFixture,

    /// Window films and glass parts
    #[serde(default)]
    pub window_film: WindowFilmFixture,
}

/// Entry with an id, a name and a price (e.g. "400 TRY")
#[derive(Debug, Deserialize)]
pub struct PricedFixture {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Price string
    pub price: String,
}

/// PPF section
#[derive(Debug, Default, Deserialize)]
pub struct PpfFixture {
    /// Film series
    #[serde(default)]
    pub series: Vec<PpfSeriesFixture>,

    /// Body parts
    #[serde(default)]
    pub parts: Vec<PricedFixture>,
}

/// PPF series entry
#[derive(Debug, Deserialize)]
pub struct PpfSeriesFixture {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Available thicknesses
    #[serde(default)]
    pub microns: Vec<u16>,

    /// Starting price string
    pub base_price: String,
}

/// Ceramic section
#[derive(Debug, Default, Deserialize)]
pub struct CeramicFixture {
    /// Per-part rate, "50%" or "0.5"
    pub part_rate: Option<String>,

    /// Products
    #[serde(default)]
    pub products: Vec<CeramicProductFixture>,
}

/// Ceramic product entry
#[derive(Debug, Deserialize)]
pub struct CeramicProductFixture {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,

    /// Warranty label
    #[serde(default)]
    pub duration: String,

    /// Whole-vehicle price string
    pub price: String,
}

/// Window film section
#[derive(Debug, Default, Deserialize)]
pub struct WindowFilmFixture {
    /// Film products
    #[serde(default)]
    pub products: Vec<NamedFixture>,

    /// Glass areas
    #[serde(default)]
    pub glass_parts: Vec<PricedFixture>,
}

/// Entry with only an id and a name
#[derive(Debug, Deserialize)]
pub struct NamedFixture {
    /// Catalog id
    pub id: String,

    /// Display name
    pub name: String,
}

/// Parses prices while checking that they all share one currency.
#[derive(Debug, Default)]
struct PriceReader {
    currency: Option<&'static Currency>,
}

impl PriceReader {
    fn read(&mut self, price: &str) -> Result<Amount, CatalogError> {
        let (minor_units, currency) = parse_price(price)?;

        match self.currency {
            Some(existing) if existing != currency => {
                return Err(CatalogError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
            Some(_) => {}
            None => self.currency = Some(currency),
        }

        Ok(Money::from_minor(minor_units, currency))
    }
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = CatalogError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let mut prices = PriceReader::default();

        let mut wash_services = Listing::default();
        for entry in fixture.wash {
            let price = prices.read(&entry.price)?;

            wash_services.push(
                "wash",
                WashService {
                    id: entry.id,
                    name: entry.name,
                    price,
                },
            )?;
        }

        let mut ppf_series = Listing::default();
        for entry in fixture.ppf.series {
            let base_price = prices.read(&entry.base_price)?;

            ppf_series.push(
                "ppf series",
                PpfSeries {
                    id: entry.id,
                    name: entry.name,
                    microns: SmallVec::from_vec(entry.microns),
                    base_price,
                },
            )?;
        }

        let mut vehicle_parts = Listing::default();
        for entry in fixture.ppf.parts {
            let price = prices.read(&entry.price)?;

            vehicle_parts.push(
                "vehicle part",
                VehiclePart {
                    id: entry.id,
                    name: entry.name,
                    price,
                },
            )?;
        }

        let mut ceramic_products = Listing::default();
        for entry in fixture.ceramic.products {
            let price = prices.read(&entry.price)?;

            ceramic_products.push(
                "ceramic product",
                CeramicProduct {
                    id: entry.id,
                    name: entry.name,
                    duration: entry.duration,
                    price,
                },
            )?;
        }

        let mut window_films = Listing::default();
        for entry in fixture.window_film.products {
            window_films.push(
                "window film",
                WindowFilmProduct {
                    id: entry.id,
                    name: entry.name,
                },
            )?;
        }

        let mut window_glass_parts = Listing::default();
        for entry in fixture.window_film.glass_parts {
            let price = prices.read(&entry.price)?;

            window_glass_parts.push(
                "window glass part",
                WindowGlassPart {
                    id: entry.id,
                    name: entry.name,
                    price,
                },
            )?;
        }

        let ceramic_part_rate = fixture
            .ceramic
            .part_rate
            .as_deref()
            .map_or(Ok(Percentage::from(DEFAULT_CERAMIC_PART_RATE)), parse_percentage)?;

        Ok(Catalog {
            currency: prices.currency.unwrap_or(TRY),
            ceramic_part_rate,
            wash_services,
            ppf_series,
            vehicle_parts,
            ceramic_products,
            window_films,
            window_glass_parts,
        })
    }
}

/// Parse a percentage string (`"50%"` or `"0.5"`) into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string is not a number or is outside `0..=100%`.
pub fn parse_percentage(s: &str) -> Result<Percentage, CatalogError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0)
            .map_err(|_err| CatalogError::InvalidPercentage(s.to_string()))?
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_err| CatalogError::InvalidPercentage(s.to_string()))?
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(CatalogError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}
