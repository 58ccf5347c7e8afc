//! Prelude

pub use crate::{
    catalog::{Catalog, CatalogEntry, CatalogError, EntryKind, ServiceCategory},
    draft::{
        CustomerField, DraftFixture, DraftFixtureError, DraftUpdate, OrderDraft, PaymentMethod,
        PlateLookup, VehicleField,
    },
    gate::{GateError, WizardStep, check_step},
    order::{
        NewOrderRequest, Order, OrderError, OrderId, OrderStatus, OrderUpdate, PaymentStatus,
        SelectedService,
    },
    prices::{Amount, format_whole},
    pricing::{LineItem, LineItems, PricingError, category_total, expand_to_line_items, grand_total},
    receipt::{Receipt, ReceiptError, write_catalog},
    wizard::{Wizard, WizardError, WizardPhase},
};
