//! Price computation for selections and predefined bundles.
//!
//! The engine is a pure function of its inputs: the catalog, the selection
//! or bundle, and the client type. It is cheap enough to re-run in full on
//! every mutation, which is exactly how the wizard drives it.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{Bundle, BundleKind, Catalog, ClientType, PackageId, TechnologyId, TierId};
use crate::selection::Selection;

/// Computed price for the current configuration. `one_time` and `monthly`
/// are `None` while the configuration is incomplete, when a consultation is
/// required, or (for `monthly`) when no recurring fee applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub one_time: Option<Decimal>,
    pub monthly: Option<Decimal>,
    pub needs_consultation: bool,
}

impl PriceQuote {
    fn not_ready() -> Self {
        Self::default()
    }

    fn consultation() -> Self {
        Self { one_time: None, monthly: None, needs_consultation: true }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum PriceInput<'a> {
    Selection(&'a Selection),
    Bundle(&'a Bundle),
}

/// Compute the one-time and monthly totals after discount.
///
/// The discount is applied to the already-summed totals, and each total is
/// rounded exactly once, half-up, to whole currency units. Summing first
/// keeps the rounding reproducible.
pub fn compute_price(catalog: &Catalog, input: PriceInput<'_>, client_type: ClientType) -> PriceQuote {
    match input {
        PriceInput::Bundle(bundle) => match &bundle.kind {
            BundleKind::FlatPrice { price, .. } => {
                let one_time = discounted(*price, client_type);
                PriceQuote { one_time: Some(one_time), monthly: None, needs_consultation: false }
            }
            BundleKind::Composed { tier, technology, packages, .. } => {
                price_components(catalog, Some(tier), Some(technology), packages, client_type)
            }
        },
        PriceInput::Selection(selection) => {
            let effective: Vec<PackageId> = selection
                .effective_packages(catalog)
                .into_iter()
                .map(|package| package.id.clone())
                .collect();
            price_components(
                catalog,
                selection.tier.as_ref(),
                selection.technology.as_ref(),
                &effective,
                client_type,
            )
        }
    }
}

fn price_components(
    catalog: &Catalog,
    tier: Option<&TierId>,
    technology: Option<&TechnologyId>,
    packages: &[PackageId],
    client_type: ClientType,
) -> PriceQuote {
    let Some(tier) = tier else {
        return PriceQuote::not_ready();
    };
    let tier = catalog.tier(tier);

    if tier.is_consultation() {
        return PriceQuote::consultation();
    }

    let Some(technology) = technology else {
        return PriceQuote::not_ready();
    };
    let technology = catalog.technology(technology);

    if technology.is_consultation() {
        return PriceQuote::consultation();
    }

    let mut one_time = tier.price.unwrap_or(Decimal::ZERO);
    one_time += technology.price.unwrap_or(Decimal::ZERO);
    let mut monthly = Decimal::ZERO;

    for package in packages {
        let package = catalog.package(package);
        if package.monthly {
            monthly += package.price;
        } else {
            one_time += package.price;
        }
    }

    let one_time = discounted(one_time, client_type);
    let monthly = discounted(monthly, client_type);

    PriceQuote {
        one_time: Some(one_time),
        monthly: (!monthly.is_zero()).then_some(monthly),
        needs_consultation: false,
    }
}

fn discounted(total: Decimal, client_type: ClientType) -> Decimal {
    let factor = Decimal::ONE - client_type.discount_rate();
    round_currency(total * factor)
}

fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
