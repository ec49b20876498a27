use clap::Args;
use serde::Serialize;

use sitequote_core::{
    compute_price, Catalog, ClientType, PackageId, PriceInput, PriceQuote, Selection,
    TechnologyId, TierId,
};

use super::CommandResult;

#[derive(Debug, Args)]
pub struct PriceArgs {
    #[arg(
        long,
        conflicts_with_all = ["tier", "technology", "package"],
        help = "Price a predefined bundle by id"
    )]
    pub bundle: Option<String>,
    #[arg(long, help = "Tier id for a calculator selection")]
    pub tier: Option<String>,
    #[arg(long, help = "Technology id for a calculator selection")]
    pub technology: Option<String>,
    #[arg(long = "package", help = "Add-on package id, repeatable")]
    pub package: Vec<String>,
    #[arg(long, default_value = "company", help = "Client type: company, student or non-profit")]
    pub client_type: String,
}

#[derive(Debug, Serialize)]
struct PriceReport {
    client_type: &'static str,
    quote: PriceQuote,
}

pub fn run(args: PriceArgs) -> CommandResult {
    let catalog = Catalog::global();

    let client_type = match parse_client_type(&args.client_type) {
        Some(client_type) => client_type,
        None => {
            return CommandResult::failure(
                "price",
                "invalid_argument",
                format!(
                    "unknown client type `{}` (expected company, student or non-profit)",
                    args.client_type
                ),
                2,
            );
        }
    };

    let quote = if let Some(bundle_id) = &args.bundle {
        match find_bundle(catalog, bundle_id) {
            Some(bundle) => compute_price(catalog, PriceInput::Bundle(bundle), client_type),
            None => {
                return CommandResult::failure(
                    "price",
                    "unknown_id",
                    format!("unknown bundle id `{bundle_id}`"),
                    2,
                );
            }
        }
    } else {
        match selection_from_args(catalog, &args, client_type) {
            Ok(selection) => {
                compute_price(catalog, PriceInput::Selection(&selection), client_type)
            }
            Err(result) => return result,
        }
    };

    let report = PriceReport { client_type: client_type.label(), quote };
    let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
        format!("{{\"error\":\"price serialization failed: {error}\"}}")
    });
    CommandResult { exit_code: 0, output }
}

fn parse_client_type(value: &str) -> Option<ClientType> {
    match value.trim().to_ascii_lowercase().as_str() {
        "company" => Some(ClientType::Company),
        "student" => Some(ClientType::Student),
        "non-profit" | "nonprofit" => Some(ClientType::NonProfit),
        _ => None,
    }
}

fn find_bundle<'a>(catalog: &'a Catalog, id: &str) -> Option<&'a sitequote_core::Bundle> {
    catalog.bundles().iter().find(|bundle| bundle.id.0 == id)
}

/// Build a selection from operator-provided ids, rejecting unknown ids
/// instead of panicking like internal catalog lookups do.
fn selection_from_args(
    catalog: &Catalog,
    args: &PriceArgs,
    client_type: ClientType,
) -> Result<Selection, CommandResult> {
    let Some(tier) = &args.tier else {
        return Err(CommandResult::failure(
            "price",
            "invalid_argument",
            "either --bundle or --tier is required",
            2,
        ));
    };
    if !catalog.tiers().iter().any(|candidate| candidate.id.0 == *tier) {
        return Err(CommandResult::failure(
            "price",
            "unknown_id",
            format!("unknown tier id `{tier}`"),
            2,
        ));
    }

    if let Some(technology) = &args.technology {
        if !catalog.technologies().iter().any(|candidate| candidate.id.0 == *technology) {
            return Err(CommandResult::failure(
                "price",
                "unknown_id",
                format!("unknown technology id `{technology}`"),
                2,
            ));
        }
    }
    for package in &args.package {
        if !catalog.packages().iter().any(|candidate| candidate.id.0 == *package) {
            return Err(CommandResult::failure(
                "price",
                "unknown_id",
                format!("unknown package id `{package}`"),
                2,
            ));
        }
    }

    let selection = Selection {
        client_type,
        tier: Some(TierId(tier.clone())),
        technology: args.technology.clone().map(TechnologyId),
        packages: args.package.iter().cloned().map(PackageId).collect(),
    };

    if let Err(error) = selection.validate_for_submit(catalog) {
        return Err(CommandResult::failure("price", "invalid_selection", error.to_string(), 2));
    }
    Ok(selection)
}
