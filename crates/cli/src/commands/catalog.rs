use serde_json::json;
use sitequote_core::Catalog;

/// Dump the full catalog so operators can diff what the binary actually
/// ships against the published price list.
pub fn run() -> String {
    let catalog = Catalog::global();
    let payload = json!({
        "tiers": catalog.tiers(),
        "technologies": catalog.technologies(),
        "packages": catalog.packages(),
        "bundles": catalog.bundles(),
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|error| {
        format!("{{\"error\":\"catalog serialization failed: {}\"}}", escape_json(&error.to_string()))
    })
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
