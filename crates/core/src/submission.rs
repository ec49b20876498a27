//! Submission payloads exchanged with the relay endpoints.
//!
//! The wire shapes mirror what the site's forms post: camelCase field names,
//! optional fields omitted when empty, and a free-form `formData` object for
//! form types the relay does not know.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Bundle, BundleKind, Catalog, ClientType};
use crate::i18n::Language;
use crate::pricing::{compute_price, PriceInput, PriceQuote};
use crate::selection::{Selection, ValidationError};

/// Required contact identity shared by every form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactFields {
    /// First name, last name and email must be non-blank; phone is optional.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::MissingField("firstName"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::MissingField("lastName"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Snapshot of the priced configuration carried inside a pricing submission.
/// Built from either the calculator selection or a predefined bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub client_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<Decimal>,
}

impl PackageDetails {
    /// Snapshot the calculator selection. Only packages still compatible
    /// with the chosen technology appear; stale choices never leave the
    /// client.
    pub fn from_selection(catalog: &Catalog, selection: &Selection) -> Self {
        let quote = compute_price(
            catalog,
            PriceInput::Selection(selection),
            selection.client_type,
        );
        Self {
            package: None,
            client_type: selection.client_type.label().to_owned(),
            tier: selection.tier.as_ref().map(|tier| catalog.tier(tier).name.to_owned()),
            technology: selection
                .technology
                .as_ref()
                .map(|technology| catalog.technology(technology).name.to_owned()),
            packages: Some(
                selection
                    .effective_packages(catalog)
                    .into_iter()
                    .map(|package| package.name.to_owned())
                    .collect(),
            ),
            price: quote.one_time,
            monthly_price: quote.monthly,
        }
    }

    /// Snapshot a predefined bundle under the picker's client type.
    pub fn from_bundle(catalog: &Catalog, bundle: &Bundle, client_type: ClientType) -> Self {
        let quote = compute_price(catalog, PriceInput::Bundle(bundle), client_type);
        let (tier, technology) = match &bundle.kind {
            BundleKind::Composed { tier, technology, .. } => (
                Some(catalog.tier(tier).name.to_owned()),
                Some(catalog.technology(technology).name.to_owned()),
            ),
            BundleKind::FlatPrice { .. } => (None, None),
        };
        Self {
            package: Some(bundle.name.to_owned()),
            client_type: client_type.label().to_owned(),
            tier,
            technology,
            packages: None,
            price: quote.one_time,
            monthly_price: quote.monthly,
        }
    }

    pub fn quote(&self) -> PriceQuote {
        PriceQuote {
            one_time: self.price,
            monthly: self.monthly_price,
            needs_consultation: self.price.is_none(),
        }
    }
}

/// Body of `POST /api/form-submission` for the pricing wizard and bundle
/// picker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFormData {
    #[serde(flatten)]
    pub contact: ContactFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub package_details: PackageDetails,
    #[serde(default)]
    pub language: Language,
}

/// Body of `POST /api/form-submission` for the MVP landing page form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvpFormData {
    #[serde(flatten)]
    pub contact: ContactFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_package: Option<String>,
    #[serde(default)]
    pub language: Language,
}

/// Body of `POST /api/contact`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub language: Language,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::MissingField("message"));
        }
        Ok(())
    }
}

/// Envelope for `POST /api/form-submission`. `form_data` stays a raw JSON
/// object so unrecognized form types can still be relayed verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub form_type: String,
    pub form_data: Value,
}

impl FormSubmission {
    pub fn pricing(data: &PricingFormData) -> Result<Self, serde_json::Error> {
        Ok(Self { form_type: "pricing".to_owned(), form_data: serde_json::to_value(data)? })
    }

    pub fn mvp(data: &MvpFormData) -> Result<Self, serde_json::Error> {
        Ok(Self { form_type: "mvp".to_owned(), form_data: serde_json::to_value(data)? })
    }

    /// Language declared inside the form data; absent or unknown means
    /// English.
    pub fn language(&self) -> Language {
        self.form_data
            .get("language")
            .and_then(Value::as_str)
            .map(|code| code.parse().unwrap_or_default())
            .unwrap_or_default()
    }
}
