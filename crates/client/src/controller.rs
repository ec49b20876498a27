//! The browser-equivalent collaborator: owns the wizard state, recomputes
//! the price after every mutation, and drives submissions through the relay.
//!
//! One submission at a time: while a request is in flight every further
//! submit is rejected locally. The relay is never asked to retry; a failed
//! submission drops the user back on the add-ons step for a manual retry.

use thiserror::Error;

use sitequote_core::{
    i18n, BundleKind, Catalog, ContactFields, FormSubmission, Language, PackageDetails,
    PriceQuote, PricingFlow, PricingFormData, PricingTab, Selection, TransitionOutcome,
    ValidationError, WizardError, WizardEvent, WizardStep,
};

use crate::relay::{RelayAck, RelayClient, RelayError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Flat-price bundles are ordered on their own page.
    #[error("the selected bundle is ordered at {0}")]
    RedirectRequired(&'static str),
    #[error("could not encode the submission: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl SubmitError {
    /// The localized message shown to the user. Transport and endpoint
    /// failures all collapse into the generic retry message.
    pub fn user_message(&self, language: Language) -> &str {
        let key = match self {
            Self::AlreadySubmitting => "submit.in-progress",
            Self::Invalid(ValidationError::MissingField("tier")) => "wizard.missing-tier",
            Self::Invalid(ValidationError::MissingField("technology")) => {
                "wizard.missing-technology"
            }
            Self::Invalid(_) => "submit.missing-contact-fields",
            Self::RedirectRequired(_) | Self::Encode(_) | Self::Relay(_) => {
                "submit.network-error"
            }
        };
        i18n::message(language, key)
    }
}

pub struct WizardController {
    pub flow: PricingFlow,
    pub language: Language,
    relay: RelayClient,
    is_submitting: bool,
}

impl WizardController {
    pub fn new(relay: RelayClient, language: Language, catalog: &Catalog) -> Self {
        Self { flow: PricingFlow::new(catalog), language, relay, is_submitting: false }
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn price(&self, catalog: &Catalog) -> PriceQuote {
        self.flow.price(catalog)
    }

    pub fn advance(&mut self, catalog: &Catalog) -> Result<TransitionOutcome, WizardError> {
        self.flow.apply(catalog, WizardEvent::Continue)
    }

    pub fn back(&mut self, catalog: &Catalog) -> Result<TransitionOutcome, WizardError> {
        self.flow.apply(catalog, WizardEvent::Back)
    }

    /// Redirect target when the picked bundle is sold on a dedicated page
    /// instead of being submitted from here.
    pub fn bundle_redirect(&self, catalog: &Catalog) -> Option<&'static str> {
        if self.flow.active_tab != PricingTab::Bundles {
            return None;
        }
        let bundle = self.flow.bundle_picker.bundle.as_ref()?;
        match &catalog.bundle(bundle).kind {
            BundleKind::FlatPrice { redirect_to, .. } => Some(redirect_to),
            BundleKind::Composed { .. } => None,
        }
    }

    /// Validate everything and snapshot the active flow into the wire
    /// payload. Performs no I/O.
    fn prepare_submission(
        &self,
        catalog: &Catalog,
        contact: &ContactFields,
        message: Option<&str>,
    ) -> Result<FormSubmission, SubmitError> {
        if self.is_submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        contact.validate()?;

        let package_details = match self.flow.active_tab {
            PricingTab::Calculator => {
                self.flow.selection.validate_for_submit(catalog)?;
                PackageDetails::from_selection(catalog, &self.flow.selection)
            }
            PricingTab::Bundles => {
                let Some(bundle) = &self.flow.bundle_picker.bundle else {
                    return Err(SubmitError::Invalid(ValidationError::MissingField("bundle")));
                };
                if let Some(redirect) = self.bundle_redirect(catalog) {
                    return Err(SubmitError::RedirectRequired(redirect));
                }
                PackageDetails::from_bundle(
                    catalog,
                    catalog.bundle(bundle),
                    self.flow.bundle_picker.client_type,
                )
            }
        };

        let data = PricingFormData {
            contact: contact.clone(),
            message: message.map(str::to_owned),
            package_details,
            language: self.language,
        };
        Ok(FormSubmission::pricing(&data)?)
    }

    /// Submit the active flow. Success discards the wizard selection and
    /// enters the terminal step; failure returns to the add-ons step and
    /// leaves the selection untouched for a manual retry.
    pub async fn submit(
        &mut self,
        catalog: &Catalog,
        contact: &ContactFields,
        message: Option<&str>,
    ) -> Result<RelayAck, SubmitError> {
        let submission = self.prepare_submission(catalog, contact, message)?;

        self.is_submitting = true;
        let result = self.relay.submit_form(&submission).await;
        self.is_submitting = false;

        let at_add_ons = self.flow.step == WizardStep::AddOns;
        match result {
            Ok(ack) => {
                if at_add_ons {
                    let _ = self.flow.apply(catalog, WizardEvent::SubmitSucceeded);
                    self.flow.selection = Selection::new(self.flow.selection.client_type);
                }
                tracing::info!(
                    event_name = "submission_accepted",
                    message_id = %ack.message_id,
                    "submission acknowledged by the relay"
                );
                Ok(ack)
            }
            Err(error) => {
                if at_add_ons {
                    let _ = self.flow.apply(catalog, WizardEvent::SubmitFailed);
                }
                tracing::warn!(
                    event_name = "submission_failed",
                    error = %error,
                    "submission rejected, leaving the selection in place"
                );
                Err(SubmitError::Relay(error))
            }
        }
    }
}
