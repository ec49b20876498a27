use serde::{Deserialize, Serialize};

use crate::catalog::{BundleId, ClientType};

/// The four wizard steps plus the terminal state reached only after the
/// relay acknowledges a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    ClientType,
    Tier,
    Technology,
    AddOns,
    Submitted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    Continue,
    Back,
    SubmitSucceeded,
    SubmitFailed,
}

/// The pricing page runs two parallel flows behind a tab switch. Switching
/// tabs never clears the other flow's in-progress state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingTab {
    #[default]
    Bundles,
    Calculator,
}

/// Single-screen bundle picker state, parallel to the wizard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BundlePicker {
    pub client_type: ClientType,
    pub bundle: Option<BundleId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WizardStep,
    pub to: WizardStep,
    pub event: WizardEvent,
}

/// Card rendering hint: incompatible options are disabled, never removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardAvailability<Id> {
    pub id: Id,
    pub enabled: bool,
}
