use thiserror::Error;

use crate::catalog::{BundleId, Catalog, ClientType, PackageId, TechnologyId};
use crate::flows::states::{
    BundlePicker, CardAvailability, PricingTab, TransitionOutcome, WizardEvent, WizardStep,
};
use crate::pricing::{compute_price, PriceInput, PriceQuote};
use crate::selection::{Selection, CONSULTATION_TECHNOLOGY};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("missing required field `{field}` at step {step:?}")]
    MissingRequiredField { step: WizardStep, field: &'static str },
    #[error("invalid transition from {step:?} using event {event:?}")]
    InvalidTransition { step: WizardStep, event: WizardEvent },
}

/// Both pricing flows behind the tab switch: the 4-step calculator wizard
/// and the single-screen bundle picker. Each keeps its own client type and
/// in-progress state; switching tabs retains both.
#[derive(Clone, Debug, PartialEq)]
pub struct PricingFlow {
    pub active_tab: PricingTab,
    pub step: WizardStep,
    pub selection: Selection,
    pub bundle_picker: BundlePicker,
}

impl PricingFlow {
    pub fn new(catalog: &Catalog) -> Self {
        let mut bundle_picker = BundlePicker::default();
        bundle_picker.bundle = catalog
            .visible_bundles(bundle_picker.client_type)
            .first()
            .map(|bundle| bundle.id.clone());

        Self {
            active_tab: PricingTab::default(),
            step: WizardStep::ClientType,
            selection: Selection::default(),
            bundle_picker,
        }
    }

    pub fn switch_tab(&mut self, tab: PricingTab) {
        self.active_tab = tab;
    }

    /// Set the client type on whichever flow is active.
    pub fn select_client_type(&mut self, client_type: ClientType) {
        match self.active_tab {
            PricingTab::Bundles => self.bundle_picker.client_type = client_type,
            PricingTab::Calculator => self.selection.client_type = client_type,
        }
    }

    pub fn select_tier(&mut self, tier: crate::catalog::TierId) {
        self.selection.tier = Some(tier);
    }

    pub fn select_technology(&mut self, technology: TechnologyId) {
        self.selection.technology = Some(technology);
    }

    pub fn toggle_package(&mut self, package: PackageId) {
        self.selection.toggle_package(package);
    }

    pub fn select_bundle(&mut self, bundle: BundleId) {
        self.bundle_picker.bundle = Some(bundle);
    }

    /// Apply a wizard transition. Forward transitions validate the current
    /// step's required field; backward transitions always succeed and never
    /// clear downstream choices.
    pub fn apply(
        &mut self,
        catalog: &Catalog,
        event: WizardEvent,
    ) -> Result<TransitionOutcome, WizardError> {
        use WizardEvent::{Back, Continue, SubmitFailed, SubmitSucceeded};
        use WizardStep::{AddOns, ClientType, Submitted, Technology, Tier};

        let from = self.step;
        let to = match (from, event) {
            (ClientType, Continue) => Tier,
            (Tier, Continue) => {
                if self.selection.tier.is_none() {
                    return Err(WizardError::MissingRequiredField { step: from, field: "tier" });
                }
                // A consultation tier fixes the approach to the sentinel, so
                // the technology step needs no manual choice.
                if self.tier_is_consultation(catalog) {
                    self.selection.technology =
                        Some(TechnologyId(CONSULTATION_TECHNOLOGY.to_owned()));
                }
                Technology
            }
            (Technology, Continue) => {
                if self.selection.technology.is_none() && !self.tier_is_consultation(catalog) {
                    return Err(WizardError::MissingRequiredField {
                        step: from,
                        field: "technology",
                    });
                }
                AddOns
            }
            (Tier, Back) => ClientType,
            (Technology, Back) => Tier,
            (AddOns, Back) => Technology,
            (AddOns, SubmitSucceeded) => Submitted,
            (AddOns, SubmitFailed) => AddOns,
            (step, event) => return Err(WizardError::InvalidTransition { step, event }),
        };

        self.step = to;
        self.fill_step_defaults(catalog);
        Ok(TransitionOutcome { from, to, event })
    }

    /// Technology cards for the current tier; incompatible approaches are
    /// disabled, not hidden, and a previous now-incompatible choice stays in
    /// the selection until the user picks something else.
    pub fn technology_options(&self, catalog: &Catalog) -> Vec<CardAvailability<TechnologyId>> {
        catalog
            .technologies()
            .iter()
            .map(|technology| CardAvailability {
                id: technology.id.clone(),
                enabled: self
                    .selection
                    .tier
                    .as_ref()
                    .map(|tier| catalog.technology_compatible(tier, &technology.id))
                    .unwrap_or(false),
            })
            .collect()
    }

    /// Add-on cards for the current technology, same disabling policy.
    pub fn package_options(&self, catalog: &Catalog) -> Vec<CardAvailability<PackageId>> {
        catalog
            .packages()
            .iter()
            .map(|package| CardAvailability {
                id: package.id.clone(),
                enabled: self
                    .selection
                    .technology
                    .as_ref()
                    .map(|technology| catalog.package_compatible(technology, &package.id))
                    .unwrap_or(false),
            })
            .collect()
    }

    /// Recompute the price for whichever flow is active.
    pub fn price(&self, catalog: &Catalog) -> PriceQuote {
        match self.active_tab {
            PricingTab::Calculator => compute_price(
                catalog,
                PriceInput::Selection(&self.selection),
                self.selection.client_type,
            ),
            PricingTab::Bundles => match &self.bundle_picker.bundle {
                Some(bundle) => compute_price(
                    catalog,
                    PriceInput::Bundle(catalog.bundle(bundle)),
                    self.bundle_picker.client_type,
                ),
                None => PriceQuote::default(),
            },
        }
    }

    fn tier_is_consultation(&self, catalog: &Catalog) -> bool {
        self.selection
            .tier
            .as_ref()
            .map(|tier| catalog.tier(tier).is_consultation())
            .unwrap_or(false)
    }

    // Entering a step with nothing chosen preselects the first (compatible)
    // option, mirroring the production page.
    fn fill_step_defaults(&mut self, catalog: &Catalog) {
        match self.step {
            WizardStep::Tier => {
                if self.selection.tier.is_none() {
                    self.selection.tier = catalog.tiers().first().map(|tier| tier.id.clone());
                }
            }
            WizardStep::Technology => {
                if self.selection.technology.is_none() {
                    if let Some(tier) = &self.selection.tier {
                        self.selection.technology = catalog
                            .technologies()
                            .iter()
                            .find(|technology| {
                                catalog.technology_compatible(tier, &technology.id)
                            })
                            .map(|technology| technology.id.clone());
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{BundleId, Catalog, ClientType, PackageId, TechnologyId, TierId};
    use crate::flows::states::{PricingTab, WizardEvent, WizardStep};

    use super::{PricingFlow, WizardError};

    fn flow(catalog: &Catalog) -> PricingFlow {
        let mut flow = PricingFlow::new(catalog);
        flow.switch_tab(PricingTab::Calculator);
        flow
    }

    #[test]
    fn happy_path_walks_all_four_steps() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);

        flow.apply(&catalog, WizardEvent::Continue).expect("client type -> tier");
        assert_eq!(flow.step, WizardStep::Tier);
        assert_eq!(flow.selection.tier, Some(TierId("starter".to_owned())), "first tier preselected");

        flow.apply(&catalog, WizardEvent::Continue).expect("tier -> technology");
        assert_eq!(flow.step, WizardStep::Technology);
        assert!(flow.selection.technology.is_some(), "first compatible approach preselected");

        flow.apply(&catalog, WizardEvent::Continue).expect("technology -> add-ons");
        assert_eq!(flow.step, WizardStep::AddOns);

        flow.apply(&catalog, WizardEvent::SubmitSucceeded).expect("add-ons -> submitted");
        assert_eq!(flow.step, WizardStep::Submitted);
    }

    #[test]
    fn missing_tier_blocks_the_forward_transition() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        flow.apply(&catalog, WizardEvent::Continue).expect("client type -> tier");
        flow.selection.tier = None;

        let error = flow.apply(&catalog, WizardEvent::Continue).expect_err("must name the field");
        assert_eq!(
            error,
            WizardError::MissingRequiredField { step: WizardStep::Tier, field: "tier" }
        );
        assert_eq!(flow.step, WizardStep::Tier, "rejected transition leaves the step unchanged");
    }

    #[test]
    fn consultation_tier_autofills_the_sentinel_approach() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        flow.apply(&catalog, WizardEvent::Continue).expect("client type -> tier");
        flow.select_tier(TierId("custom-made".to_owned()));

        flow.apply(&catalog, WizardEvent::Continue).expect("tier -> technology");
        assert_eq!(
            flow.selection.technology,
            Some(TechnologyId("in-consultation".to_owned()))
        );

        // No manual choice needed to keep going.
        flow.apply(&catalog, WizardEvent::Continue).expect("technology -> add-ons");
        assert_eq!(flow.step, WizardStep::AddOns);
    }

    #[test]
    fn back_navigation_preserves_downstream_choices() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        flow.apply(&catalog, WizardEvent::Continue).expect("to tier");
        flow.select_tier(TierId("professional".to_owned()));
        flow.apply(&catalog, WizardEvent::Continue).expect("to technology");
        flow.select_technology(TechnologyId("cms-full".to_owned()));
        flow.apply(&catalog, WizardEvent::Continue).expect("to add-ons");
        flow.toggle_package(PackageId("integrations".to_owned()));

        flow.apply(&catalog, WizardEvent::Back).expect("back to technology");
        flow.apply(&catalog, WizardEvent::Back).expect("back to tier");
        assert_eq!(flow.selection.technology, Some(TechnologyId("cms-full".to_owned())));
        assert_eq!(flow.selection.packages, vec![PackageId("integrations".to_owned())]);
    }

    #[test]
    fn changing_tier_disables_rather_than_clears_incompatible_choices() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        flow.apply(&catalog, WizardEvent::Continue).expect("to tier");
        flow.select_tier(TierId("professional".to_owned()));
        flow.apply(&catalog, WizardEvent::Continue).expect("to technology");
        flow.select_technology(TechnologyId("cms-full".to_owned()));

        // Back to tier, pick the consultation tier: cms-full is no longer
        // compatible but the choice survives in the selection.
        flow.apply(&catalog, WizardEvent::Back).expect("back to tier");
        flow.select_tier(TierId("custom-made".to_owned()));

        assert_eq!(flow.selection.technology, Some(TechnologyId("cms-full".to_owned())));
        let options = flow.technology_options(&catalog);
        let cms_full = options
            .iter()
            .find(|card| card.id == TechnologyId("cms-full".to_owned()))
            .expect("card exists");
        assert!(!cms_full.enabled);
    }

    #[test]
    fn incompatible_technologies_are_disabled_for_the_selected_tier() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        flow.apply(&catalog, WizardEvent::Continue).expect("to tier");
        flow.select_tier(TierId("custom-made".to_owned()));

        for card in flow.technology_options(&catalog) {
            let compatible = catalog
                .technology_compatible(&TierId("custom-made".to_owned()), &card.id);
            assert_eq!(card.enabled, compatible);
        }
    }

    #[test]
    fn failed_submit_returns_to_add_ons() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);
        for _ in 0..3 {
            flow.apply(&catalog, WizardEvent::Continue).expect("forward");
        }
        assert_eq!(flow.step, WizardStep::AddOns);

        flow.apply(&catalog, WizardEvent::SubmitFailed).expect("failed submit is not terminal");
        assert_eq!(flow.step, WizardStep::AddOns);
    }

    #[test]
    fn submitting_before_add_ons_is_invalid() {
        let catalog = Catalog::standard();
        let mut flow = flow(&catalog);

        let error =
            flow.apply(&catalog, WizardEvent::SubmitSucceeded).expect_err("not at add-ons yet");
        assert!(matches!(error, WizardError::InvalidTransition { .. }));
    }

    #[test]
    fn tab_switch_retains_both_flows() {
        let catalog = Catalog::standard();
        let mut flow = PricingFlow::new(&catalog);
        assert_eq!(flow.bundle_picker.bundle, Some(BundleId("simple".to_owned())));

        flow.select_bundle(BundleId("plus".to_owned()));
        flow.switch_tab(PricingTab::Calculator);
        flow.select_client_type(ClientType::Student);
        flow.apply(&catalog, WizardEvent::Continue).expect("to tier");

        flow.switch_tab(PricingTab::Bundles);
        assert_eq!(flow.bundle_picker.bundle, Some(BundleId("plus".to_owned())));
        assert_eq!(flow.bundle_picker.client_type, ClientType::Company);

        flow.switch_tab(PricingTab::Calculator);
        assert_eq!(flow.step, WizardStep::Tier);
        assert_eq!(flow.selection.client_type, ClientType::Student);
    }

    #[test]
    fn replay_is_deterministic_for_the_same_event_sequence() {
        let catalog = Catalog::standard();
        let events = [WizardEvent::Continue, WizardEvent::Continue, WizardEvent::Continue];

        let run = || {
            let mut flow = flow(&catalog);
            let mut outcomes = Vec::new();
            for event in events {
                outcomes.push(flow.apply(&catalog, event).expect("deterministic run"));
            }
            (flow, outcomes)
        };

        assert_eq!(run(), run());
    }
}
