pub mod engine;
pub mod states;

pub use engine::{PricingFlow, WizardError};
pub use states::{BundlePicker, CardAvailability, PricingTab, TransitionOutcome, WizardEvent, WizardStep};
