pub mod catalog;
pub mod config;
pub mod flows;
pub mod i18n;
pub mod pricing;
pub mod selection;
pub mod submission;

pub use catalog::{
    AddOnPackage, Bundle, BundleId, BundleKind, Catalog, ClientType, PackageId, Technology,
    TechnologyId, Tier, TierId,
};
pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig, MailConfig,
    ServerConfig, SmtpSettings,
};
pub use flows::{
    BundlePicker, CardAvailability, PricingFlow, PricingTab, TransitionOutcome, WizardError,
    WizardEvent, WizardStep,
};
pub use i18n::Language;
pub use pricing::{compute_price, PriceInput, PriceQuote};
pub use selection::{Selection, ValidationError, CONSULTATION_TECHNOLOGY};
pub use submission::{
    ContactFields, ContactForm, FormSubmission, MvpFormData, PackageDetails, PricingFormData,
};
