pub mod controller;
pub mod relay;

pub use controller::{SubmitError, WizardController};
pub use relay::{RelayAck, RelayClient, RelayError};
