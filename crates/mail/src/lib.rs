pub mod compose;
pub mod delivery;
pub mod transport;

pub use compose::{
    contact_confirmation, contact_notification, escape_html, generic_notification,
    mvp_notification, pricing_notification, submission_confirmation, EmailContent,
};
pub use delivery::{deliver, Delivery, NOTIFICATIONS_INBOX};
pub use transport::{
    EmailEnvelope, MailError, MailTransport, OutboundEmail, SendReceipt, SmtpMailer,
    SmtpTransportFactory, TransportFactory,
};
