//! Two-phase delivery: business notification, then requester confirmation.
//!
//! The notification send decides the outcome of the whole submission. The
//! confirmation is best effort only; a failure there is logged and swallowed
//! because the business side already has the lead.

use crate::compose::EmailContent;
use crate::transport::{MailError, MailTransport, OutboundEmail, SendReceipt};

/// Fixed inbox every notification goes to.
pub const NOTIFICATIONS_INBOX: &str = "info@sitequote.dev";

/// A composed submission ready for the two sends. Without a requester
/// address there is nothing to reply to and no confirmation to send.
#[derive(Clone, Debug)]
pub struct Delivery {
    pub requester_email: Option<String>,
    pub notification: EmailContent,
    pub confirmation: Option<EmailContent>,
}

/// Send the notification, then the confirmation. Returns the notification
/// receipt; only the notification send can fail the delivery.
pub async fn deliver(
    transport: &dyn MailTransport,
    delivery: &Delivery,
) -> Result<SendReceipt, MailError> {
    let notification = OutboundEmail {
        to: NOTIFICATIONS_INBOX.to_owned(),
        reply_to: delivery.requester_email.clone(),
        subject: delivery.notification.subject.clone(),
        text: delivery.notification.text.clone(),
        html: Some(delivery.notification.html.clone()),
    };
    let receipt = transport.send(&notification).await?;
    tracing::info!(
        event_name = "notification_sent",
        message_id = %receipt.message_id,
        "business notification delivered"
    );

    if let (Some(confirmation), Some(requester)) =
        (&delivery.confirmation, &delivery.requester_email)
    {
        let email = OutboundEmail {
            to: requester.clone(),
            reply_to: None,
            subject: confirmation.subject.clone(),
            text: confirmation.text.clone(),
            html: Some(confirmation.html.clone()),
        };
        match transport.send(&email).await {
            Ok(confirmation_receipt) => {
                tracing::info!(
                    event_name = "confirmation_sent",
                    message_id = %confirmation_receipt.message_id,
                    "requester confirmation delivered"
                );
            }
            Err(error) => {
                tracing::warn!(
                    event_name = "confirmation_send_failed",
                    error = %error,
                    "confirmation email failed after the notification was accepted"
                );
            }
        }
    }

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::compose::EmailContent;
    use crate::transport::{
        EmailEnvelope, MailError, MailTransport, OutboundEmail, SendReceipt,
    };

    use super::{deliver, Delivery, NOTIFICATIONS_INBOX};

    /// Records every send; optionally fails the nth one.
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundEmail>>,
        fail_on_send: Option<usize>,
    }

    impl RecordingTransport {
        fn new(fail_on_send: Option<usize>) -> Self {
            Self { sent: Mutex::new(Vec::new()), fail_on_send }
        }

        fn sent(&self) -> Vec<OutboundEmail> {
            self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn verify(&self) -> Result<(), MailError> {
            Ok(())
        }

        async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailError> {
            let mut sent = self.sent.lock().expect("lock");
            let index = sent.len();
            sent.push(email.clone());
            if self.fail_on_send == Some(index) {
                return Err(MailError::Send("mailbox unavailable".to_string()));
            }
            Ok(SendReceipt {
                message_id: format!("<message-{index}@test>"),
                response: "250 Ok".to_string(),
                envelope: EmailEnvelope {
                    from: "noreply@example.com".to_string(),
                    to: vec![email.to.clone()],
                },
            })
        }
    }

    fn delivery(with_confirmation: bool) -> Delivery {
        Delivery {
            requester_email: Some("ada@example.com".to_string()),
            notification: EmailContent {
                subject: "New Pricing Form Submission: Custom Package".to_string(),
                text: "notification".to_string(),
                html: "<p>notification</p>".to_string(),
            },
            confirmation: with_confirmation.then(|| EmailContent {
                subject: "Thank you for your pricing request".to_string(),
                text: "confirmation".to_string(),
                html: "<p>confirmation</p>".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn notification_goes_to_the_inbox_with_reply_to_set() {
        let transport = RecordingTransport::new(None);

        let receipt = deliver(&transport, &delivery(true)).await.expect("delivery succeeds");
        assert_eq!(receipt.message_id, "<message-0@test>");

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, NOTIFICATIONS_INBOX);
        assert_eq!(sent[0].reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(sent[1].to, "ada@example.com");
        assert_eq!(sent[1].reply_to, None);
    }

    #[tokio::test]
    async fn notification_failure_fails_the_delivery() {
        let transport = RecordingTransport::new(Some(0));

        let error = deliver(&transport, &delivery(true)).await.expect_err("must fail");
        assert!(matches!(error, MailError::Send(_)));
        assert_eq!(transport.sent().len(), 1, "confirmation is never attempted");
    }

    #[tokio::test]
    async fn confirmation_failure_is_swallowed() {
        let transport = RecordingTransport::new(Some(1));

        let receipt = deliver(&transport, &delivery(true)).await.expect("still succeeds");
        assert_eq!(receipt.message_id, "<message-0@test>");
        assert_eq!(transport.sent().len(), 2, "both sends were attempted");
    }

    #[tokio::test]
    async fn delivery_without_confirmation_sends_once() {
        let transport = RecordingTransport::new(None);

        deliver(&transport, &delivery(false)).await.expect("delivery succeeds");
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn anonymous_delivery_skips_reply_to_and_confirmation() {
        let transport = RecordingTransport::new(None);
        let mut anonymous = delivery(true);
        anonymous.requester_email = None;

        deliver(&transport, &anonymous).await.expect("delivery succeeds");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, None);
    }
}
