//! Bilingual email composition.
//!
//! Every rendering produces a plain-text body plus an HTML alternative.
//! User-supplied text is HTML-escaped before interpolation; newlines become
//! `<br>` only after escaping, so markup in form input never reaches the
//! rendered email.

use serde_json::Value;

use sitequote_core::{ContactForm, Language, MvpFormData, PricingFormData};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape, then turn newlines into `<br>` for multi-line form input.
fn html_text(input: &str) -> String {
    escape_html(input).replace('\n', "<br>")
}

fn is_nl(language: Language) -> bool {
    language == Language::Nl
}

pub fn contact_notification(form: &ContactForm) -> EmailContent {
    let nl = is_nl(form.language);

    let subject = if nl {
        format!("Nieuw Contactformulier Bericht: {}", form.subject)
    } else {
        format!("New Contact Form Submission: {}", form.subject)
    };

    let text = if nl {
        format!(
            "Naam: {}\nE-mail: {}\nOnderwerp: {}\n\nBericht:\n{}\n",
            form.name, form.email, form.subject, form.message
        )
    } else {
        format!(
            "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n",
            form.name, form.email, form.subject, form.message
        )
    };

    let html = if nl {
        format!(
            "<h2>Nieuw Contactformulier Bericht</h2>\n\
             <p><strong>Naam:</strong> {}</p>\n\
             <p><strong>E-mail:</strong> {}</p>\n\
             <p><strong>Onderwerp:</strong> {}</p>\n\
             <h3>Bericht:</h3>\n\
             <p>{}</p>\n",
            escape_html(&form.name),
            escape_html(&form.email),
            escape_html(&form.subject),
            html_text(&form.message)
        )
    } else {
        format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Subject:</strong> {}</p>\n\
             <h3>Message:</h3>\n\
             <p>{}</p>\n",
            escape_html(&form.name),
            escape_html(&form.email),
            escape_html(&form.subject),
            html_text(&form.message)
        )
    };

    EmailContent { subject, text, html }
}

/// Confirmation for the contact form includes a copy of the message.
pub fn contact_confirmation(form: &ContactForm) -> EmailContent {
    let nl = is_nl(form.language);

    let subject = if nl {
        "Bedankt voor uw bericht aan Sitequote".to_string()
    } else {
        "Thank you for contacting Sitequote".to_string()
    };

    let text = if nl {
        format!(
            "Beste {},\n\n\
             Bedankt voor uw bericht aan Sitequote. We hebben uw bericht ontvangen en zullen \
             zo snel mogelijk contact met u opnemen.\n\n\
             Hier is een kopie van uw bericht:\n\n\
             Onderwerp: {}\n\n\
             {}\n\n\
             Met vriendelijke groet,\nHet Sitequote Team\n",
            form.name, form.subject, form.message
        )
    } else {
        format!(
            "Dear {},\n\n\
             Thank you for contacting Sitequote. We have received your message and will get \
             back to you as soon as possible.\n\n\
             Here's a copy of your message:\n\n\
             Subject: {}\n\n\
             {}\n\n\
             Best regards,\nThe Sitequote Team\n",
            form.name, form.subject, form.message
        )
    };

    let html = if nl {
        format!(
            "<p>Beste {},</p>\n\
             <p>Bedankt voor uw bericht aan Sitequote. We hebben uw bericht ontvangen en \
             zullen zo snel mogelijk contact met u opnemen.</p>\n\
             <p>Hier is een kopie van uw bericht:</p>\n\
             <p><strong>Onderwerp:</strong> {}</p>\n\
             <p>{}</p>\n\
             <p>Met vriendelijke groet,<br>Het Sitequote Team</p>\n",
            escape_html(&form.name),
            escape_html(&form.subject),
            html_text(&form.message)
        )
    } else {
        format!(
            "<p>Dear {},</p>\n\
             <p>Thank you for contacting Sitequote. We have received your message and will \
             get back to you as soon as possible.</p>\n\
             <p>Here's a copy of your message:</p>\n\
             <p><strong>Subject:</strong> {}</p>\n\
             <p>{}</p>\n\
             <p>Best regards,<br>The Sitequote Team</p>\n",
            escape_html(&form.name),
            escape_html(&form.subject),
            html_text(&form.message)
        )
    };

    EmailContent { subject, text, html }
}

pub fn pricing_notification(data: &PricingFormData) -> EmailContent {
    let nl = is_nl(data.language);
    let details = &data.package_details;

    let package = details.package.as_deref().unwrap_or(if nl {
        "Aangepast Pakket"
    } else {
        "Custom Package"
    });
    let phone = data.contact.phone.as_deref().unwrap_or(if nl {
        "Niet opgegeven"
    } else {
        "Not provided"
    });
    let message = data.message.as_deref().unwrap_or(if nl {
        "Geen aanvullend bericht opgegeven"
    } else {
        "No additional message provided"
    });

    let subject = if nl {
        format!("Nieuwe Prijsaanvraag: {package}")
    } else {
        format!("New Pricing Form Submission: {package}")
    };

    let mut text = if nl {
        format!(
            "Nieuwe Prijsaanvraag\n\n\
             Klantinformatie:\n\
             Naam: {}\n\
             E-mail: {}\n\
             Telefoon: {}\n\n\
             Pakketdetails:\n\
             Pakket: {}\n\
             Klanttype: {}\n",
            data.contact.full_name(),
            data.contact.email,
            phone,
            package,
            details.client_type
        )
    } else {
        format!(
            "New Pricing Form Submission\n\n\
             Client Information:\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\n\
             Package Details:\n\
             Package: {}\n\
             Client Type: {}\n",
            data.contact.full_name(),
            data.contact.email,
            phone,
            package,
            details.client_type
        )
    };
    if let Some(tier) = &details.tier {
        text.push_str(&format!("{}: {tier}\n", if nl { "Niveau" } else { "Tier" }));
    }
    if let Some(technology) = &details.technology {
        text.push_str(&format!(
            "{}: {technology}\n",
            if nl { "Technologie" } else { "Technology" }
        ));
    }
    if let Some(packages) = &details.packages {
        if !packages.is_empty() {
            text.push_str(&format!(
                "{}: {}\n",
                if nl { "Pakketten" } else { "Packages" },
                packages.join(", ")
            ));
        }
    }
    if let Some(price) = details.price {
        text.push_str(&format!("{}: \u{20ac}{price}\n", if nl { "Prijs" } else { "Price" }));
    }
    if let Some(monthly) = details.monthly_price {
        if nl {
            text.push_str(&format!("Maandelijkse Prijs: \u{20ac}{monthly}/maand\n"));
        } else {
            text.push_str(&format!("Monthly Price: \u{20ac}{monthly}/month\n"));
        }
    }
    text.push_str(&format!(
        "\n{}:\n{}\n",
        if nl { "Aanvullend Bericht" } else { "Additional Message" },
        message
    ));

    let mut html = if nl {
        format!(
            "<h2>Nieuwe Prijsaanvraag</h2>\n\
             <h3>Klantinformatie:</h3>\n\
             <p><strong>Naam:</strong> {}</p>\n\
             <p><strong>E-mail:</strong> {}</p>\n\
             <p><strong>Telefoon:</strong> {}</p>\n\
             <h3>Pakketdetails:</h3>\n\
             <p><strong>Pakket:</strong> {}</p>\n\
             <p><strong>Klanttype:</strong> {}</p>\n",
            escape_html(&data.contact.full_name()),
            escape_html(&data.contact.email),
            escape_html(phone),
            escape_html(package),
            escape_html(&details.client_type)
        )
    } else {
        format!(
            "<h2>New Pricing Form Submission</h2>\n\
             <h3>Client Information:</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Phone:</strong> {}</p>\n\
             <h3>Package Details:</h3>\n\
             <p><strong>Package:</strong> {}</p>\n\
             <p><strong>Client Type:</strong> {}</p>\n",
            escape_html(&data.contact.full_name()),
            escape_html(&data.contact.email),
            escape_html(phone),
            escape_html(package),
            escape_html(&details.client_type)
        )
    };
    if let Some(tier) = &details.tier {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            if nl { "Niveau" } else { "Tier" },
            escape_html(tier)
        ));
    }
    if let Some(technology) = &details.technology {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            if nl { "Technologie" } else { "Technology" },
            escape_html(technology)
        ));
    }
    if let Some(packages) = &details.packages {
        if !packages.is_empty() {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>\n",
                if nl { "Pakketten" } else { "Packages" },
                escape_html(&packages.join(", "))
            ));
        }
    }
    if let Some(price) = details.price {
        html.push_str(&format!(
            "<p><strong>{}:</strong> \u{20ac}{price}</p>\n",
            if nl { "Prijs" } else { "Price" }
        ));
    }
    if let Some(monthly) = details.monthly_price {
        if nl {
            html.push_str(&format!(
                "<p><strong>Maandelijkse Prijs:</strong> \u{20ac}{monthly}/maand</p>\n"
            ));
        } else {
            html.push_str(&format!(
                "<p><strong>Monthly Price:</strong> \u{20ac}{monthly}/month</p>\n"
            ));
        }
    }
    html.push_str(&format!(
        "<h3>{}:</h3>\n<p>{}</p>\n",
        if nl { "Aanvullend Bericht" } else { "Additional Message" },
        html_text(message)
    ));

    EmailContent { subject, text, html }
}

pub fn mvp_notification(data: &MvpFormData) -> EmailContent {
    let nl = is_nl(data.language);

    let package = data.selected_package.as_deref().unwrap_or(if nl {
        "Aangepaste Aanvraag"
    } else {
        "Custom Request"
    });
    let phone = data.contact.phone.as_deref().unwrap_or(if nl {
        "Niet opgegeven"
    } else {
        "Not provided"
    });
    let description = data.project_description.as_deref().unwrap_or(if nl {
        "Geen projectbeschrijving opgegeven"
    } else {
        "No project description provided"
    });

    let subject = if nl {
        format!("Nieuwe MVP Aanvraag: {package}")
    } else {
        format!("New MVP Request: {package}")
    };

    let text = if nl {
        format!(
            "Nieuwe MVP Ontwikkelingsaanvraag\n\n\
             Klantinformatie:\n\
             Naam: {}\n\
             E-mail: {}\n\
             Telefoon: {}\n\n\
             Pakket: {}\n\n\
             Projectbeschrijving:\n{}\n",
            data.contact.full_name(),
            data.contact.email,
            phone,
            package,
            description
        )
    } else {
        format!(
            "New MVP Development Request\n\n\
             Client Information:\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\n\
             Package: {}\n\n\
             Project Description:\n{}\n",
            data.contact.full_name(),
            data.contact.email,
            phone,
            package,
            description
        )
    };

    let html = if nl {
        format!(
            "<h2>Nieuwe MVP Ontwikkelingsaanvraag</h2>\n\
             <h3>Klantinformatie:</h3>\n\
             <p><strong>Naam:</strong> {}</p>\n\
             <p><strong>E-mail:</strong> {}</p>\n\
             <p><strong>Telefoon:</strong> {}</p>\n\
             <h3>Pakket:</h3>\n\
             <p>{}</p>\n\
             <h3>Projectbeschrijving:</h3>\n\
             <p>{}</p>\n",
            escape_html(&data.contact.full_name()),
            escape_html(&data.contact.email),
            escape_html(phone),
            escape_html(package),
            html_text(description)
        )
    } else {
        format!(
            "<h2>New MVP Development Request</h2>\n\
             <h3>Client Information:</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Phone:</strong> {}</p>\n\
             <h3>Package:</h3>\n\
             <p>{}</p>\n\
             <h3>Project Description:</h3>\n\
             <p>{}</p>\n",
            escape_html(&data.contact.full_name()),
            escape_html(&data.contact.email),
            escape_html(phone),
            escape_html(package),
            html_text(description)
        )
    };

    EmailContent { subject, text, html }
}

/// Unrecognized form types relay the raw payload, pretty-printed.
pub fn generic_notification(form_type: &str, form_data: &Value, language: Language) -> EmailContent {
    let nl = is_nl(language);
    let pretty =
        serde_json::to_string_pretty(form_data).unwrap_or_else(|_| form_data.to_string());

    let subject = if nl {
        format!("Nieuw Formulier Bericht: {form_type}")
    } else {
        format!("New Form Submission: {form_type}")
    };

    let text = if nl {
        format!("Algemeen formulier bericht van {form_type} pagina:\n\n{pretty}\n")
    } else {
        format!("Generic form submission from {form_type} page:\n\n{pretty}\n")
    };

    let html = if nl {
        format!(
            "<h2>Algemeen formulier bericht van {} pagina:</h2>\n<pre>{}</pre>\n",
            escape_html(form_type),
            escape_html(&pretty)
        )
    } else {
        format!(
            "<h2>Generic form submission from {} page:</h2>\n<pre>{}</pre>\n",
            escape_html(form_type),
            escape_html(&pretty)
        )
    };

    EmailContent { subject, text, html }
}

/// Requester confirmation for a form submission. Pricing submissions get the
/// pricing wording; everything else is treated as a development request.
pub fn submission_confirmation(
    form_type: &str,
    first_name: &str,
    language: Language,
) -> EmailContent {
    let nl = is_nl(language);
    let pricing = form_type == "pricing";

    let subject = match (nl, pricing) {
        (true, true) => "Bedankt voor uw prijsaanvraag",
        (true, false) => "Bedankt voor uw MVP ontwikkelingsaanvraag",
        (false, true) => "Thank you for your pricing request",
        (false, false) => "Thank you for your MVP development request",
    }
    .to_string();

    let noun = match (nl, pricing) {
        (true, true) => "prijsaanvraag",
        (true, false) => "MVP ontwikkelingsaanvraag",
        (false, true) => "pricing request",
        (false, false) => "MVP development request",
    };

    let text = if nl {
        format!(
            "Beste {first_name},\n\n\
             Bedankt voor uw {noun} bij Sitequote. We hebben uw aanvraag ontvangen en zullen \
             zo snel mogelijk contact met u opnemen.\n\n\
             Met vriendelijke groet,\nHet Sitequote Team\n"
        )
    } else {
        format!(
            "Dear {first_name},\n\n\
             Thank you for your {noun} with Sitequote. We have received your submission and \
             will get back to you as soon as possible.\n\n\
             Best regards,\nThe Sitequote Team\n"
        )
    };

    let html = if nl {
        format!(
            "<p>Beste {},</p>\n\
             <p>Bedankt voor uw {noun} bij Sitequote. We hebben uw aanvraag ontvangen en \
             zullen zo snel mogelijk contact met u opnemen.</p>\n\
             <p>Met vriendelijke groet,<br>Het Sitequote Team</p>\n",
            escape_html(first_name)
        )
    } else {
        format!(
            "<p>Dear {},</p>\n\
             <p>Thank you for your {noun} with Sitequote. We have received your submission \
             and will get back to you as soon as possible.</p>\n\
             <p>Best regards,<br>The Sitequote Team</p>\n",
            escape_html(first_name)
        )
    };

    EmailContent { subject, text, html }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use sitequote_core::{ContactFields, ContactForm, Language, PackageDetails, PricingFormData};

    use super::{
        contact_confirmation, contact_notification, escape_html, generic_notification,
        pricing_notification, submission_confirmation,
    };

    fn contact_form(language: Language) -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            subject: "Availability".to_owned(),
            message: "First line\nSecond line".to_owned(),
            language,
        }
    }

    #[test]
    fn escapes_all_html_significant_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn markup_in_form_input_never_reaches_the_html_body() {
        let mut form = contact_form(Language::En);
        form.message = "<script>alert('x')</script>".to_owned();

        let content = contact_notification(&form);
        assert!(!content.html.contains("<script>"));
        assert!(content.html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        // The plain-text part carries the input verbatim.
        assert!(content.text.contains("<script>alert('x')</script>"));
    }

    #[test]
    fn newlines_become_br_after_escaping() {
        let mut form = contact_form(Language::En);
        form.message = "a < b\nnext".to_owned();

        let content = contact_notification(&form);
        assert!(content.html.contains("a &lt; b<br>next"));
    }

    #[test]
    fn contact_subject_is_localized() {
        let en = contact_notification(&contact_form(Language::En));
        assert_eq!(en.subject, "New Contact Form Submission: Availability");

        let nl = contact_notification(&contact_form(Language::Nl));
        assert_eq!(nl.subject, "Nieuw Contactformulier Bericht: Availability");
        assert!(nl.text.contains("Onderwerp: Availability"));
    }

    #[test]
    fn contact_confirmation_echoes_the_message() {
        let content = contact_confirmation(&contact_form(Language::En));
        assert!(content.text.contains("Here's a copy of your message:"));
        assert!(content.text.contains("First line\nSecond line"));
        assert!(content.html.contains("First line<br>Second line"));
    }

    #[test]
    fn pricing_notification_fills_placeholders_for_absent_fields() {
        let data = PricingFormData {
            contact: ContactFields {
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
                phone: None,
            },
            message: None,
            package_details: PackageDetails {
                client_type: "Company".to_owned(),
                ..PackageDetails::default()
            },
            language: Language::En,
        };

        let content = pricing_notification(&data);
        assert_eq!(content.subject, "New Pricing Form Submission: Custom Package");
        assert!(content.text.contains("Phone: Not provided"));
        assert!(content.text.contains("No additional message provided"));
        assert!(!content.text.contains("Tier:"), "absent detail lines are omitted");
    }

    #[test]
    fn generic_notification_pretty_prints_and_escapes_the_payload() {
        let content = generic_notification(
            "careers",
            &json!({ "role": "<lead>" }),
            Language::Nl,
        );
        assert_eq!(content.subject, "Nieuw Formulier Bericht: careers");
        assert!(content.text.contains("\"role\": \"<lead>\""));
        assert!(content.html.contains("&lt;lead&gt;"));
    }

    #[test]
    fn submission_confirmation_varies_by_form_type_and_language() {
        let pricing = submission_confirmation("pricing", "Ada", Language::En);
        assert_eq!(pricing.subject, "Thank you for your pricing request");

        let mvp = submission_confirmation("mvp", "Ada", Language::Nl);
        assert_eq!(mvp.subject, "Bedankt voor uw MVP ontwikkelingsaanvraag");
        assert!(mvp.text.contains("Beste Ada,"));
        assert!(mvp.html.contains("Het Sitequote Team"));
    }
}
