//! Contact form handling.
//!
//! Submissions are validated and logged, then acknowledged with a reference
//! number. Nothing is forwarded anywhere: the form is a simulated submit.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::content::SiteContent;

/// Cities offered in the contact form's city selector.
pub const TUNISIAN_CITIES: &[&str] = &[
    "Tunis",
    "Sfax",
    "Sousse",
    "Kairouan",
    "Bizerte",
    "Gabès",
    "Ariana",
    "Gafsa",
    "Monastir",
    "Ben Arous",
    "Kasserine",
    "Médenine",
    "Nabeul",
    "Béja",
    "Jendouba",
    "Kébili",
    "Le Kef",
    "Mahdia",
    "Manouba",
    "Sidi Bouzid",
    "Siliana",
    "Tataouine",
    "Tozeur",
    "Zaghouan",
];

/// Longest accepted message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Why the visitor is getting in touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    TestDrive,
    Quotation,
    General,
    Financing,
    Charging,
    Service,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Purpose::TestDrive,
        Purpose::Quotation,
        Purpose::General,
        Purpose::Financing,
        Purpose::Charging,
        Purpose::Service,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::TestDrive => "test-drive",
            Purpose::Quotation => "quotation",
            Purpose::General => "general",
            Purpose::Financing => "financing",
            Purpose::Charging => "charging",
            Purpose::Service => "service",
        }
    }

    pub fn from_value(value: &str) -> Option<Purpose> {
        Purpose::ALL.into_iter().find(|p| p.as_str() == value)
    }

    /// Catalog key of the purpose's label.
    pub fn label_key(self) -> &'static str {
        match self {
            Purpose::TestDrive => "contact.purposes.testDrive",
            Purpose::Quotation => "contact.purposes.quotation",
            Purpose::General => "contact.purposes.general",
            Purpose::Financing => "contact.purposes.financing",
            Purpose::Charging => "contact.purposes.charging",
            Purpose::Service => "contact.purposes.service",
        }
    }
}

/// The raw form as posted. Every field is free text so that bad input
/// becomes a validation error rather than a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    /// One of `test-drive`, `quotation`, `general`, `financing`, `charging`, `service`.
    pub purpose: String,
    /// Model slug, optional.
    pub model: String,
    pub message: String,
}

impl ContactForm {
    /// An empty form, prefilled from `?purpose=&model=` the way the site's
    /// "book a test drive" and "request a quote" links do.
    pub fn prefilled(purpose: Option<&str>, model: Option<&str>) -> Self {
        let purpose = purpose
            .and_then(Purpose::from_value)
            .unwrap_or(Purpose::General);
        Self {
            purpose: purpose.as_str().to_string(),
            model: model.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }
}

/// One invalid field and the catalog key of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub key: &'static str,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub purpose: Purpose,
    pub model: Option<String>,
    pub message: String,
}

/// Checks every field, collecting all errors.
pub fn validate(form: &ContactForm, content: &SiteContent) -> Result<ContactRequest, Vec<FieldError>> {
    let mut errors = Vec::new();
    let required = "contact.errors.required";

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(FieldError { field: "name", key: required });
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError { field: "email", key: required });
    } else if !is_plausible_email(email) {
        errors.push(FieldError { field: "email", key: "contact.errors.email" });
    }

    let phone = form.phone.trim();
    if phone.is_empty() {
        errors.push(FieldError { field: "phone", key: required });
    } else if !is_plausible_phone(phone) {
        errors.push(FieldError { field: "phone", key: "contact.errors.phone" });
    }

    let city = form.city.trim();
    if city.is_empty() {
        errors.push(FieldError { field: "city", key: required });
    } else if !TUNISIAN_CITIES.contains(&city) {
        errors.push(FieldError { field: "city", key: "contact.errors.city" });
    }

    let purpose = Purpose::from_value(form.purpose.trim());
    if purpose.is_none() {
        errors.push(FieldError { field: "purpose", key: "contact.errors.purpose" });
    }

    let model = form.model.trim();
    if !model.is_empty() && content.model(model).is_none() {
        errors.push(FieldError { field: "model", key: "contact.errors.model" });
    }

    let message = form.message.trim();
    if message.is_empty() {
        errors.push(FieldError { field: "message", key: required });
    } else if message.chars().count() > MAX_MESSAGE_CHARS {
        errors.push(FieldError { field: "message", key: "contact.errors.messageLength" });
    }

    match purpose {
        Some(purpose) if errors.is_empty() => Ok(ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
            purpose,
            model: (!model.is_empty()).then(|| model.to_string()),
            message: message.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Accepts the submission and returns its reference number.
pub fn submit(request: &ContactRequest) -> Uuid {
    let reference = Uuid::new_v4();
    log::info!(
        "Contact request {} from {} ({}): purpose={} model={}",
        reference,
        request.city,
        request.email,
        request.purpose.as_str(),
        request.model.as_deref().unwrap_or("-")
    );
    reference
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Digits with optional spaces, dashes and a leading `+`; at least 8 digits.
fn is_plausible_phone(phone: &str) -> bool {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    digits >= 8 && body.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Amira Ben Salah".into(),
            email: "amira@example.tn".into(),
            phone: "+216 98 123 456".into(),
            city: "Sfax".into(),
            purpose: "test-drive".into(),
            model: "ev3".into(),
            message: "Je souhaite essayer l'EV3.".into(),
        }
    }

    fn content() -> SiteContent {
        SiteContent::load_bundled().unwrap()
    }

    #[test]
    fn test_valid_form_passes() {
        let request = validate(&valid_form(), &content()).unwrap();
        assert_eq!(request.purpose, Purpose::TestDrive);
        assert_eq!(request.model.as_deref(), Some("ev3"));
        assert_eq!(request.city, "Sfax");
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = validate(&ContactForm::default(), &content()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "phone", "city", "purpose", "message"]);
    }

    #[test]
    fn test_invalid_values() {
        let form = ContactForm {
            email: "not-an-email".into(),
            phone: "12ab".into(),
            city: "Paris".into(),
            purpose: "lunch".into(),
            model: "ev9".into(),
            ..valid_form()
        };
        let errors = validate(&form, &content()).unwrap_err();
        let keys: Vec<_> = errors.iter().map(|e| e.key).collect();
        assert_eq!(
            keys,
            vec![
                "contact.errors.email",
                "contact.errors.phone",
                "contact.errors.city",
                "contact.errors.purpose",
                "contact.errors.model",
            ]
        );
    }

    #[test]
    fn test_message_length_limit() {
        let form = ContactForm {
            message: "x".repeat(MAX_MESSAGE_CHARS + 1),
            ..valid_form()
        };
        let errors = validate(&form, &content()).unwrap_err();
        assert_eq!(errors[0].key, "contact.errors.messageLength");
    }

    #[test]
    fn test_model_is_optional() {
        let form = ContactForm {
            model: String::new(),
            purpose: "general".into(),
            ..valid_form()
        };
        let request = validate(&form, &content()).unwrap();
        assert_eq!(request.model, None);
    }

    #[test]
    fn test_prefilled() {
        let form = ContactForm::prefilled(Some("quotation"), Some("elight"));
        assert_eq!(form.purpose, "quotation");
        assert_eq!(form.model, "elight");

        let form = ContactForm::prefilled(Some("bogus"), None);
        assert_eq!(form.purpose, "general");
        assert!(form.model.is_empty());
    }

    #[test]
    fn test_email_and_phone_checks() {
        assert!(is_plausible_email("a@b.tn"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.tn"));
        assert!(!is_plausible_email("a@@b.tn"));
        assert!(is_plausible_phone("71 123 456"));
        assert!(is_plausible_phone("+21671123456"));
        assert!(!is_plausible_phone("1234"));
    }
}
