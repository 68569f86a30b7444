//! The embedded reference form documents.

use formflow_contracts::{document::FormDocument, error::FormResult};
use formflow_rules::document::from_toml_str;

pub const CONTACT_FORM: &str = include_str!("../forms/contact.toml");
pub const ORDER_FORM: &str = include_str!("../forms/order.toml");
pub const REGISTRATION_FORM: &str = include_str!("../forms/registration.toml");

pub fn contact() -> FormResult<FormDocument> {
    from_toml_str(CONTACT_FORM)
}

pub fn order() -> FormResult<FormDocument> {
    from_toml_str(ORDER_FORM)
}

pub fn registration() -> FormResult<FormDocument> {
    from_toml_str(REGISTRATION_FORM)
}

#[cfg(test)]
mod tests {
    use formflow_rules::check_document;

    use super::{contact, order, registration};

    #[test]
    fn reference_forms_load_without_findings() {
        for document in [contact(), order(), registration()] {
            let document = document.unwrap();
            let findings = check_document(&document);
            assert!(findings.is_empty(), "{}: {:?}", document.form.id, findings);
        }
    }
}
