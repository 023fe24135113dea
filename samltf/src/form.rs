//! The operator-editable form and its validation.
use serde::Deserialize;
use thiserror::Error;

use crate::models::{AppRecord, GenerateRequest, TEMPLATE};

/// First line of a PEM encoded certificate.
pub const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";

/// Validation failures. The messages are shown to the operator as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter an Okta App ID (e.g., 0oattcrmmgwZFhvkb697).")]
    MissingAppId,
    #[error("App Label is required.")]
    MissingAppLabel,
    #[error("SAML ACS URL is required.")]
    MissingAcsUrl,
    #[error("SAML Entity ID is required.")]
    MissingEntityId,
    #[error("IdP X509 Cert must be a PEM block with BEGIN/END lines.")]
    MalformedCertificate,
}

/// Current values of the form fields. Every page submission carries all of
/// them, which is how field edits reach the controller.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FormState {
    pub okta_app_id: String,
    pub app_label: String,
    pub sso_acs_url: String,
    pub sso_entity_id: String,
    pub idp_x509_cert: String,
    pub zoom_account_id: String,
}

impl FormState {
    /// Trimmed Okta app ID to look up.
    pub fn app_id(&self) -> Result<&str, ValidationError> {
        required(&self.okta_app_id, ValidationError::MissingAppId)
    }

    /// Overwrite the fields the app record has a non-empty value for.
    pub fn apply_app_record(&mut self, app: &AppRecord) {
        if let Some(label) = app.label() {
            self.app_label = label.to_owned();
        }
        if let Some(acs) = app.acs_url() {
            self.sso_acs_url = acs.to_owned();
        }
        if let Some(entity_id) = app.entity_id() {
            self.sso_entity_id = entity_id.to_owned();
        }
    }

    pub fn apply_certificate(&mut self, pem: &str) {
        self.idp_x509_cert = pem.trim().to_owned();
    }

    /// Validate the form and build the generator payload.
    ///
    /// Checks run in field order and only the first failure is reported.
    pub fn generate_request(&self) -> Result<GenerateRequest, ValidationError> {
        let app_label = required(&self.app_label, ValidationError::MissingAppLabel)?;
        let sso_acs_url = required(&self.sso_acs_url, ValidationError::MissingAcsUrl)?;
        let sso_entity_id = required(&self.sso_entity_id, ValidationError::MissingEntityId)?;
        let idp_x509_cert = self.idp_x509_cert.trim();
        if !is_pem_certificate(idp_x509_cert) {
            return Err(ValidationError::MalformedCertificate);
        }
        let zoom_account_id = Some(self.zoom_account_id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_owned);

        Ok(GenerateRequest {
            template: TEMPLATE,
            app_label: app_label.to_owned(),
            sso_acs_url: sso_acs_url.to_owned(),
            sso_entity_id: sso_entity_id.to_owned(),
            idp_x509_cert: idp_x509_cert.to_owned(),
            zoom_account_id,
        })
    }
}

fn required(value: &str, missing: ValidationError) -> Result<&str, ValidationError> {
    match value.trim() {
        "" => Err(missing),
        trimmed => Ok(trimmed),
    }
}

pub fn is_pem_certificate(text: &str) -> bool {
    text.contains(PEM_BEGIN)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PEM: &str = "-----BEGIN CERTIFICATE-----\nAAA\n-----END CERTIFICATE-----";

    fn filled() -> FormState {
        FormState {
            okta_app_id: "0oattcrmmgwZFhvkb697".into(),
            app_label: "Zoom SAML".into(),
            sso_acs_url: "https://zoom.us/saml/SSO".into(),
            sso_entity_id: "https://zoom.us".into(),
            idp_x509_cert: PEM.into(),
            zoom_account_id: String::new(),
        }
    }

    #[test]
    fn test_app_id_is_trimmed() {
        let form = FormState {
            okta_app_id: "  0oa1  ".into(),
            ..Default::default()
        };
        assert_eq!(form.app_id(), Ok("0oa1"));
        assert_eq!(FormState::default().app_id(), Err(ValidationError::MissingAppId));
    }

    #[test]
    fn test_first_failing_check_wins() {
        let form = FormState {
            app_label: "   ".into(),
            sso_acs_url: String::new(),
            ..filled()
        };
        assert_eq!(form.generate_request(), Err(ValidationError::MissingAppLabel));

        let form = FormState {
            sso_acs_url: "\t".into(),
            sso_entity_id: String::new(),
            ..filled()
        };
        assert_eq!(form.generate_request(), Err(ValidationError::MissingAcsUrl));

        let form = FormState {
            sso_entity_id: " ".into(),
            idp_x509_cert: String::new(),
            ..filled()
        };
        assert_eq!(form.generate_request(), Err(ValidationError::MissingEntityId));
    }

    #[test]
    fn test_certificate_needs_begin_marker() {
        let form = FormState {
            idp_x509_cert: "MIIC...\n-----END CERTIFICATE-----".into(),
            ..filled()
        };
        assert_eq!(
            form.generate_request(),
            Err(ValidationError::MalformedCertificate)
        );
    }

    #[test]
    fn test_generate_request_is_trimmed() {
        let form = FormState {
            app_label: "  Zoom SAML ".into(),
            sso_acs_url: " https://zoom.us/saml/SSO\n".into(),
            sso_entity_id: "https://zoom.us ".into(),
            idp_x509_cert: format!("\n{}\n\n", PEM),
            zoom_account_id: "  acct-1 ".into(),
            ..Default::default()
        };
        let request = form.generate_request().unwrap();
        assert_eq!(
            request,
            GenerateRequest {
                template: "zoom_saml_only",
                app_label: "Zoom SAML".into(),
                sso_acs_url: "https://zoom.us/saml/SSO".into(),
                sso_entity_id: "https://zoom.us".into(),
                idp_x509_cert: PEM.into(),
                zoom_account_id: Some("acct-1".into()),
            }
        );
    }

    #[test]
    fn test_app_record_only_overwrites_present_fields() {
        let mut form = FormState {
            app_label: "Edited".into(),
            sso_acs_url: "https://keep.example/acs".into(),
            ..Default::default()
        };
        form.apply_app_record(&AppRecord(json!({
            "settings": { "signOn": { "audience": "https://zoom.us" } }
        })));
        assert_eq!(form.app_label, "Edited");
        assert_eq!(form.sso_acs_url, "https://keep.example/acs");
        assert_eq!(form.sso_entity_id, "https://zoom.us");
    }
}
