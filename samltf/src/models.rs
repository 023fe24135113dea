//! Shapes exchanged with the generator backend.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only generator template this front-end drives. The backend enforces
/// Zoom's NameID rules (email, emailAddress format) for it.
pub const TEMPLATE: &str = "zoom_saml_only";

/// Backend health and org information from `GET /config`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BackendConfig {
    #[serde(default)]
    pub org_url: Option<String>,
    #[serde(default)]
    pub used_org_url: Option<String>,
    #[serde(default)]
    pub has_token: bool,
}

impl BackendConfig {
    /// Org URL to show the operator, `org_url` before `used_org_url`.
    pub fn display_org_url(&self) -> Option<&str> {
        self.org_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| self.used_org_url.as_deref().filter(|url| !url.is_empty()))
    }
}

/// An Okta application record. Only a handful of fields are ever read so the
/// document is kept as raw JSON.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct AppRecord(pub Value);

impl AppRecord {
    pub fn label(&self) -> Option<&str> {
        non_empty_str(self.0.get("label"))
    }

    /// ACS URL, `recipient` wins over `ssoAcsUrl`.
    pub fn acs_url(&self) -> Option<&str> {
        self.sign_on("recipient")
            .or_else(|| self.sign_on("ssoAcsUrl"))
    }

    /// SP entity ID, `audience` wins over `idpIssuer`.
    pub fn entity_id(&self) -> Option<&str> {
        self.sign_on("audience")
            .or_else(|| self.sign_on("idpIssuer"))
    }

    fn sign_on(&self, key: &str) -> Option<&str> {
        non_empty_str(
            self.0
                .get("settings")
                .and_then(|settings| settings.get("signOn"))
                .and_then(|sign_on| sign_on.get(key)),
        )
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Signing certificate pulled out of the app's SAML metadata.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CertResult {
    #[serde(default)]
    pub pem: Option<String>,
    /// Set by the backend when the metadata had no certificate.
    #[serde(default)]
    pub note: Option<String>,
}

impl CertResult {
    pub fn pem(&self) -> Option<&str> {
        self.pem.as_deref().filter(|pem| !pem.is_empty())
    }
}

/// Body of `POST /tf/generate`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub template: &'static str,
    pub app_label: String,
    pub sso_acs_url: String,
    pub sso_entity_id: String,
    pub idp_x509_cert: String,
    /// Relay state for Zoom, only sent when the operator filled it in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_account_id: Option<String>,
}

/// The rendered Terraform file. Also the body of `POST /files/tf`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GeneratedArtifact {
    pub filename: String,
    pub content: String,
}

impl GeneratedArtifact {
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty() || self.content.is_empty()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SaveResult {
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub path: Option<String>,
}

/// Response of `GET /apps/scan`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AppScan {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub apps: Vec<AppSummary>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AppSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "signOnMode")]
    pub sign_on_mode: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn app(sign_on: Value) -> AppRecord {
        AppRecord(json!({ "label": "Zoom SAML", "settings": { "signOn": sign_on } }))
    }

    #[test]
    fn test_recipient_wins_over_sso_acs_url() {
        let record = app(json!({
            "recipient": "https://zoom.us/saml/SSO",
            "ssoAcsUrl": "https://other.example/acs",
        }));
        assert_eq!(record.acs_url(), Some("https://zoom.us/saml/SSO"));
    }

    #[test]
    fn test_sso_acs_url_used_when_recipient_missing_or_empty() {
        let record = app(json!({ "ssoAcsUrl": "https://other.example/acs" }));
        assert_eq!(record.acs_url(), Some("https://other.example/acs"));

        let record = app(json!({ "recipient": "", "ssoAcsUrl": "https://other.example/acs" }));
        assert_eq!(record.acs_url(), Some("https://other.example/acs"));
    }

    #[test]
    fn test_audience_wins_over_idp_issuer() {
        let record = app(json!({
            "audience": "https://zoom.us",
            "idpIssuer": "http://www.okta.com/${org.externalKey}",
        }));
        assert_eq!(record.entity_id(), Some("https://zoom.us"));

        let record = app(json!({ "idpIssuer": "http://www.okta.com/exk1" }));
        assert_eq!(record.entity_id(), Some("http://www.okta.com/exk1"));
    }

    #[test]
    fn test_missing_settings_yield_nothing() {
        let record = AppRecord(json!({ "id": "0oa1", "settings": null }));
        assert_eq!(record.label(), None);
        assert_eq!(record.acs_url(), None);
        assert_eq!(record.entity_id(), None);
    }

    #[test]
    fn test_non_string_values_are_ignored() {
        let record = AppRecord(json!({
            "label": 42,
            "settings": { "signOn": {
                "recipient": { "nested": true },
                "ssoAcsUrl": "https://a/acs",
            } },
        }));
        assert_eq!(record.label(), None);
        assert_eq!(record.acs_url(), Some("https://a/acs"));
    }

    #[test]
    fn test_display_org_url_prefers_org_url() {
        let config: BackendConfig = serde_json::from_value(json!({
            "org_url": "",
            "used_org_url": "https://acme.okta.com...",
            "has_token": true,
            "cors": ["http://localhost:5173"],
        }))
        .unwrap();
        assert_eq!(config.display_org_url(), Some("https://acme.okta.com..."));
        assert!(config.has_token);
        assert_eq!(BackendConfig::default().display_org_url(), None);
    }

    #[test]
    fn test_generate_request_omits_blank_relay_state() {
        let request = GenerateRequest {
            template: TEMPLATE,
            app_label: "Zoom SAML".into(),
            sso_acs_url: "https://zoom.us/saml/SSO".into(),
            sso_entity_id: "https://zoom.us".into(),
            idp_x509_cert: "pem".into(),
            zoom_account_id: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["template"], "zoom_saml_only");
        assert!(body.get("zoom_account_id").is_none());
    }

    #[test]
    fn test_cert_result_without_pem() {
        let cert: CertResult = serde_json::from_value(json!({
            "pem": null,
            "note": "No X509Certificate found in metadata",
        }))
        .unwrap();
        assert_eq!(cert.pem(), None);
        let cert: CertResult = serde_json::from_value(json!({ "pem": "" })).unwrap();
        assert_eq!(cert.pem(), None);
    }
}
