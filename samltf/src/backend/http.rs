use async_trait::async_trait;

use super::{Backend, Result};
use crate::{
    api::ApiClient,
    config::Settings,
    models::{
        AppRecord, AppScan, BackendConfig, CertResult, GenerateRequest, GeneratedArtifact,
        SaveResult,
    },
};

/// [Backend] reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    api: ApiClient,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(settings.api_base.clone())?,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn config(&self) -> Result<BackendConfig> {
        self.api.get(&["config"], &[]).await
    }

    async fn app(&self, app_id: &str) -> Result<AppRecord> {
        self.api.get(&["apps", app_id], &[]).await
    }

    async fn saml_cert(&self, app_id: &str) -> Result<CertResult> {
        self.api.get(&["apps", app_id, "saml", "cert"], &[]).await
    }

    async fn generate_tf(&self, request: &GenerateRequest) -> Result<GeneratedArtifact> {
        self.api.post(&["tf", "generate"], request).await
    }

    async fn save_tf(&self, artifact: &GeneratedArtifact) -> Result<SaveResult> {
        self.api.post(&["files", "tf"], artifact).await
    }

    async fn scan_apps(&self, limit: u32) -> Result<AppScan> {
        let limit = limit.to_string();
        self.api.get(&["apps", "scan"], &[("limit", limit.as_str())]).await
    }
}
