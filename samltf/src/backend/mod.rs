//! Backend module
//!
//! This module defines a trait for the generator backend the front-end talks
//! to. The controller only sees this trait, the HTTP implementation lives in
//! [http].
use async_trait::async_trait;

use crate::{
    error::Error,
    models::{
        AppRecord, AppScan, BackendConfig, CertResult, GenerateRequest, GeneratedArtifact,
        SaveResult,
    },
};

mod http;

pub use http::HttpBackend;

/// Result of a backend call.
pub type Result<T> = std::result::Result<T, Error>;

#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Health and org information of the backend.
    async fn config(&self) -> Result<BackendConfig>;

    /// Get the Okta app record identified by `app_id`.
    async fn app(&self, app_id: &str) -> Result<AppRecord>;

    /// Get the SAML signing certificate of the app identified by `app_id`.
    async fn saml_cert(&self, app_id: &str) -> Result<CertResult>;

    /// Render the Terraform file for the validated form.
    async fn generate_tf(&self, request: &GenerateRequest) -> Result<GeneratedArtifact>;

    /// Write the artifact on the backend's side.
    async fn save_tf(&self, artifact: &GeneratedArtifact) -> Result<SaveResult>;

    /// List up to `limit` apps of the tenant.
    async fn scan_apps(&self, limit: u32) -> Result<AppScan>;
}
