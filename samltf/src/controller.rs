//! UI state and the actions the operator can trigger on it.
//!
//! Every action follows the same shape: clear the previous outcome under the
//! lock, release it for the network calls, then take it again to apply the
//! result. The lock is never held across an await on the backend.
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    backend::Backend,
    error::Error,
    form::FormState,
    models::{AppSummary, BackendConfig, GeneratedArtifact},
};

/// How many apps a scan asks the backend for.
pub const SCAN_LIMIT: u32 = 200;

/// Tracks the newest request of one action so older responses can be dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Flight {
    generation: u64,
    in_flight: bool,
}

impl Flight {
    fn start(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Land the request `generation`. Returns `false` if a newer one started
    /// meanwhile, in which case the caller must not touch the state.
    fn land(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.in_flight = false;
        true
    }
}

/// Everything the page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub config: Option<BackendConfig>,
    /// Set when the backend couldn't be reached at startup.
    pub fatal: Option<String>,
    pub form: FormState,
    pub artifact: Option<GeneratedArtifact>,
    pub saved_path: Option<String>,
    pub error: Option<String>,
    pub apps: Vec<AppSummary>,
    pub(crate) lookup: Flight,
    pub(crate) generate: Flight,
}

impl UiState {
    pub fn loading_app(&self) -> bool {
        self.lookup.in_flight
    }

    pub fn generating(&self) -> bool {
        self.generate.in_flight
    }

    fn clear_outcome(&mut self) {
        self.error = None;
        self.saved_path = None;
        self.artifact = None;
    }
}

/// Owns the UI state and sequences the backend calls for each action.
pub struct Controller<B> {
    backend: Arc<B>,
    api_base: Arc<str>,
    state: Arc<Mutex<UiState>>,
}

impl<B> Clone for Controller<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            api_base: self.api_base.clone(),
            state: self.state.clone(),
        }
    }
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: B, api_base: &str) -> Self {
        Self {
            backend: Arc::new(backend),
            api_base: api_base.into(),
            state: Arc::new(Mutex::new(UiState::default())),
        }
    }

    /// Base URL of the backend, as shown to the operator.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn snapshot(&self) -> UiState {
        self.state.lock().await.clone()
    }

    /// Replace the form fields with the values the operator submitted.
    pub async fn edit(&self, form: FormState) {
        self.state.lock().await.form = form;
    }

    /// Fetch the backend's config. Any failure is fatal for the session.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn load_backend_status(&self) {
        let result = self.backend.config().await;
        let mut state = self.state.lock().await;
        match result {
            Ok(config) => {
                tracing::info!(
                    org_url = ?config.display_org_url(),
                    has_token = config.has_token,
                    "Backend reachable"
                );
                state.config = Some(config);
            }
            Err(e) => {
                tracing::error!("Failed to load backend config: {}", e);
                state.fatal = Some(format!(
                    "Cannot reach backend at {}. Is it running?",
                    self.api_base
                ));
            }
        }
    }

    /// Pull label, ACS URL, entity ID and signing certificate of the Okta app
    /// named in the form.
    ///
    /// Fields filled from the app record stay filled even when the
    /// certificate lookup fails afterwards.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn load_from_okta(&self) {
        let (generation, app_id) = {
            let mut state = self.state.lock().await;
            state.clear_outcome();
            let app_id = match state.form.app_id() {
                Ok(app_id) => app_id.to_owned(),
                Err(e) => {
                    state.error = Some(e.to_string());
                    return;
                }
            };
            (state.lookup.start(), app_id)
        };

        let result = self.run_lookup(generation, &app_id).await;

        let mut state = self.state.lock().await;
        if !state.lookup.land(generation) {
            tracing::debug!("Dropping stale lookup {} of {}", generation, app_id);
            return;
        }
        if let Err(e) = result {
            tracing::warn!("Lookup of {} failed: {}", app_id, e);
            state.error = Some(format!("Failed to load from Okta: {}", e));
        }
    }

    async fn run_lookup(&self, generation: u64, app_id: &str) -> Result<(), Error> {
        let app = self.backend.app(app_id).await?;
        {
            let mut state = self.state.lock().await;
            if state.lookup.is_current(generation) {
                state.form.apply_app_record(&app);
            }
        }

        let cert = self.backend.saml_cert(app_id).await?;
        let pem = match cert.pem() {
            Some(pem) => pem,
            None => {
                tracing::warn!(note = ?cert.note, "No certificate for {}", app_id);
                return Err(Error::MissingCertificate);
            }
        };
        let mut state = self.state.lock().await;
        if state.lookup.is_current(generation) {
            state.form.apply_certificate(pem);
        }
        Ok(())
    }

    /// Validate the form and have the backend render the Terraform file.
    ///
    /// Nothing is sent when validation fails.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn generate_tf(&self) {
        let (generation, request) = {
            let mut state = self.state.lock().await;
            state.clear_outcome();
            let request = match state.form.generate_request() {
                Ok(request) => request,
                Err(e) => {
                    tracing::debug!("Form rejected: {}", e);
                    state.error = Some(e.to_string());
                    return;
                }
            };
            (state.generate.start(), request)
        };

        let result = self.backend.generate_tf(&request).await;

        let mut state = self.state.lock().await;
        if !state.generate.land(generation) {
            tracing::debug!("Dropping stale generation {}", generation);
            return;
        }
        match result {
            Ok(artifact) => {
                tracing::info!("Generated {}", artifact.filename);
                state.artifact = Some(artifact);
            }
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                state.error = Some(format!("Failed to generate: {}", e));
            }
        }
    }

    /// Ask the backend to write the generated file. Does nothing until
    /// something was generated.
    ///
    /// The outcome is dropped if the artifact was replaced or cleared while
    /// the save was in flight.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn save_tf(&self) {
        let (generation, artifact) = {
            let mut state = self.state.lock().await;
            let artifact = match state.artifact.as_ref().filter(|a| !a.is_empty()) {
                Some(artifact) => artifact.clone(),
                None => return,
            };
            state.error = None;
            (state.generate.generation, artifact)
        };

        let result = self.backend.save_tf(&artifact).await;

        let mut state = self.state.lock().await;
        if !state.generate.is_current(generation) || state.artifact.as_ref() != Some(&artifact) {
            tracing::debug!("Dropping save of {}, artifact changed", artifact.filename);
            return;
        }
        match result {
            Ok(saved) => match (saved.saved, saved.path) {
                (true, Some(path)) => {
                    tracing::info!("Saved {} to {}", artifact.filename, path);
                    state.saved_path = Some(path);
                }
                _ => tracing::warn!("Backend did not save {}", artifact.filename),
            },
            Err(e) => {
                tracing::error!("Saving {} failed: {}", artifact.filename, e);
                state.error = Some(format!("Failed to save: {}", e));
            }
        }
    }

    /// The artifact to hand to the browser, if there is one.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn download_tf(&self) -> Option<GeneratedArtifact> {
        let state = self.state.lock().await;
        state.artifact.clone().filter(|a| !a.is_empty())
    }

    /// List the tenant's apps so the operator can pick an app ID.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn scan_apps(&self) {
        self.state.lock().await.error = None;

        let result = self.backend.scan_apps(SCAN_LIMIT).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(scan) => {
                tracing::info!("Scan returned {} apps", scan.count);
                state.apps = scan.apps;
            }
            Err(e) => {
                tracing::warn!("Scan failed: {}", e);
                state.error = Some(format!("Failed to scan apps: {}", e));
            }
        }
    }
}
