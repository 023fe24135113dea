use askama::Template;
use warp::{
    http::{header, Response},
    Rejection, Reply,
};

use crate::{
    backend::Backend,
    controller::{Controller, UiState},
    error::Error,
    form::FormState,
    models::{AppSummary, GeneratedArtifact, TEMPLATE},
};

/// The single page of the front-end.
#[derive(Template)]
#[template(path = "index.html")]
pub struct Page {
    pub api_base: String,
    pub fatal: Option<String>,
    pub status: Option<StatusView>,
    pub form: FormState,
    pub template: &'static str,
    pub error: Option<String>,
    pub loading_app: bool,
    pub generating: bool,
    pub has_artifact: bool,
    pub artifact: Option<GeneratedArtifact>,
    pub saved_path: Option<String>,
    pub apps: Vec<AppRow>,
}

/// Backend status tiles.
pub struct StatusView {
    pub org_url: String,
    pub token: &'static str,
}

pub struct AppRow {
    pub id: String,
    pub label: String,
    pub sign_on_mode: String,
    pub status: String,
}

impl From<AppSummary> for AppRow {
    fn from(app: AppSummary) -> Self {
        Self {
            id: app.id.unwrap_or_default(),
            label: app.label.unwrap_or(app.name),
            sign_on_mode: app.sign_on_mode.unwrap_or_default(),
            status: app.status.unwrap_or_default(),
        }
    }
}

impl Page {
    pub fn new(api_base: &str, state: UiState) -> Self {
        let loading_app = state.loading_app();
        let generating = state.generating();
        let status = state.config.as_ref().map(|config| StatusView {
            org_url: config.display_org_url().unwrap_or("—").to_owned(),
            token: if config.has_token { "present" } else { "missing" },
        });
        let artifact = state.artifact.filter(|a| !a.is_empty());
        Self {
            api_base: api_base.to_owned(),
            fatal: state.fatal,
            status,
            form: state.form,
            template: TEMPLATE,
            error: state.error,
            loading_app,
            generating,
            has_artifact: artifact.is_some(),
            artifact,
            saved_path: state.saved_path,
            apps: state.apps.into_iter().map(AppRow::from).collect(),
        }
    }
}

async fn render_page<B: Backend>(controller: &Controller<B>) -> Result<String, Error> {
    let page = Page::new(controller.api_base(), controller.snapshot().await);
    Ok(page.render()?)
}

/// Render the page from the current UI state.
#[tracing::instrument(level = "info", skip(controller))]
pub async fn index_handler<B: Backend>(controller: Controller<B>) -> Result<impl Reply, Rejection> {
    match render_page(&controller).await {
        Ok(html) => Ok(Response::builder()
            .status(200)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html)),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            Ok(Response::builder().status(500).body(String::new()))
        }
    }
}
