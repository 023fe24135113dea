//! Handlers for the buttons on the page.
//!
//! Each one applies the submitted field values, runs the controller action
//! and sends the browser back to `/` to render the outcome.
use warp::{
    http::{header, Response},
    Rejection, Reply,
};

use crate::{api::download_text, backend::Backend, controller::Controller, form::FormState};

fn back_to_page() -> Result<Response<String>, warp::http::Error> {
    Response::builder()
        .status(303)
        .header(header::LOCATION, "/")
        .body(String::new())
}

#[tracing::instrument(level = "info", skip(form, controller))]
pub async fn load_handler<B: Backend>(
    form: FormState,
    controller: Controller<B>,
) -> Result<impl Reply, Rejection> {
    controller.edit(form).await;
    controller.load_from_okta().await;
    Ok(back_to_page())
}

#[tracing::instrument(level = "info", skip(form, controller))]
pub async fn generate_handler<B: Backend>(
    form: FormState,
    controller: Controller<B>,
) -> Result<impl Reply, Rejection> {
    controller.edit(form).await;
    controller.generate_tf().await;
    Ok(back_to_page())
}

#[tracing::instrument(level = "info", skip(form, controller))]
pub async fn save_handler<B: Backend>(
    form: FormState,
    controller: Controller<B>,
) -> Result<impl Reply, Rejection> {
    controller.edit(form).await;
    controller.save_tf().await;
    Ok(back_to_page())
}

/// Hand the generated file to the browser as an attachment. Without one the
/// operator just lands back on the page.
#[tracing::instrument(level = "info", skip(controller))]
pub async fn download_handler<B: Backend>(
    controller: Controller<B>,
) -> Result<impl Reply, Rejection> {
    match controller.download_tf().await {
        Some(artifact) => Ok(download_text(&artifact.filename, artifact.content)),
        None => Ok(back_to_page()),
    }
}

#[tracing::instrument(level = "info", skip(form, controller))]
pub async fn scan_handler<B: Backend>(
    form: FormState,
    controller: Controller<B>,
) -> Result<impl Reply, Rejection> {
    controller.edit(form).await;
    controller.scan_apps().await;
    Ok(back_to_page())
}
