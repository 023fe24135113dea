pub mod actions;
pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod models;
pub mod page;
pub mod ping;

use crate::{
    actions::{download_handler, generate_handler, load_handler, save_handler, scan_handler},
    backend::Backend,
    controller::Controller,
    form::FormState,
    page::index_handler,
    ping::ping_handler,
};
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Rejection, Reply};

/// Largest form submission accepted. A PEM certificate is a few KiB.
const FORM_LIMIT: u64 = 64 * 1024;

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "samltf=debug,warp=info".to_owned());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Filter to inject the [Controller] into the request handler.
pub fn with_controller<B: Backend>(
    controller: Controller<B>,
) -> impl Filter<Extract = (Controller<B>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || controller.clone())
}

fn form_body() -> impl Filter<Extract = (FormState,), Error = Rejection> + Clone {
    warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form())
}

/// Return a warp app with everything wired up.
///
/// This will setup:
///     - Logging and tracing
///     - Controller injection
///     - Routing
pub fn app<B: Backend>(
    controller: Controller<B>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    init_tracing();

    let index = warp::path::end()
        .and(warp::get())
        .and(with_controller(controller.clone()))
        .and_then(index_handler::<B>)
        .with(warp::trace::named("index"));

    let ping = warp::path!("ping")
        .and(warp::get())
        .and_then(ping_handler)
        .with(warp::trace::named("ping"));

    let load = warp::path!("load")
        .and(warp::post())
        .and(form_body())
        .and(with_controller(controller.clone()))
        .and_then(load_handler::<B>)
        .with(warp::trace::named("load-from-okta"));

    let generate = warp::path!("generate")
        .and(warp::post())
        .and(form_body())
        .and(with_controller(controller.clone()))
        .and_then(generate_handler::<B>)
        .with(warp::trace::named("generate-tf"));

    let save = warp::path!("save")
        .and(warp::post())
        .and(form_body())
        .and(with_controller(controller.clone()))
        .and_then(save_handler::<B>)
        .with(warp::trace::named("save-tf"));

    let download = warp::path!("download")
        .and(warp::get())
        .and(with_controller(controller.clone()))
        .and_then(download_handler::<B>)
        .with(warp::trace::named("download-tf"));

    let scan = warp::path!("apps" / "scan")
        .and(warp::post())
        .and(form_body())
        .and(with_controller(controller))
        .and_then(scan_handler::<B>)
        .with(warp::trace::named("scan-apps"));

    index
        .or(ping)
        .or(load)
        .or(generate)
        .or(save)
        .or(download)
        .or(scan)
        .with(warp::trace::request())
}
