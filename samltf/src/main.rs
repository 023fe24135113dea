use std::net::SocketAddr;

use samltf::{app, backend::HttpBackend, config::Settings, controller::Controller};

const HELP: &str = "
samltf

USAGE:
    samltf [options]

FLAGS:
    -h, --help              Print this message

OPTIONS
    -p, --port             Port to run samltf on (default: 5173)
        --host             Host to run samltf on (default: 0.0.0.0)
        --api-base         Base URL of the generator backend
                           (default: $SAMLTF_API_BASE or http://localhost:8000)
";

struct AppArgs {
    /// Port on which the app should run.
    port: u16,
    /// Host to run the app on.
    host: String,
    /// Overrides the backend base URL from the environment.
    api_base: Option<String>,
}

fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        eprintln!("{}", HELP);
        std::process::exit(0);
    }

    let args = AppArgs {
        port: pargs.opt_value_from_str(["-p", "--port"])?.unwrap_or(5173),
        host: pargs
            .opt_value_from_str("--host")?
            .unwrap_or_else(|| "0.0.0.0".into()),
        api_base: pargs.opt_value_from_str("--api-base")?,
    };

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let settings = match args.api_base {
        Some(api_base) => Settings::with_api_base(&api_base)?,
        None => Settings::from_env()?,
    };
    let backend = HttpBackend::new(&settings)?;
    let api_base = backend.api().base().as_str().trim_end_matches('/').to_owned();
    let controller = Controller::new(backend, &api_base);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    // Build the app first so tracing is up before the status check logs.
    let filter = app(controller.clone());
    controller.load_backend_status().await;

    tracing::info!("Serving on http://{} against {}", addr, api_base);
    // Run the app on 0.0.0.0 by default so that it works in a container.
    warp::serve(filter).run(addr).await;
    Ok(())
}
