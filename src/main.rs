//! pinax server binary.
//!
//! Run with:
//!   RUST_LOG=info cargo run -- [config.toml]
//!
//! Try:
//!   curl http://localhost:3000/users
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"A","email":"a@x.com","phone":"1"}'
//!   curl -H 'authorization: mysecrettoken' http://localhost:3000/test-routes/valid-route
//!   curl http://localhost:3000/fail

use std::process::ExitCode;

use pinax::{ConfigLoader, Server, Stores, application, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("pinax: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), pinax::Error> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = std::env::args_os().nth(1) {
        loader = loader.with_file(path)?;
    }
    let config = loader.with_dotenv()?.with_env()?.load();

    logging::init(&config.log_level);
    info!(store = ?config.store, "starting");

    let stores = Stores::open(&config).await?;
    Server::bind(config.addr).serve(application(&config, stores)).await
}
