mod cli;
mod demo;
mod server;

use uic_registry::error::AppError;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    cli::run().await
}
