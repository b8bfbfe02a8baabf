use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use workout_engine::cli::{run, Cli};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  if let Err(err) = run(cli).await {
    eprintln!("Error: {}", err);
    std::process::exit(1);
  }
}
