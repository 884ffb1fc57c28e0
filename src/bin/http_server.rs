//! HTTP Server Binary for the notihist API
//!
//! Usage:
//!   cargo run --bin http_server -- --host 0.0.0.0 --port 8080

use clap::Parser;
use notihist::http::start_server;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notihist HTTP Server")]
#[command(about = "HTTP API server decoding Android notification history artifacts", long_about = None)]
struct Args {
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        println!();
        println!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        result = start_server(&addr) => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        () = shutdown_signal => {
            println!("Server shut down gracefully");
        }
    }

    Ok(())
}
