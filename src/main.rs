//! q-audit CLI entry point
//!
//! Randomness auditor for quantum and pseudorandom bit sources

use q_audit::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
