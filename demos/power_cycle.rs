//! Power-cycles node 1.
//!
//! Usage: TURINGPI_HOST=192.168.1.91 cargo run --example power_cycle

use std::time::Duration;
use turingpi_bmc::{BmcResult, Cluster};

#[tokio::main]
async fn main() -> BmcResult<()> {
    let host = std::env::var("TURINGPI_HOST").unwrap_or_else(|_| "192.168.1.91".to_string());

    let mut cluster = Cluster::builder()
        .host(host)
        .credentials("root", "turing")
        .accept_invalid_certs(true)
        .timeout(Duration::from_secs(10))
        .build()?;

    if !cluster.stop_node(1).await {
        eprintln!("stop command was not confirmed");
        return Ok(());
    }
    println!("node 1 stopped");

    tokio::time::sleep(Duration::from_secs(2)).await;

    if cluster.start_node(1).await {
        println!("node 1 started");
    } else {
        eprintln!("start command was not confirmed");
    }

    Ok(())
}
