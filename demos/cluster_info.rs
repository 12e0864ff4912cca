//! Prints the board identity, node power states and SD card usage.
//!
//! Usage: TURINGPI_HOST=192.168.1.91 cargo run --example cluster_info

use turingpi_bmc::{BmcResult, Cluster};

#[tokio::main]
async fn main() -> BmcResult<()> {
    let host = std::env::var("TURINGPI_HOST").unwrap_or_else(|_| "192.168.1.91".to_string());

    let mut cluster = Cluster::builder()
        .host(host)
        .credentials("root", "turing")
        .accept_invalid_certs(true)
        .build()?;

    let about = cluster.about().await?;
    println!(
        "firmware {} (API {}), built {}",
        about.version(),
        about.api(),
        about.buildtime()
    );

    for node in cluster.nodes().await? {
        println!(
            "slot {}: {} is {}",
            node.slot(),
            node.name(),
            if node.powered_on() { "on" } else { "off" }
        );
    }

    let storage = cluster.sdcard_or_default().await?;
    println!(
        "sd card: {} of {} bytes used",
        storage.used_bytes(),
        storage.total_bytes()
    );

    if cluster.update_available().await? {
        println!("update available: {}", cluster.latest_version().await?);
    }

    Ok(())
}
