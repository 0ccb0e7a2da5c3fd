use anyhow::Context;
use clap::{Parser, Subcommand};
use otodata_rs::ble::{AdvertisementFrame, PacketKind};
use otodata_rs::util::hex::parse_hex_lenient;
use otodata_rs::logging::log_info;
use otodata_rs::{
    init_logger, DecoderConfig, DeviceAddress, DeviceAttributeCache, EnrichmentStore,
    OtodataParser,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "otodata-cli")]
#[command(about = "CLI tool for Otodata propane tank monitors")]
struct Cli {
    /// Decoder config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enrichment store file; overrides the config file
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode captured manufacturer-specific data frames (hex), in order
    Decode {
        address: String,
        #[arg(required = true)]
        frames: Vec<String>,
    },
    /// Print the enrichment store
    Show,
    /// Read device information over GATT and cache it in the store
    #[cfg(feature = "ble")]
    Read {
        address: String,
        /// Connection timeout in seconds
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DecoderConfig::from_file(path)
            .with_context(|| format!("Could not load config {}", path.display()))?,
        None => DecoderConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Commands::Decode { address, frames } => decode(config, &address, &frames)?,
        Commands::Show => show(&config.store_path)?,
        #[cfg(feature = "ble")]
        Commands::Read { address, timeout } => {
            read::run(&config.store_path, &address, timeout).await?
        }
    }

    Ok(())
}

fn decode(config: DecoderConfig, address: &str, frames: &[String]) -> anyhow::Result<()> {
    let address: DeviceAddress = address.parse()?;
    let store = Arc::new(EnrichmentStore::open(&config.store_path));
    let parser = OtodataParser::new(config, Arc::new(DeviceAttributeCache::new()), store);

    for hex in frames {
        let data = parse_hex_lenient(hex).with_context(|| format!("Invalid frame hex: {hex}"))?;
        match parser.parse(&data, &address) {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => {
                let frame = AdvertisementFrame::new(&data, address);
                let kind = match frame.validate() {
                    Ok(()) => PacketKind::classify(&frame).kind,
                    Err(_) => PacketKind::Unrecognized,
                };
                println!("{kind:?} packet ({} bytes): no record", data.len());
            }
        }
    }

    if let Some(attrs) = parser.attributes().get(&address) {
        log_info(&format!(
            "Cached attributes: product={} model={}",
            attrs.product, attrs.model
        ));
    }
    Ok(())
}

fn show(store_path: &Path) -> anyhow::Result<()> {
    let store = EnrichmentStore::load_from_file(store_path)
        .with_context(|| format!("Could not load store {}", store_path.display()))?;
    println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
    Ok(())
}

#[cfg(feature = "ble")]
mod read {
    use anyhow::Context;
    use otodata_rs::enrichment::{read_with_session, BluestClient, DeviceInfoCharacteristic};
    use otodata_rs::logging::{log_info, log_warn};
    use otodata_rs::{DeviceAddress, EnrichmentStore};
    use std::path::Path;
    use std::time::Duration;

    /// Manual enrichment: exits non-zero only when the connection fails.
    pub async fn run(store_path: &Path, address: &str, timeout_secs: u64) -> anyhow::Result<()> {
        let address: DeviceAddress = address.parse()?;

        log_info(&format!("Connecting to {address}..."));
        let client = BluestClient::new().await.context("Bluetooth adapter unavailable")?;
        let report = read_with_session(&client, &address, Duration::from_secs(timeout_secs))
            .await
            .with_context(|| format!("Could not connect to {address}"))?;
        log_info(&format!("Finished reading {address}"));

        for characteristic in DeviceInfoCharacteristic::ALL {
            match report.record.get(characteristic) {
                Some(value) => println!("{}: {value}", characteristic.name()),
                None => {
                    let reason = report
                        .failures
                        .iter()
                        .find(|(c, _)| *c == characteristic)
                        .map(|(_, reason)| reason.as_str())
                        .unwrap_or("not available");
                    println!("Could not read {}: {reason}", characteristic.name());
                }
            }
        }

        let store = EnrichmentStore::open(store_path);
        if store.merge(&address, &report.record)? {
            log_info(&format!("Device info cached to: {}", store_path.display()));
        } else {
            log_warn("No device information could be read; store unchanged");
        }
        Ok(())
    }
}
