#![doc = include_str!("../README.md")]

/*
 * GPSD-EXPORTER exposes GPSD reports as Prometheus metrics.
 * This crate is shipped under Mozilla Public V2 license.
 */

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use env_logger::{Builder, Target};

use log::{error, info};

use tokio::signal;

mod cli;
mod http;

use crate::cli::Cli;

use gpsd_exporter::prelude::{Cache, Client, Exporter, Runtime, Settings};

/// Connects to GPSD, wires the report callbacks to the [Cache]
/// and enables the report stream.
fn deploy_session(
    settings: &Settings,
    runtime: Arc<Runtime>,
    cache: Arc<Cache>,
) -> gpsd_exporter::error::Result<Client> {
    let mut client = Client::connect_with_runtime(&settings.gpsd_address, runtime)?;

    client.on_version(|version| {
        info!("{}", version);
    });

    let sky_cache = Arc::clone(&cache);
    client.on_sky(move |sky| sky_cache.set_latest_sky(sky));

    client.on_tpv(move |tpv| cache.set_latest_tpv(tpv));

    client.enable_streaming()?;

    Ok(client)
}

#[tokio::main]
pub async fn main() {
    let mut builder = Builder::from_default_env();

    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    // cli
    let cli = Cli::new();
    let settings = cli.settings();

    let runtime = Arc::new(Runtime::default());
    let cache = Arc::new(Cache::default());

    let exporter = Arc::new(Exporter::new(
        Arc::clone(&cache),
        Arc::clone(&runtime),
        &settings.default_device,
    ));

    let mut client = match deploy_session(&settings, Arc::clone(&runtime), cache) {
        Ok(client) => client,
        Err(e) => {
            error!("{} - {}", runtime.timestamp(), e);
            std::process::exit(1);
        },
    };

    let stopping = Arc::new(AtomicBool::new(false));
    let closer = client.closer();

    // session task
    {
        let stopping = Arc::clone(&stopping);
        let runtime = Arc::clone(&runtime);

        tokio::task::spawn_blocking(move || {
            let e = client.run();

            if stopping.load(Ordering::Relaxed) {
                info!("{} - gpsd session closed", runtime.timestamp());
                std::process::exit(0);
            }

            error!("{} - gpsd session terminated: {}", runtime.timestamp(), e);
            std::process::exit(1);
        });
    }

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(_) => {
                info!("shutting down");
                stopping.store(true, Ordering::Relaxed);
                closer.close();
            },
            Err(e) => {
                error!("signal handling error: {}", e);
            },
        }
    });

    info!(
        "{} - gpsd-exporter v{} deployed",
        runtime.timestamp(),
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = http::serve(&settings.listen_address, &settings.metrics_path, exporter).await {
        error!("{} - http server: {}", runtime.timestamp(), e);
        std::process::exit(1);
    }
}
