//! Prints the reports streamed by a GPSD daemon until the session fails.
use clap::{Arg, ArgAction, ColorChoice, Command};
use env_logger::{Builder, Target};
use log::{error, info, warn};

use gpsd_exporter::prelude::Client;

fn main() {
    let mut builder = Builder::from_default_env();

    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let matches = Command::new("gpsd-watch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints the reports streamed by a GPSD daemon")
        .color(ColorChoice::Always)
        .arg(
            Arg::new("gpsd-address")
                .long("gpsd-address")
                .value_name("HOST:PORT")
                .action(ArgAction::Set)
                .default_value("127.0.0.1:2947")
                .help("Address of the GPSD daemon"),
        )
        .get_matches();

    let address = matches
        .get_one::<String>("gpsd-address")
        .map(String::as_str)
        .unwrap_or("127.0.0.1:2947");

    let mut client = Client::connect(address).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    client.on_version(|version| info!("VERSION {}", version));

    client.on_sky(|sky| {
        info!(
            "SKY {} - {} satellites, {} used",
            sky.device.as_deref().unwrap_or("?"),
            sky.satellites.len(),
            sky.used()
        );
        for sat in sky.satellites.iter() {
            info!(
                "  PRN {:>3} el={:?} az={:?} ss={:?} used={}",
                sat.prn, sat.elevation, sat.azimuth, sat.signal_to_noise, sat.used
            );
        }
    });

    client.on_tpv(|tpv| {
        info!("TPV {} - {}", tpv.device.as_deref().unwrap_or("?"), tpv);
    });

    client.on_unknown(|class| warn!("{} report not handled", class));

    if let Err(e) = client.enable_streaming() {
        error!("{}", e);
        std::process::exit(1);
    }

    let e = client.run();
    error!("{}", e);

    let runtime = client.runtime();
    info!(
        "session uptime {} - {} unknown reports",
        runtime.uptime(),
        runtime.unknown_reports()
    );

    client.close();
    std::process::exit(1);
}
