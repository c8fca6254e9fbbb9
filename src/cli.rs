use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use gpsd_exporter::{projection::DEFAULT_DEVICE, settings::Settings};

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self::from_args(std::env::args_os())
    }

    fn command() -> Command {
        Command::new("gpsd-exporter")
            .version(env!("CARGO_PKG_VERSION"))
            .about("GPSD reports to Prometheus metrics exporter")
            .color(ColorChoice::Always)
            .next_help_heading("GPSD")
            .arg(
                Arg::new("gpsd-address")
                    .long("gpsd-address")
                    .value_name("HOST:PORT")
                    .action(ArgAction::Set)
                    .default_value("127.0.0.1:2947")
                    .help("Address of the GPSD daemon"),
            )
            .arg(
                Arg::new("default-device")
                    .long("default-device")
                    .value_name("DEVICE")
                    .action(ArgAction::Set)
                    .default_value(DEFAULT_DEVICE)
                    .help("Device label attached to reports that do not name their device"),
            )
            .next_help_heading("HTTP")
            .arg(
                Arg::new("listen-address")
                    .long("listen-address")
                    .value_name("HOST:PORT")
                    .action(ArgAction::Set)
                    .default_value("0.0.0.0:9477")
                    .help("Address to listen on for HTTP requests"),
            )
            .arg(
                Arg::new("metrics-path")
                    .long("metrics-path")
                    .value_name("PATH")
                    .action(ArgAction::Set)
                    .default_value("/metrics")
                    .help("HTTP path for the metrics endpoint"),
            )
    }

    fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self {
            matches: Self::command().get_matches_from(args),
        }
    }

    fn value(&self, id: &str) -> String {
        self.matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_else(|| panic!("missing --{} value", id))
    }

    pub fn settings(&self) -> Settings {
        let metrics_path = self.value("metrics-path");

        if !metrics_path.starts_with('/') {
            panic!("Invalid metrics path \"{}\": must start with '/'", metrics_path);
        }

        Settings {
            metrics_path,
            listen_address: self.value("listen-address"),
            gpsd_address: self.value("gpsd-address"),
            default_device: self.value("default-device"),
        }
    }
}
