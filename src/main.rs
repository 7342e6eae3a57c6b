// SPDX-License-Identifier: MPL-2.0
use iced_gallery::app::{self, Flags, Parsed, USAGE};
use iced_gallery::config;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn,iced_gallery=info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    let flags = match Flags::from_env() {
        Ok(Parsed::Run(flags)) => flags,
        Ok(Parsed::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(error) => {
            eprintln!("error: {error}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    config::paths::init_cli_override(flags.config_dir.clone());
    app::run(flags)
}
