use clap::Parser;
use shop_page::{Catalog, GatewayConfig, ViewConfig, gateway};
use std::error::Error;
use std::path::PathBuf;

mod args;
use args::{Args, Command, OutputFormat};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Command::Serve { config, port } => serve(config, port).await,
        Command::Browse {
            gateway_url,
            config,
            page,
            format,
        } => browse(gateway_url, config, page, format).await,
    };

    if let Err(e) = result {
        ::log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn serve(config: Option<PathBuf>, port: Option<u16>) -> Result<(), Box<dyn Error>> {
    let mut config = match config {
        Some(path) => {
            ::log::info!("Loading gateway configuration from {}", path.display());
            GatewayConfig::from_file(path)?.with_env_fallback()
        }
        None => GatewayConfig::from_env(),
    };
    if let Some(port) = port {
        config.port = port;
    }

    gateway::serve(config).await
}

async fn browse(
    gateway_url: Option<String>,
    config: Option<PathBuf>,
    page: u32,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let mut catalog = Catalog::new(&ViewConfig::default().gateway_url);
    if let Some(path) = config {
        catalog = catalog.with_config_file(path)?;
    }
    if let Some(url) = gateway_url {
        catalog = catalog.with_config(ViewConfig::new(&url));
    }

    ::log::info!("Browsing catalog through {}", catalog.config().gateway_url);
    let mut view = catalog.open()?;
    view.mount().await;
    view.walk_to(page).await;

    match format {
        OutputFormat::Text => print!("{}", view.render_text()),
        OutputFormat::Html => print!("{}", view.render_html()),
    }

    match view.error() {
        Some(e) => Err(e.clone().into()),
        None => Ok(()),
    }
}
