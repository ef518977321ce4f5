// Main entry point
use clap::Parser;
use colored::Colorize;
use parcelmap::application::gate::ViewportGate;
use parcelmap::application::query::{load_viewport, ViewportLoad};
use parcelmap::domain::cancel::CancelSignal;
use parcelmap::domain::filter::{output_fields, parcel_filter};
use parcelmap::domain::model::{QuerySpec, Viewport};
use parcelmap::infrastructure::config::{self, load_config, Config};
use parcelmap::interfaces::cli::Cli;
use parcelmap::presentation::summary;
use parcelmap::{AppState, ParcelError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cancel_handle, cancel) = CancelSignal::pair();

    // Cancel an in-flight fetch between pages on Ctrl-C
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\nInterrupted, stopping after the current request...");
            cancel_handle.cancel();
        }
    });

    let cli = Cli::parse();

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }

    let mut config = load_config()?;
    apply_overrides(&mut config, &cli);

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.show_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let county = cli
        .county
        .clone()
        .unwrap_or_else(|| config.filter.county.clone());
    let filter = parcel_filter(&county, &cli.owner, &cli.address)?;

    let popup: Vec<String> = if cli.fields.is_empty() {
        config.fields.popup.clone()
    } else {
        cli.fields.clone()
    };
    let fields = output_fields(
        popup.iter().map(String::as_str),
        config.fields.required.iter().map(String::as_str),
    );

    let spec = QuerySpec::new(config.service_url.clone(), filter.clone())
        .with_fields(fields)
        .with_bbox(cli.bbox)
        .with_max_features(config.max_features)
        .with_page_size(config.page_size);
    let view = Viewport {
        zoom: cli.zoom,
        bbox: cli.bbox,
    };
    let gate = ViewportGate::from_config(&config);

    if !cli.json {
        print!(
            "{}",
            summary::format_request(view.zoom, gate.min_zoom, &filter, view.bbox.as_ref())
        );
    }

    let state = AppState::new(config)?;

    match load_viewport(&state, &gate, &view, &spec, &cancel).await {
        Ok(ViewportLoad::Skipped(decision)) => {
            if cli.json {
                println!("{}", serde_json::json!({ "skipped": decision }));
            } else {
                print!("{}", summary::format_skipped(decision));
            }
        }
        Ok(ViewportLoad::Loaded(collection)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(collection.as_ref())?);
            } else {
                print!("{}", summary::format_collection(&collection, cli.preview));
            }
        }
        Err(ParcelError::Cancelled) => {
            eprintln!("{}", "Fetch cancelled".yellow());
            std::process::exit(130);
        }
        Err(e @ ParcelError::RemoteQuery { .. }) => {
            eprintln!("{}", format!("ArcGIS query failed: {}", e).red());
            std::process::exit(1);
        }
        Err(e @ ParcelError::Network(_)) => {
            eprintln!("{}", format!("Network error: {}", e).red());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = cli.layer_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            config.service_url = url.to_string();
        }
    }
    if let Some(min_zoom) = cli.min_zoom {
        config.min_zoom = min_zoom;
    }
    if let Some(max_features) = cli.max_features {
        config.max_features = max_features;
    }
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = logging.path.as_deref().filter(|p| !p.is_empty()) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .init();
        return Ok(());
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
