use crate::domain::model::BoundingBox;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "parcelmap")]
#[command(about = "Load parcels and ownership for a map view from an ArcGIS FeatureServer.")]
#[command(version)]
pub struct Cli {
    /// Current view bounds as W,S,E,N (degrees)
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Current map zoom level
    #[arg(short = 'z', long, default_value_t = 12)]
    pub zoom: u8,

    /// Only load when zoom is at least this (overrides config)
    #[arg(long)]
    pub min_zoom: Option<u8>,

    /// COUNTY_NAME to match exactly (overrides config)
    #[arg(short = 'c', long)]
    pub county: Option<String>,

    /// Owner contains
    #[arg(short = 'o', long, default_value = "")]
    pub owner: String,

    /// Parcel address contains
    #[arg(short = 'a', long, default_value = "")]
    pub address: String,

    /// Popup field to load (repeatable; defaults from config)
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<String>,

    /// Max features to load per map view (overrides config)
    #[arg(short = 'm', long)]
    pub max_features: Option<usize>,

    /// FeatureServer layer URL (…/FeatureServer/<layerId>)
    #[arg(short = 'l', long)]
    pub layer_url: Option<String>,

    /// Output the feature collection as JSON
    #[arg(long)]
    pub json: bool,

    /// Rows to show in the preview table
    #[arg(long, default_value_t = 200)]
    pub preview: usize,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Print the effective configuration
    #[arg(long)]
    pub show_config: bool,
}
