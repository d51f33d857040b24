pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use toml_config::NetworkConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "geonet-etl")]
#[command(about = "Merge municipal boundaries and turn indicator CSVs into a node/edge network")]
pub struct CliArgs {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the two output files are written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Seed for edge sampling, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log CPU and memory usage after each phase
    #[arg(long)]
    pub monitor: bool,

    /// Show what would be processed without reading or writing data
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// Loads the configuration file (or defaults) and applies command line overrides.
    pub fn load_config(&self) -> Result<NetworkConfig> {
        let mut config = match &self.config {
            Some(path) => NetworkConfig::from_file(path)?,
            None => NetworkConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut NetworkConfig) {
        if let Some(output_path) = &self.output_path {
            config.load.output_path = output_path.clone();
        }
        if let Some(seed) = self.seed {
            config.edges.seed = Some(seed);
        }
        if self.pretty {
            config.load.pretty = true;
        }
    }

    pub fn monitor_enabled(&self, config: &NetworkConfig) -> bool {
        self.monitor || config.monitoring_enabled()
    }
}

/// What a run with `config` would read and write. Touches no data files.
#[cfg(feature = "cli")]
pub fn describe_plan(config: &NetworkConfig) -> String {
    let mut plan = format!(
        "📋 Dry run: {} v{}\n  GeoJSON input: {}\n",
        config.pipeline.name, config.pipeline.version, config.geojson.input_dir
    );
    if let Some(exclude) = config.geojson.excluded_file() {
        plan.push_str(&format!("  Excluded file: {}\n", exclude));
    }
    for cluster in &config.clusters {
        plan.push_str(&format!(
            "  Cluster {} '{}' <- {} (dedup on {}, label {})\n",
            cluster.id, cluster.label, cluster.path, cluster.dedup_column, cluster.label_column
        ));
    }
    let seed = match config.edges.seed {
        Some(seed) => format!("seed {}", seed),
        None => "a random seed".to_string(),
    };
    plan.push_str(&format!(
        "  Edges: {} sampled over [0, {}) with {}\n",
        config.edges.count, config.edges.index_range, seed
    ));
    plan.push_str(&format!(
        "  Output: {}/{{{}, {}}}\n",
        config.output_path(),
        config.geojson.output_file,
        config.load.network_file
    ));
    plan
}
