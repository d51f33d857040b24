use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GEOJSON_DIR: &str = "municipal-brazilian-geodata/data";
pub const DEFAULT_GEOJSON_EXCLUDE: &str = "Brasil.json";
pub const DEFAULT_GEOJSON_OUTPUT: &str = "Brazil_ADM2.geojson";
pub const DEFAULT_NETWORK_OUTPUT: &str = "3_network.json";
pub const DEFAULT_OUTPUT_PATH: &str = "out";
pub const DEFAULT_EDGE_COUNT: usize = 1000;
pub const DEFAULT_INDEX_RANGE: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub pipeline: PipelineInfo,
    #[serde(default)]
    pub geojson: GeoJsonConfig,
    #[serde(default = "default_clusters")]
    pub clusters: Vec<ClusterConfig>,
    #[serde(default)]
    pub edges: EdgeConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonConfig {
    #[serde(default = "default_geojson_dir")]
    pub input_dir: String,
    /// File name inside `input_dir` left out of the merge.
    #[serde(default = "default_geojson_exclude")]
    pub exclude: Option<String>,
    #[serde(default = "default_geojson_output")]
    pub output_file: String,
}

/// One indicator CSV turned into one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub id: String,
    pub label: String,
    /// Metadata only, copied to `keyAttribute`.
    pub key_attribute: String,
    pub path: String,
    #[serde(default = "default_dedup_column")]
    pub dedup_column: String,
    #[serde(default = "default_label_column")]
    pub label_column: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    #[serde(default = "default_edge_count")]
    pub count: usize,
    #[serde(default = "default_index_range")]
    pub index_range: usize,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_network_output")]
    pub network_file: String,
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_geojson_dir() -> String {
    DEFAULT_GEOJSON_DIR.to_string()
}

fn default_geojson_exclude() -> Option<String> {
    Some(DEFAULT_GEOJSON_EXCLUDE.to_string())
}

fn default_geojson_output() -> String {
    DEFAULT_GEOJSON_OUTPUT.to_string()
}

fn default_dedup_column() -> String {
    "geocode".to_string()
}

fn default_label_column() -> String {
    "municipality".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_edge_count() -> usize {
    DEFAULT_EDGE_COUNT
}

fn default_index_range() -> usize {
    DEFAULT_INDEX_RANGE
}

fn default_kind() -> String {
    "geo".to_string()
}

fn default_weight() -> f64 {
    1.0
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_network_output() -> String {
    DEFAULT_NETWORK_OUTPUT.to_string()
}

fn default_clusters() -> Vec<ClusterConfig> {
    vec![
        ClusterConfig::new(
            "0",
            "Environmental",
            "defor",
            "TRAJETORIAS_DATASET_Environmental_dimension_indicators.csv",
        ),
        ClusterConfig::new(
            "1",
            "Socio-Economic",
            "ipm",
            "TRAJETORIAS_DATASET_Socio-Economic_dimension-indicators.csv",
        ),
    ]
}

impl Default for PipelineInfo {
    fn default() -> Self {
        Self {
            name: "geonet".to_string(),
            description: "Indicator CSVs and municipal boundaries to a node/edge network"
                .to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for GeoJsonConfig {
    fn default() -> Self {
        Self {
            input_dir: default_geojson_dir(),
            exclude: default_geojson_exclude(),
            output_file: default_geojson_output(),
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            count: default_edge_count(),
            index_range: default_index_range(),
            kind: default_kind(),
            weight: default_weight(),
            seed: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            network_file: default_network_output(),
            pretty: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineInfo::default(),
            geojson: GeoJsonConfig::default(),
            clusters: default_clusters(),
            edges: EdgeConfig::default(),
            load: LoadConfig::default(),
            monitoring: None,
        }
    }
}

impl GeoJsonConfig {
    /// 空字串視為不排除任何檔案
    pub fn excluded_file(&self) -> Option<&str> {
        self.exclude.as_deref().filter(|name| !name.is_empty())
    }
}

impl ClusterConfig {
    pub fn new(id: &str, label: &str, key_attribute: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            key_attribute: key_attribute.to_string(),
            path: path.to_string(),
            dedup_column: default_dedup_column(),
            label_column: default_label_column(),
            delimiter: default_delimiter(),
        }
    }

    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        validation::validate_delimiter(&format!("clusters[{}].delimiter", self.id), &self.delimiter)
    }
}

impl NetworkConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for NetworkConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("geojson.input_dir", &self.geojson.input_dir)?;
        validation::validate_file_name("geojson.output_file", &self.geojson.output_file)?;
        if let Some(exclude) = self.geojson.excluded_file() {
            validation::validate_file_name("geojson.exclude", exclude)?;
        }

        if self.clusters.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "clusters".to_string(),
                message: "At least one cluster must be configured".to_string(),
            });
        }
        for cluster in &self.clusters {
            validation::validate_non_empty_string("clusters.id", &cluster.id)?;
            validation::validate_path(&format!("clusters[{}].path", cluster.id), &cluster.path)?;
            validation::validate_non_empty_string(
                &format!("clusters[{}].dedup_column", cluster.id),
                &cluster.dedup_column,
            )?;
            validation::validate_non_empty_string(
                &format!("clusters[{}].label_column", cluster.id),
                &cluster.label_column,
            )?;
            cluster.delimiter_byte()?;
        }
        validation::validate_unique("clusters.id", self.clusters.iter().map(|c| c.id.as_str()))?;

        validation::validate_positive_number("edges.index_range", self.edges.index_range, 1)?;
        validation::validate_non_empty_string("edges.kind", &self.edges.kind)?;
        if !self.edges.weight.is_finite() {
            return Err(EtlError::InvalidConfigValueError {
                field: "edges.weight".to_string(),
                value: self.edges.weight.to_string(),
                reason: "Weight must be a finite number".to_string(),
            });
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_file_name("load.network_file", &self.load.network_file)?;
        if self.load.network_file == self.geojson.output_file {
            return Err(EtlError::InvalidConfigValueError {
                field: "load.network_file".to_string(),
                value: self.load.network_file.clone(),
                reason: "Must differ from geojson.output_file".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_expected_layout() {
        let config = NetworkConfig::default();

        assert_eq!(config.geojson.input_dir, "municipal-brazilian-geodata/data");
        assert_eq!(config.geojson.exclude.as_deref(), Some("Brasil.json"));
        assert_eq!(config.geojson.output_file, "Brazil_ADM2.geojson");
        assert_eq!(config.load.output_path, "out");
        assert_eq!(config.load.network_file, "3_network.json");
        assert_eq!(config.edges.count, 1000);
        assert_eq!(config.edges.index_range, 300);
        assert_eq!(config.clusters[0].id, "0");
        assert_eq!(config.clusters[1].id, "1");
        assert_eq!(config.clusters[1].label, "Socio-Economic");
        assert_eq!(config.clusters[1].key_attribute, "ipm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = NetworkConfig::from_toml_str("").unwrap();
        assert_eq!(config.clusters.len(), 2);
        assert_eq!(config.edges.count, 1000);
        assert!(!config.load.pretty);
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "test-network"

[geojson]
input_dir = "geo"
output_file = "merged.geojson"

[[clusters]]
id = "env"
label = "Environmental"
key_attribute = "defor"
path = "env.csv"
delimiter = ";"

[edges]
count = 10
index_range = 5
seed = 42

[load]
output_path = "./test-output"
pretty = true

[monitoring]
enabled = true
"#;

        let config = NetworkConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "test-network");
        assert_eq!(config.geojson.input_dir, "geo");
        assert_eq!(config.geojson.exclude.as_deref(), Some("Brasil.json"));
        assert_eq!(config.clusters.len(), 1);
        assert_eq!(config.clusters[0].dedup_column, "geocode");
        assert_eq!(config.clusters[0].delimiter_byte().unwrap(), b';');
        assert_eq!(config.edges.seed, Some(42));
        assert_eq!(config.edges.kind, "geo");
        assert_eq!(config.load.network_file, "3_network.json");
        assert!(config.load.pretty);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GEONET_TEST_GEO_DIR", "/data/geo");

        let toml_content = r#"
[geojson]
input_dir = "${GEONET_TEST_GEO_DIR}"
"#;

        let config = NetworkConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geojson.input_dir, "/data/geo");

        std::env::remove_var("GEONET_TEST_GEO_DIR");
    }

    #[test]
    fn test_config_validation() {
        let mut config = NetworkConfig::default();
        config.clusters[1].id = "0".to_string();
        assert!(config.validate().is_err());

        let mut config = NetworkConfig::default();
        config.clusters.clear();
        assert!(config.validate().is_err());

        let mut config = NetworkConfig::default();
        config.edges.index_range = 0;
        assert!(config.validate().is_err());

        let mut config = NetworkConfig::default();
        config.load.network_file = config.geojson.output_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = NetworkConfig::from_toml_str("[edges]\ncount = \"many\"").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[edges]
count = 3
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = NetworkConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert_eq!(config.edges.count, 3);
    }
}
