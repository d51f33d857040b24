use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Position a node gets before any layout has been computed.
pub const UNPLACED_POSITION: i64 = -999;
pub const DEFAULT_NODE_COLOR: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: usize,
    pub node_label: String,
    pub node_description: String,
    pub node_attributes: NodeAttributes,
    pub connectors: Vec<String>,
    pub pajek_index: u64,
    pub v_node: VisualNode,
}

/// Raw CSV columns of the row a node was built from, in header order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(rename = "attRaw")]
    pub att_raw: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub pos_x: i64,
    pub pos_y: i64,
    pub pos_z: i64,
    pub color: String,
}

impl Default for VisualNode {
    fn default() -> Self {
        Self {
            pos_x: UNPLACED_POSITION,
            pos_y: UNPLACED_POSITION,
            pos_z: 0,
            color: DEFAULT_NODE_COLOR.to_string(),
        }
    }
}

impl NodeAttributes {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.att_raw.get(column).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(rename = "clusterID")]
    pub cluster_id: String,
    #[serde(rename = "clusterType")]
    pub cluster_type: String,
    #[serde(rename = "clusterLabel")]
    pub cluster_label: String,
    #[serde(rename = "clusterDescription")]
    pub cluster_description: String,
    #[serde(rename = "keyAttribute")]
    pub key_attribute: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEndpoint {
    pub cluster: String,
    pub index: usize,
    pub pajek_index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: EdgeEndpoint,
    pub target: EdgeEndpoint,
    pub kind: String,
    #[serde(serialize_with = "serialize_weight")]
    pub weight: f64,
}

// 整數權重寫成 `1` 而非 `1.0`
fn serialize_weight<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let whole = weight.fract() == 0.0 && weight.abs() < i64::MAX as f64;
    if whole {
        serializer.serialize_i64(*weight as i64)
    } else {
        serializer.serialize_f64(*weight)
    }
}

/// The network document: clusters of nodes plus the edges between them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<Cluster>,
    pub edges: Vec<Edge>,
}

impl Dataset {
    /// Edges whose source or target points past the end of its cluster, or at
    /// a cluster id the dataset does not contain.
    pub fn dangling_edge_count(&self) -> usize {
        let resolves = |endpoint: &EdgeEndpoint| {
            self.nodes
                .iter()
                .find(|c| c.cluster_id == endpoint.cluster)
                .map(|c| endpoint.index < c.nodes.len())
                .unwrap_or(false)
        };

        self.edges
            .iter()
            .filter(|e| !resolves(&e.source) || !resolves(&e.target))
            .count()
    }
}

/// A GeoJSON feature collection. Features are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    /// `None` when the key is absent; an explicit `null` is kept as `Some(Null)`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub crs: Option<serde_json::Value>,
    pub features: Vec<serde_json::Value>,
}

fn deserialize_present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Raw bytes of one input file, tagged with the name used in error messages.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ClusterSource {
    pub config: crate::config::toml_config::ClusterConfig,
    pub file: SourceFile,
}

/// Everything the extract phase read from disk.
#[derive(Debug, Clone)]
pub struct ExtractedData {
    pub geojson_files: Vec<SourceFile>,
    pub cluster_files: Vec<ClusterSource>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub combined_geojson: FeatureCollection,
    pub dataset: Dataset,
}
