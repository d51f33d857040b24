use crate::config::toml_config::ClusterConfig;
use crate::domain::model::{Cluster, Node, NodeAttributes, VisualNode};
use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;

pub const CLUSTER_TYPE: &str = "geo";
pub const NODE_CONNECTOR: &str = "geo";

/// Builds one cluster from an indicator CSV.
///
/// The first record is the header. Each data record becomes a node unless a
/// previous record carried the same value in `dedup_column`; the first
/// occurrence wins and node ids follow the order of first appearance.
pub fn build_cluster(file_name: &str, data: &[u8], config: &ClusterConfig) -> Result<Cluster> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in [&config.dedup_column, &config.label_column] {
        if !headers.iter().any(|h| h == column.as_str()) {
            return Err(EtlError::MissingColumnError {
                file: file_name.to_string(),
                column: column.clone(),
                line: None,
            });
        }
    }

    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    let mut duplicates = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line());

        // 短列只保留前面的欄位，多出的值直接丟棄
        let mut att_raw = serde_json::Map::new();
        for (key, value) in headers.iter().zip(record.iter()) {
            att_raw.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        }
        let attributes = NodeAttributes { att_raw };

        let key = required(&attributes, &config.dedup_column, file_name, line)?;
        if seen.contains(key) {
            duplicates += 1;
            continue;
        }
        let label = required(&attributes, &config.label_column, file_name, line)?.to_string();
        seen.insert(key.to_string());

        nodes.push(Node {
            id: nodes.len(),
            node_label: label,
            node_description: String::new(),
            node_attributes: attributes,
            connectors: vec![NODE_CONNECTOR.to_string()],
            pajek_index: 0,
            v_node: VisualNode::default(),
        });
    }

    tracing::debug!(
        "Cluster {} ({}): {} nodes, {} duplicate rows dropped",
        config.id,
        file_name,
        nodes.len(),
        duplicates
    );

    Ok(Cluster {
        cluster_id: config.id.clone(),
        cluster_type: CLUSTER_TYPE.to_string(),
        cluster_label: config.label.clone(),
        cluster_description: String::new(),
        key_attribute: config.key_attribute.clone(),
        nodes,
    })
}

fn required<'a>(
    attributes: &'a NodeAttributes,
    column: &str,
    file_name: &str,
    line: Option<u64>,
) -> Result<&'a str> {
    attributes
        .get(column)
        .ok_or_else(|| EtlError::MissingColumnError {
            file: file_name.to_string(),
            column: column.to_string(),
            line,
        })
}
