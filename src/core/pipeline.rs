use crate::config::toml_config::NetworkConfig;
use crate::core::cluster::build_cluster;
use crate::core::edges::EdgeGenerator;
use crate::core::geojson::{merge_feature_collections, select_input_files};
use crate::core::{Dataset, Pipeline, Storage, TransformResult};
use crate::domain::model::{ClusterSource, ExtractedData, SourceFile};
use crate::utils::error::Result;
use std::path::Path;

/// Boundary files and indicator CSVs in, merged GeoJSON and network document out.
pub struct NetworkPipeline<S: Storage> {
    storage: S,
    config: NetworkConfig,
}

impl<S: Storage> NetworkPipeline<S> {
    pub fn new(storage: S, config: NetworkConfig) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.config.load.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for NetworkPipeline<S> {
    async fn extract(&self) -> Result<ExtractedData> {
        let geojson = &self.config.geojson;
        let listing = self.storage.list_files(&geojson.input_dir).await?;
        let names = select_input_files(listing, geojson.excluded_file());
        tracing::debug!("GeoJSON inputs in {}: {:?}", geojson.input_dir, names);

        let mut geojson_files = Vec::with_capacity(names.len());
        for name in names {
            let path = Path::new(&geojson.input_dir).join(&name);
            let data = self.storage.read_file(&path.to_string_lossy()).await?;
            geojson_files.push(SourceFile { name, data });
        }

        let mut cluster_files = Vec::with_capacity(self.config.clusters.len());
        for cluster in &self.config.clusters {
            tracing::debug!("Reading cluster {} from {}", cluster.id, cluster.path);
            let data = self.storage.read_file(&cluster.path).await?;
            cluster_files.push(ClusterSource {
                config: cluster.clone(),
                file: SourceFile {
                    name: cluster.path.clone(),
                    data,
                },
            });
        }

        Ok(ExtractedData {
            geojson_files,
            cluster_files,
        })
    }

    async fn transform(&self, data: ExtractedData) -> Result<TransformResult> {
        let combined_geojson = merge_feature_collections(&data.geojson_files)?;

        let mut clusters = Vec::with_capacity(data.cluster_files.len());
        for source in &data.cluster_files {
            let cluster = build_cluster(&source.file.name, &source.file.data, &source.config)?;
            tracing::info!(
                "Cluster {} '{}': {} nodes",
                cluster.cluster_id,
                cluster.cluster_label,
                cluster.nodes.len()
            );
            clusters.push(cluster);
        }

        let cluster_ids = clusters.iter().map(|c| c.cluster_id.clone()).collect();
        let generator = EdgeGenerator::new(cluster_ids, &self.config.edges)?;
        tracing::info!("Generating {} edges with seed {}", self.config.edges.count, generator.seed());
        let edges = generator.generate(self.config.edges.count);

        let dataset = Dataset {
            nodes: clusters,
            edges,
        };

        let dangling = dataset.dangling_edge_count();
        if dangling > 0 {
            tracing::warn!(
                "{} of {} edges reference nodes outside their cluster",
                dangling,
                dataset.edges.len()
            );
        }

        Ok(TransformResult {
            combined_geojson,
            dataset,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let geojson_path = self.output_file(&self.config.geojson.output_file);
        let network_path = self.output_file(&self.config.load.network_file);

        let geojson_bytes = self.to_json(&result.combined_geojson)?;
        tracing::debug!("Writing {} ({} bytes)", geojson_path, geojson_bytes.len());
        self.storage.write_file(&geojson_path, &geojson_bytes).await?;

        let network_bytes = self.to_json(&result.dataset)?;
        tracing::debug!("Writing {} ({} bytes)", network_path, network_bytes.len());
        self.storage.write_file(&network_path, &network_bytes).await?;

        Ok(vec![geojson_path, network_path])
    }
}
