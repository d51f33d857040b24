use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: PhaseMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: PhaseMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load in order; the first error aborts the run.
    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("Extracting input files...");
        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} GeoJSON files and {} CSV files",
            extracted.geojson_files.len(),
            extracted.cluster_files.len()
        );
        self.monitor.log_phase("extract");

        tracing::info!("Transforming...");
        let result = self.pipeline.transform(extracted).await?;
        tracing::info!(
            "Merged {} features, built {} clusters ({} nodes), {} edges",
            result.combined_geojson.features.len(),
            result.dataset.nodes.len(),
            result.dataset.nodes.iter().map(|c| c.nodes.len()).sum::<usize>(),
            result.dataset.edges.len()
        );
        self.monitor.log_phase("transform");

        tracing::info!("Writing output...");
        let written = self.pipeline.load(result).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }
        self.monitor.log_phase("load");
        self.monitor.log_summary();

        Ok(written)
    }
}
