use crate::config::toml_config::EdgeConfig;
use crate::domain::model::{Edge, EdgeEndpoint};
use crate::utils::error::{EtlError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Samples placeholder edges between clusters.
///
/// Endpoints are drawn uniformly with replacement and are not checked against
/// the real cluster sizes, so an edge may point at a node that does not exist.
pub struct EdgeGenerator {
    cluster_ids: Vec<String>,
    index_range: usize,
    kind: String,
    weight: f64,
    seed: u64,
}

impl EdgeGenerator {
    /// Without a configured seed a fresh one is drawn; see [`EdgeGenerator::seed`].
    pub fn new(cluster_ids: Vec<String>, config: &EdgeConfig) -> Result<Self> {
        if cluster_ids.is_empty() {
            return Err(EtlError::ConfigValidationError {
                field: "clusters".to_string(),
                message: "Edges need at least one cluster to point at".to_string(),
            });
        }
        if config.index_range == 0 {
            return Err(EtlError::ConfigValidationError {
                field: "edges.index_range".to_string(),
                message: "Index range must be at least 1".to_string(),
            });
        }

        Ok(Self {
            cluster_ids,
            index_range: config.index_range,
            kind: config.kind.clone(),
            weight: config.weight,
            seed: config.seed.unwrap_or_else(rand::random),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&self, count: usize) -> Vec<Edge> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        (0..count)
            .map(|_| {
                let source = self.endpoint(&mut rng);
                let target = self.endpoint(&mut rng);
                Edge {
                    source,
                    target,
                    kind: self.kind.clone(),
                    weight: self.weight,
                }
            })
            .collect()
    }

    fn endpoint(&self, rng: &mut StdRng) -> EdgeEndpoint {
        let cluster = &self.cluster_ids[rng.gen_range(0..self.cluster_ids.len())];
        EdgeEndpoint {
            cluster: cluster.clone(),
            index: rng.gen_range(0..self.index_range),
            pajek_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids() -> Vec<String> {
        vec!["0".to_string(), "1".to_string()]
    }

    fn seeded(seed: u64) -> EdgeConfig {
        EdgeConfig {
            seed: Some(seed),
            ..EdgeConfig::default()
        }
    }

    #[test]
    fn test_generates_requested_count_within_bounds() {
        let config = EdgeConfig::default();
        let generator = EdgeGenerator::new(ids(), &config).unwrap();
        let edges = generator.generate(config.count);

        assert_eq!(edges.len(), 1000);
        for edge in &edges {
            for endpoint in [&edge.source, &edge.target] {
                assert!(endpoint.cluster == "0" || endpoint.cluster == "1");
                assert!(endpoint.index < 300);
                assert_eq!(endpoint.pajek_index, 0);
            }
            assert_eq!(edge.kind, "geo");
            assert_eq!(edge.weight, 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_edges() {
        let a = EdgeGenerator::new(ids(), &seeded(7)).unwrap().generate(50);
        let b = EdgeGenerator::new(ids(), &seeded(7)).unwrap().generate(50);
        let c = EdgeGenerator::new(ids(), &seeded(8)).unwrap().generate(50);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unseeded_generator_reports_its_seed() {
        let generator = EdgeGenerator::new(ids(), &EdgeConfig::default()).unwrap();
        let replay = EdgeGenerator::new(ids(), &seeded(generator.seed())).unwrap();
        assert_eq!(generator.generate(20), replay.generate(20));
    }

    #[test]
    fn test_samples_cover_both_clusters_and_range() {
        let edges = EdgeGenerator::new(ids(), &seeded(1)).unwrap().generate(1000);

        let clusters: HashSet<&str> = edges.iter().map(|e| e.source.cluster.as_str()).collect();
        assert_eq!(clusters.len(), 2);

        let max_index = edges.iter().map(|e| e.target.index).max().unwrap();
        assert!(max_index > 250);
    }

    #[test]
    fn test_custom_kind_weight_and_range() {
        let config = EdgeConfig {
            index_range: 1,
            kind: "adjacent".to_string(),
            weight: 0.5,
            seed: Some(3),
            ..EdgeConfig::default()
        };
        let edges = EdgeGenerator::new(vec!["env".to_string()], &config)
            .unwrap()
            .generate(5);

        assert!(edges.iter().all(|e| e.source.index == 0 && e.target.index == 0));
        assert!(edges.iter().all(|e| e.source.cluster == "env"));
        assert!(edges.iter().all(|e| e.kind == "adjacent" && e.weight == 0.5));
    }

    #[test]
    fn test_zero_count_and_invalid_setup() {
        let generator = EdgeGenerator::new(ids(), &seeded(1)).unwrap();
        assert!(generator.generate(0).is_empty());

        assert!(EdgeGenerator::new(vec![], &EdgeConfig::default()).is_err());

        let config = EdgeConfig {
            index_range: 0,
            ..EdgeConfig::default()
        };
        assert!(EdgeGenerator::new(ids(), &config).is_err());
    }
}
