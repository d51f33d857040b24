pub mod cluster;
pub mod edges;
pub mod etl;
pub mod geojson;
pub mod pipeline;

pub use crate::domain::model::{Cluster, Dataset, Edge, FeatureCollection, Node, TransformResult};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
