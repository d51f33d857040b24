use crate::domain::model::{FeatureCollection, SourceFile};
use crate::utils::error::{EtlError, Result};

/// Merges per-region feature collections into one.
///
/// The first source supplies `type` and `crs`; the `features` of every source
/// are appended in the order given. Features are neither validated nor
/// deduplicated.
pub fn merge_feature_collections(sources: &[SourceFile]) -> Result<FeatureCollection> {
    let mut combined: Option<FeatureCollection> = None;

    for source in sources {
        let collection = parse_feature_collection(source)?;
        tracing::debug!("{}: {} features", source.name, collection.features.len());

        match combined.as_mut() {
            Some(merged) => merged.features.extend(collection.features),
            None => combined = Some(collection),
        }
    }

    combined.ok_or_else(|| EtlError::EmptyInputError {
        message: "no GeoJSON files to merge".to_string(),
    })
}

/// Picks the files to merge from a directory listing, sorted by name.
pub fn select_input_files(mut names: Vec<String>, exclude: Option<&str>) -> Vec<String> {
    names.retain(|name| Some(name.as_str()) != exclude);
    names.sort();
    names
}

fn parse_feature_collection(source: &SourceFile) -> Result<FeatureCollection> {
    serde_json::from_slice(&source.data).map_err(|e| EtlError::GeoJsonError {
        file: source.name.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(name: &str, value: serde_json::Value) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            data: serde_json::to_vec(&value).unwrap(),
        }
    }

    fn region(name: &str, crs: &str, features: usize) -> SourceFile {
        let features: Vec<_> = (0..features)
            .map(|i| {
                json!({
                    "type": "Feature",
                    "properties": {"NOME": format!("{}-{}", name, i)},
                    "geometry": null
                })
            })
            .collect();
        source(
            name,
            json!({
                "type": "FeatureCollection",
                "crs": {"type": "name", "properties": {"name": crs}},
                "features": features
            }),
        )
    }

    #[test]
    fn test_merge_concatenates_features_in_order() {
        let sources = vec![
            region("AC.json", "EPSG:4674", 2),
            region("AL.json", "EPSG:4326", 3),
            region("AM.json", "EPSG:4326", 0),
        ];

        let merged = merge_feature_collections(&sources).unwrap();

        assert_eq!(merged.kind, "FeatureCollection");
        assert_eq!(merged.features.len(), 5);
        assert_eq!(merged.crs.unwrap()["properties"]["name"], "EPSG:4674");
        assert_eq!(merged.features[0]["properties"]["NOME"], "AC.json-0");
        assert_eq!(merged.features[2]["properties"]["NOME"], "AL.json-0");
    }

    #[test]
    fn test_merge_keeps_duplicate_features() {
        let sources = vec![region("AC.json", "x", 1), region("AC-copy.json", "x", 1)];
        let merged = merge_feature_collections(&sources).unwrap();
        assert_eq!(merged.features.len(), 2);
        assert_eq!(merged.features[0], merged.features[1]);
    }

    #[test]
    fn test_merge_without_sources_is_an_error() {
        let err = merge_feature_collections(&[]).unwrap_err();
        assert!(matches!(err, EtlError::EmptyInputError { .. }));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let sources = vec![
            region("AC.json", "x", 1),
            SourceFile {
                name: "BA.json".to_string(),
                data: b"{\"type\": \"FeatureCollection\", \"features\": [".to_vec(),
            },
        ];

        match merge_feature_collections(&sources) {
            Err(EtlError::GeoJsonError { file, .. }) => assert_eq!(file, "BA.json"),
            other => panic!("expected GeoJsonError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_features_member_is_an_error() {
        let sources = vec![source("CE.json", json!({"type": "FeatureCollection"}))];
        assert!(matches!(
            merge_feature_collections(&sources),
            Err(EtlError::GeoJsonError { .. })
        ));
    }

    #[test]
    fn test_select_input_files_skips_excluded_and_sorts() {
        let names = vec![
            "SP.json".to_string(),
            "Brasil.json".to_string(),
            "AC.json".to_string(),
        ];
        assert_eq!(
            select_input_files(names.clone(), Some("Brasil.json")),
            vec!["AC.json", "SP.json"]
        );
        assert_eq!(select_input_files(names, None).len(), 3);
    }
}
