use serde::{Deserialize, Serialize};

/// Name of the manifest at the root of a docker-archive
pub const MANIFEST_FILE: &str = "manifest.json";

/// One entry of a docker-archive `manifest.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchiveManifest {
    #[serde(rename = "Config", default)]
    pub config_filename: String,
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Vec<String>,
    #[serde(rename = "Layers", default)]
    pub layer_files: Vec<String>,
}

impl ArchiveManifest {
    /// Parses a `manifest.json` document and returns its first entry.
    ///
    /// Returns `Ok(None)` when the array is empty.
    pub fn first_from_json(content: &str) -> serde_json::Result<Option<Self>> {
        let entries: Vec<ArchiveManifest> = serde_json::from_str(content)?;
        Ok(entries.into_iter().next())
    }

    /// First repository tag, if it is present and non-empty
    pub fn primary_tag(&self) -> Option<&str> {
        self.repo_tags
            .first()
            .map(String::as_str)
            .filter(|tag| !tag.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MANIFEST: &str = r#"[{"Config":"386bcf5c63de46c7066c42d4ae1c38af0689836e88fed37d1dca2d484b343cf5.json","RepoTags":["k8s.gcr.io/kube-apiserver-amd64:v1.22.0-alpha.1"],"Layers":["23e140cb8e03a12cba4ac571d9a7143cf5e2e9b72de3b33ce3243b4f7ad6a188/layer.tar","48dd73ececdf0f52a174ad33a469145824713bd2b73c6257ce1ba8502003ad4e/layer.tar","d397673d78556210baa112013c960cb95a3fd452e5c4a2ead2b26e5a458cd87f/layer.tar"]}]"#;

    #[test]
    fn test_first_from_json_preserves_fields_and_order() {
        let manifest = ArchiveManifest::first_from_json(SAMPLE_MANIFEST)
            .unwrap()
            .unwrap();

        assert_eq!(
            manifest.config_filename,
            "386bcf5c63de46c7066c42d4ae1c38af0689836e88fed37d1dca2d484b343cf5.json"
        );
        assert_eq!(
            manifest.primary_tag(),
            Some("k8s.gcr.io/kube-apiserver-amd64:v1.22.0-alpha.1")
        );
        assert_eq!(manifest.layer_files.len(), 3);
        assert!(manifest.layer_files[0].starts_with("23e140cb"));
        assert!(manifest.layer_files[1].starts_with("48dd73ec"));
        assert!(manifest.layer_files[2].starts_with("d397673d"));
    }

    #[test]
    fn test_first_from_json_empty_array() {
        assert!(ArchiveManifest::first_from_json("[]").unwrap().is_none());
    }

    #[test]
    fn test_first_from_json_malformed() {
        assert!(ArchiveManifest::first_from_json("{\"Config\": 1").is_err());
    }

    #[test]
    fn test_primary_tag_rejects_empty() {
        let manifest = ArchiveManifest {
            repo_tags: vec![String::new()],
            ..Default::default()
        };
        assert!(manifest.primary_tag().is_none());
        assert!(ArchiveManifest::default().primary_tag().is_none());
    }

    #[test]
    fn test_serializes_with_docker_field_names() {
        let manifest = ArchiveManifest {
            config_filename: "sha256:abc".to_string(),
            repo_tags: vec!["busybox:latest".to_string()],
            layer_files: vec!["def.tar.gz".to_string()],
        };
        let json = serde_json::to_string(&vec![manifest]).unwrap();
        assert_eq!(
            json,
            r#"[{"Config":"sha256:abc","RepoTags":["busybox:latest"],"Layers":["def.tar.gz"]}]"#
        );
    }
}
