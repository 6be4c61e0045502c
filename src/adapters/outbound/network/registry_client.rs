use crate::ports::outbound::ImageRegistry;
use crate::sbom_generation::domain::archive_manifest::MANIFEST_FILE;
use crate::sbom_generation::domain::{ArchiveManifest, ImageReference};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, WWW_AUTHENTICATE};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use tar::{Builder, Header};

const MANIFEST_MEDIA_TYPES: &str = "application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.list.v2+json, \
     application/vnd.oci.image.manifest.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json";

const DEFAULT_OS: &str = "linux";
const DEFAULT_ARCHITECTURE: &str = "amd64";
const STAGING_DIR_PREFIX: &str = "spdx-registry-";

static CHALLENGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("challenge pattern is valid"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryManifest {
    #[serde(default)]
    config: Option<Descriptor>,
    #[serde(default)]
    layers: Vec<Descriptor>,
    #[serde(default)]
    manifests: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor {
    #[serde(default)]
    media_type: String,
    digest: String,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    digest: String,
    #[serde(default)]
    platform: Option<Platform>,
}

#[derive(Debug, Deserialize)]
struct Platform {
    #[serde(default)]
    architecture: String,
    #[serde(default)]
    os: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// A downloaded blob staged on disk
#[derive(Debug, Clone)]
pub(crate) struct StagedBlob {
    pub path: PathBuf,
    pub hex_digest: String,
    pub compressed: bool,
}

/// OciRegistryClient adapter pulling images over the distribution API
///
/// Only anonymous access is supported: when a registry answers with a bearer
/// challenge, an anonymous pull token is requested and used for the rest of
/// the pull. Every blob is checked against its SHA256 digest while it streams
/// to disk.
pub struct OciRegistryClient {
    client: reqwest::Client,
}

impl OciRegistryClient {
    /// Creates a new registry client with default configuration
    pub fn new() -> Result<Self> {
        let user_agent = format!("spdx-bom/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(300))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    fn registry_error(reference: &ImageReference, details: impl Into<String>) -> SbomError {
        SbomError::Registry {
            reference: reference.name(),
            details: details.into(),
        }
    }

    /// Parses the parameters of a `Bearer realm="...",service="..."` challenge
    fn parse_bearer_challenge(header: &str) -> Option<HashMap<String, String>> {
        let params = header.trim().strip_prefix("Bearer ")?;
        let parsed: HashMap<String, String> = CHALLENGE_PARAM
            .captures_iter(params)
            .map(|c| (c[1].to_lowercase(), c[2].to_string()))
            .collect();
        parsed.contains_key("realm").then_some(parsed)
    }

    /// Requests an anonymous pull token answering a bearer challenge
    async fn fetch_token(&self, reference: &ImageReference, challenge: &str) -> Result<String> {
        let params = Self::parse_bearer_challenge(challenge).ok_or_else(|| {
            Self::registry_error(
                reference,
                format!("unsupported authentication challenge: {}", challenge),
            )
        })?;

        let default_scope = format!("repository:{}:pull", reference.repository());
        let scope = params.get("scope").unwrap_or(&default_scope);
        let mut url = format!(
            "{}?scope={}",
            params["realm"],
            urlencoding::encode(scope)
        );
        if let Some(service) = params.get("service") {
            url.push_str(&format!("&service={}", urlencoding::encode(service)));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::registry_error(
                reference,
                format!("token endpoint returned status code {}", response.status()),
            )
            .into());
        }

        let token: TokenResponse = response.json().await?;
        token
            .token
            .or(token.access_token)
            .ok_or_else(|| Self::registry_error(reference, "token response has no token").into())
    }

    /// Sends a GET, answering one bearer challenge if the registry asks for it
    async fn get(
        &self,
        reference: &ImageReference,
        url: &str,
        accept: Option<&str>,
        token: &mut Option<String>,
    ) -> Result<Response> {
        for _ in 0..2 {
            let mut request = self.client.get(url);
            if let Some(accept) = accept {
                request = request.header(ACCEPT, accept);
            }
            if let Some(token) = token.as_deref() {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            if response.status() == StatusCode::UNAUTHORIZED && token.is_none() {
                let challenge = response
                    .headers()
                    .get(WWW_AUTHENTICATE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                *token = Some(self.fetch_token(reference, &challenge).await?);
                continue;
            }

            if !response.status().is_success() {
                return Err(Self::registry_error(
                    reference,
                    format!("GET {} returned status code {}", url, response.status()),
                )
                .into());
            }
            return Ok(response);
        }

        Err(Self::registry_error(reference, format!("GET {} was not authorized", url)).into())
    }

    /// Fetches the image manifest, resolving a manifest list to one platform
    async fn fetch_manifest(
        &self,
        reference: &ImageReference,
        token: &mut Option<String>,
    ) -> Result<RegistryManifest> {
        let base = format!("https://{}/v2/{}", reference.api_host(), reference.repository());
        let url = format!("{}/manifests/{}", base, reference.identifier_str());
        let manifest: RegistryManifest = self
            .get(reference, &url, Some(MANIFEST_MEDIA_TYPES), token)
            .await?
            .json()
            .await?;

        if manifest.manifests.is_empty() {
            return Ok(manifest);
        }

        let digest = Self::select_platform(&manifest.manifests)
            .ok_or_else(|| Self::registry_error(reference, "image index has no manifests"))?;
        let url = format!("{}/manifests/{}", base, digest);
        let resolved: RegistryManifest = self
            .get(reference, &url, Some(MANIFEST_MEDIA_TYPES), token)
            .await?
            .json()
            .await?;
        Ok(resolved)
    }

    /// Picks the linux/amd64 entry of an index, or the first entry
    fn select_platform(entries: &[IndexEntry]) -> Option<&str> {
        entries
            .iter()
            .find(|e| {
                e.platform.as_ref().is_some_and(|p| {
                    p.os == DEFAULT_OS && p.architecture == DEFAULT_ARCHITECTURE
                })
            })
            .or_else(|| entries.first())
            .map(|e| e.digest.as_str())
    }

    /// Streams a blob to disk, checking it against its digest
    async fn download_blob(
        &self,
        reference: &ImageReference,
        descriptor: &Descriptor,
        dest_dir: &Path,
        token: &mut Option<String>,
    ) -> Result<StagedBlob> {
        let expected = descriptor
            .digest
            .strip_prefix("sha256:")
            .filter(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| {
                Self::registry_error(
                    reference,
                    format!("unsupported blob digest {}", descriptor.digest),
                )
            })?
            .to_lowercase();

        let url = format!(
            "https://{}/v2/{}/blobs/{}",
            reference.api_host(),
            reference.repository(),
            descriptor.digest
        );
        let mut response = self.get(reference, &url, None, token).await?;

        let path = dest_dir.join(&expected);
        let mut file = fs::File::create(&path)?;
        let mut hasher = Sha256::new();
        while let Some(chunk) = response.chunk().await? {
            hasher.update(&chunk);
            file.write_all(&chunk)?;
        }
        file.flush()?;

        let actual = hex::encode(hasher.finalize());
        if actual != expected {
            return Err(Self::registry_error(
                reference,
                format!(
                    "digest mismatch for blob {}: got sha256:{}",
                    descriptor.digest, actual
                ),
            )
            .into());
        }

        Ok(StagedBlob {
            path,
            hex_digest: expected,
            compressed: descriptor.media_type.is_empty() || descriptor.media_type.contains("gzip"),
        })
    }
}

/// Writes staged blobs as a docker-archive tarball
///
/// The config lands at `<hex>.json`, each layer at `<hex>.tar.gz` (or `.tar`
/// when uncompressed), and `manifest.json` lists them with `repo_tag`.
pub(crate) fn write_docker_archive(
    archive_path: &Path,
    config: &StagedBlob,
    layers: &[StagedBlob],
    repo_tag: &str,
) -> Result<()> {
    let file = fs::File::create(archive_path).map_err(|e| SbomError::FileWriteError {
        path: archive_path.to_path_buf(),
        details: e.to_string(),
    })?;
    let mut builder = Builder::new(file);

    let config_name = format!("{}.json", config.hex_digest);
    builder.append_path_with_name(&config.path, &config_name)?;

    let mut layer_files = Vec::with_capacity(layers.len());
    for layer in layers {
        let extension = if layer.compressed { "tar.gz" } else { "tar" };
        let name = format!("{}.{}", layer.hex_digest, extension);
        builder.append_path_with_name(&layer.path, &name)?;
        layer_files.push(name);
    }

    let manifest = vec![ArchiveManifest {
        config_filename: config_name,
        repo_tags: vec![repo_tag.to_string()],
        layer_files,
    }];
    let manifest_json = serde_json::to_vec(&manifest)?;
    let mut header = Header::new_gnu();
    header.set_size(manifest_json.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, MANIFEST_FILE, manifest_json.as_slice())?;

    builder.into_inner()?.flush()?;
    Ok(())
}

// Note: no Default implementation, client creation can fail.

#[async_trait]
impl ImageRegistry for OciRegistryClient {
    async fn pull_image_to_archive(
        &self,
        reference: &ImageReference,
        archive_path: &Path,
    ) -> Result<()> {
        let mut token = None;
        let manifest = self.fetch_manifest(reference, &mut token).await?;
        let config = manifest
            .config
            .as_ref()
            .ok_or_else(|| Self::registry_error(reference, "manifest has no config blob"))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_DIR_PREFIX)
            .tempdir()?;

        let config_blob = self
            .download_blob(reference, config, staging.path(), &mut token)
            .await?;
        let mut layer_blobs = Vec::with_capacity(manifest.layers.len());
        for layer in &manifest.layers {
            layer_blobs.push(
                self.download_blob(reference, layer, staging.path(), &mut token)
                    .await?,
            );
        }

        write_docker_archive(
            archive_path,
            &config_blob,
            &layer_blobs,
            &reference.archive_tag(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::archive::TarArchiveExtractor;
    use crate::ports::outbound::ArchiveExtractor;
    use tempfile::TempDir;

    fn staged(dir: &Path, name: &str, content: &[u8], compressed: bool) -> StagedBlob {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        StagedBlob {
            path,
            hex_digest: hex::encode(Sha256::digest(content)),
            compressed,
        }
    }

    #[test]
    fn test_registry_client_creation() {
        assert!(OciRegistryClient::new().is_ok());
    }

    #[test]
    fn test_parse_bearer_challenge() {
        let params = OciRegistryClient::parse_bearer_challenge(
            r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io",scope="repository:library/nginx:pull""#,
        )
        .unwrap();

        assert_eq!(params["realm"], "https://auth.docker.io/token");
        assert_eq!(params["service"], "registry.docker.io");
        assert_eq!(params["scope"], "repository:library/nginx:pull");
    }

    #[test]
    fn test_parse_bearer_challenge_rejects_basic() {
        assert!(OciRegistryClient::parse_bearer_challenge(r#"Basic realm="registry""#).is_none());
        assert!(OciRegistryClient::parse_bearer_challenge("Bearer service=\"x\"").is_none());
    }

    #[test]
    fn test_select_platform_prefers_linux_amd64() {
        let index: RegistryManifest = serde_json::from_str(
            r#"{"manifests":[
                {"digest":"sha256:arm","platform":{"architecture":"arm64","os":"linux"}},
                {"digest":"sha256:amd","platform":{"architecture":"amd64","os":"linux"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            OciRegistryClient::select_platform(&index.manifests),
            Some("sha256:amd")
        );

        let no_match: RegistryManifest = serde_json::from_str(
            r#"{"manifests":[{"digest":"sha256:first","platform":{"architecture":"s390x","os":"linux"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            OciRegistryClient::select_platform(&no_match.manifests),
            Some("sha256:first")
        );
        assert_eq!(OciRegistryClient::select_platform(&[]), None);
    }

    #[test]
    fn test_parse_image_manifest() {
        let manifest: RegistryManifest = serde_json::from_str(
            r#"{"schemaVersion":2,
                "mediaType":"application/vnd.docker.distribution.manifest.v2+json",
                "config":{"mediaType":"application/vnd.docker.container.image.v1+json","digest":"sha256:c0","size":10},
                "layers":[
                    {"mediaType":"application/vnd.docker.image.rootfs.diff.tar.gzip","digest":"sha256:l1","size":1},
                    {"mediaType":"application/vnd.oci.image.layer.v1.tar","digest":"sha256:l2","size":2}
                ]}"#,
        )
        .unwrap();

        assert_eq!(manifest.config.unwrap().digest, "sha256:c0");
        assert_eq!(manifest.layers.len(), 2);
        assert!(manifest.manifests.is_empty());
    }

    #[test]
    fn test_write_docker_archive_is_readable_by_extractor() {
        let staging = TempDir::new().unwrap();
        let config = staged(staging.path(), "config", b"{\"os\":\"linux\"}", false);
        let layers = vec![
            staged(staging.path(), "l1", b"layer one", true),
            staged(staging.path(), "l2", b"layer two", false),
        ];

        let out = TempDir::new().unwrap();
        let archive = out.path().join("image.tar");
        write_docker_archive(
            &archive,
            &config,
            &layers,
            "index.docker.io/library/nginx:from-digest",
        )
            .unwrap();

        let extractor = TarArchiveExtractor::new();
        let extracted = extractor.extract_tarball_tmp(&archive).unwrap();
        let manifest = extractor
            .read_archive_manifest(&extracted.path().join(MANIFEST_FILE))
            .unwrap();

        assert_eq!(
            manifest.primary_tag(),
            Some("index.docker.io/library/nginx:from-digest")
        );
        assert_eq!(manifest.config_filename, format!("{}.json", config.hex_digest));
        assert_eq!(
            manifest.layer_files,
            vec![
                format!("{}.tar.gz", layers[0].hex_digest),
                format!("{}.tar", layers[1].hex_digest),
            ]
        );
        assert_eq!(
            fs::read(extracted.path().join(&manifest.layer_files[0])).unwrap(),
            b"layer one"
        );
    }
}
