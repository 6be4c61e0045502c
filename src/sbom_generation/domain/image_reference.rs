use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fmt;

pub const DEFAULT_REGISTRY: &str = "index.docker.io";
pub const DEFAULT_TAG: &str = "latest";

/// Tag used in archives of images that were pulled by digest only
pub const DIGEST_PLACEHOLDER_TAG: &str = "from-digest";

/// Tag or digest part of an image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageIdentifier {
    Tag(String),
    Digest(String),
}

/// A parsed container image reference such as `registry.k8s.io/pause:3.9`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    repository: String,
    identifier: ImageIdentifier,
}

impl ImageReference {
    /// Parses a reference following docker conventions.
    ///
    /// A missing registry means Docker Hub, where single-segment repositories
    /// live under `library/`. A missing tag means `latest`.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(SbomError::validation("image reference is empty").into());
        }

        let (name, identifier) = match reference.split_once('@') {
            Some((name, digest)) => {
                Self::validate_digest(reference, digest)?;
                (name, ImageIdentifier::Digest(digest.to_string()))
            }
            None => {
                let last_slash = reference.rfind('/').map(|i| i + 1).unwrap_or(0);
                match reference[last_slash..].rfind(':') {
                    Some(pos) => {
                        let split = last_slash + pos;
                        (
                            &reference[..split],
                            ImageIdentifier::Tag(reference[split + 1..].to_string()),
                        )
                    }
                    None => (reference, ImageIdentifier::Tag(DEFAULT_TAG.to_string())),
                }
            }
        };

        if let ImageIdentifier::Tag(tag) = &identifier {
            Self::validate_tag(reference, tag)?;
        }

        let (registry, repository) = match name.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (first.to_string(), rest.to_string())
            }
            _ => (DEFAULT_REGISTRY.to_string(), name.to_string()),
        };

        let registry = if registry == "docker.io" {
            DEFAULT_REGISTRY.to_string()
        } else {
            registry
        };

        let repository = if registry == DEFAULT_REGISTRY && !repository.contains('/') {
            format!("library/{}", repository)
        } else {
            repository
        };

        Self::validate_repository(reference, &repository)?;

        Ok(Self {
            registry,
            repository,
            identifier,
        })
    }

    fn validate_digest(reference: &str, digest: &str) -> Result<()> {
        let valid = digest
            .split_once(':')
            .map(|(algorithm, hex)| {
                !algorithm.is_empty()
                    && hex.len() >= 32
                    && hex.chars().all(|c| c.is_ascii_hexdigit())
            })
            .unwrap_or(false);

        if !valid {
            return Err(SbomError::validation(format!(
                "invalid digest '{}' in image reference '{}'",
                digest, reference
            ))
            .into());
        }
        Ok(())
    }

    fn validate_tag(reference: &str, tag: &str) -> Result<()> {
        let valid = !tag.is_empty()
            && tag.len() <= 128
            && !tag.starts_with(['.', '-'])
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

        if !valid {
            return Err(SbomError::validation(format!(
                "invalid tag '{}' in image reference '{}'",
                tag, reference
            ))
            .into());
        }
        Ok(())
    }

    fn validate_repository(reference: &str, repository: &str) -> Result<()> {
        let valid = !repository.is_empty()
            && !repository.starts_with('/')
            && !repository.ends_with('/')
            && repository.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/')
            });

        if !valid {
            return Err(SbomError::validation(format!(
                "invalid repository '{}' in image reference '{}'",
                repository, reference
            ))
            .into());
        }
        Ok(())
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn identifier(&self) -> &ImageIdentifier {
        &self.identifier
    }

    /// Tag or digest string
    pub fn identifier_str(&self) -> &str {
        match &self.identifier {
            ImageIdentifier::Tag(tag) => tag,
            ImageIdentifier::Digest(digest) => digest,
        }
    }

    /// Host serving the distribution API for this registry
    pub fn api_host(&self) -> &str {
        if self.registry == DEFAULT_REGISTRY {
            "registry-1.docker.io"
        } else {
            &self.registry
        }
    }

    /// Fully qualified reference, e.g. `index.docker.io/library/nginx:latest`
    pub fn name(&self) -> String {
        match &self.identifier {
            ImageIdentifier::Tag(tag) => format!("{}/{}:{}", self.registry, self.repository, tag),
            ImageIdentifier::Digest(digest) => {
                format!("{}/{}@{}", self.registry, self.repository, digest)
            }
        }
    }

    /// Tag written into a docker-archive for this reference
    pub fn archive_tag(&self) -> String {
        let tag = match &self.identifier {
            ImageIdentifier::Tag(tag) => tag.as_str(),
            ImageIdentifier::Digest(_) => DIGEST_PLACEHOLDER_TAG,
        };
        format!("{}/{}:{}", self.registry, self.repository, tag)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "sha256:8b0b3b3b0b2b76d83d3e1b0f3c2f8f3a1f3e4d5c6b7a8f9e0d1c2b3a4f5e6d7c";

    #[test]
    fn test_parse_docker_hub_short_name() {
        let reference = ImageReference::parse("nginx").unwrap();
        assert_eq!(reference.registry(), "index.docker.io");
        assert_eq!(reference.repository(), "library/nginx");
        assert_eq!(reference.identifier_str(), "latest");
        assert_eq!(reference.name(), "index.docker.io/library/nginx:latest");
        assert_eq!(reference.api_host(), "registry-1.docker.io");
    }

    #[test]
    fn test_parse_registry_with_tag() {
        let reference = ImageReference::parse("registry.k8s.io/kube-apiserver:v1.28.0").unwrap();
        assert_eq!(reference.registry(), "registry.k8s.io");
        assert_eq!(reference.repository(), "kube-apiserver");
        assert_eq!(
            reference.identifier(),
            &ImageIdentifier::Tag("v1.28.0".to_string())
        );
        assert_eq!(reference.api_host(), "registry.k8s.io");
    }

    #[test]
    fn test_parse_registry_with_port() {
        let reference = ImageReference::parse("localhost:5000/team/app").unwrap();
        assert_eq!(reference.registry(), "localhost:5000");
        assert_eq!(reference.repository(), "team/app");
        assert_eq!(reference.identifier_str(), "latest");
    }

    #[test]
    fn test_parse_docker_io_alias_and_org() {
        let reference = ImageReference::parse("docker.io/bitnami/redis:7.2").unwrap();
        assert_eq!(reference.registry(), "index.docker.io");
        assert_eq!(reference.repository(), "bitnami/redis");
    }

    #[test]
    fn test_parse_digest() {
        let input = format!("gcr.io/distroless/static@{}", DIGEST);
        let reference = ImageReference::parse(&input).unwrap();
        assert_eq!(reference.repository(), "distroless/static");
        assert_eq!(
            reference.identifier(),
            &ImageIdentifier::Digest(DIGEST.to_string())
        );
        assert_eq!(reference.name(), input);
        assert_eq!(
            reference.archive_tag(),
            "gcr.io/distroless/static:from-digest"
        );
    }

    #[test]
    fn test_parse_rejects_invalid_references() {
        assert!(ImageReference::parse("").is_err());
        assert!(ImageReference::parse("Nginx").is_err());
        assert!(ImageReference::parse("nginx:").is_err());
        assert!(ImageReference::parse("nginx@sha256:xyz").is_err());
        assert!(ImageReference::parse("nginx:-bad").is_err());
    }
}
