use crate::ports::outbound::{RepoRoot, VcsResolver};
use crate::shared::Result;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::process::Command;

const GIT: &str = "git";

/// Hosts whose repository root can be derived from the import path alone
static KNOWN_HOSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["github.com", "bitbucket.org", "gitlab.com"]
        .iter()
        .map(|host| {
            Regex::new(&format!(
                r"^({}/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(/[A-Za-z0-9_.\-~+]+)*$",
                regex::escape(host)
            ))
            .expect("known host pattern is valid")
        })
        .collect()
});

static GO_IMPORT_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s+name=["']go-import["']\s+content=["']([^"']+)["']"#)
        .expect("go-import meta pattern is valid")
});

/// GoVcsResolver adapter locating Go module repositories
///
/// Well-known hosts are resolved from the import path. Anything else goes
/// through `?go-get=1` discovery, reading the `go-import` meta tag served by
/// the import path's host. Only git repositories are supported; checkouts run
/// the `git` binary.
pub struct GoVcsResolver {
    client: reqwest::Client,
}

impl GoVcsResolver {
    /// Creates a new resolver with default configuration
    pub fn new() -> Result<Self> {
        let user_agent = format!("spdx-bom/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Resolves an import path hosted on a well-known forge
    fn known_host_root(import_path: &str) -> Option<RepoRoot> {
        KNOWN_HOSTS.iter().find_map(|pattern| {
            let root = pattern.captures(import_path)?.get(1)?.as_str();
            Some(RepoRoot {
                vcs: GIT.to_string(),
                repo: format!("https://{}", root),
                root: root.to_string(),
            })
        })
    }

    /// Picks the `go-import` entry serving an import path from an HTML page
    fn parse_go_import(html: &str, import_path: &str) -> Option<RepoRoot> {
        GO_IMPORT_META
            .captures_iter(html)
            .filter_map(|c| {
                let fields: Vec<&str> = c[1].split_whitespace().collect();
                match fields.as_slice() {
                    [prefix, vcs, repo] => Some(RepoRoot {
                        vcs: vcs.to_string(),
                        repo: repo.to_string(),
                        root: prefix.to_string(),
                    }),
                    _ => None,
                }
            })
            .find(|root| {
                import_path == root.root
                    || import_path
                        .strip_prefix(&root.root)
                        .is_some_and(|rest| rest.starts_with('/'))
            })
    }

    /// Validates that an import path is safe to put into a URL
    fn validate_import_path(import_path: &str) -> Result<()> {
        if import_path.is_empty()
            || import_path.contains("..")
            || import_path.contains(['\\', '?', '#', '@', ' '])
            || import_path.starts_with('/')
        {
            anyhow::bail!("Security: invalid import path '{}'", import_path);
        }
        Ok(())
    }

    async fn discover(&self, import_path: &str) -> Result<RepoRoot> {
        let url = format!("https://{}?go-get=1", import_path);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!(
                "import path discovery for {} returned status code {}",
                import_path,
                response.status()
            );
        }

        let html = response.text().await?;
        Self::parse_go_import(&html, import_path).ok_or_else(|| {
            anyhow::anyhow!("no go-import meta tag found for {}", import_path)
        })
    }

    async fn run_git(args: &[&str]) -> Result<()> {
        let output = Command::new(GIT)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("running git: {}", e))?;

        if !output.status.success() {
            anyhow::bail!(
                "git {} failed: {}",
                args.first().unwrap_or(&""),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl VcsResolver for GoVcsResolver {
    async fn repo_root_for_import_path(&self, import_path: &str) -> Result<RepoRoot> {
        Self::validate_import_path(import_path)?;

        let root = match Self::known_host_root(import_path) {
            Some(root) => root,
            None => self.discover(import_path).await?,
        };

        if root.vcs != GIT {
            anyhow::bail!(
                "{} is served by {} which is not supported, only git is",
                import_path,
                root.vcs
            );
        }
        Ok(root)
    }

    async fn create_at_rev(&self, repo: &RepoRoot, dir: &Path, revision: &str) -> Result<()> {
        let dir = dir.to_string_lossy();
        Self::run_git(&["clone", "--quiet", "--", repo.repo.as_str(), dir.as_ref()]).await?;
        if !revision.is_empty() {
            Self::run_git(&["-C", dir.as_ref(), "checkout", "--quiet", revision]).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_creation() {
        assert!(GoVcsResolver::new().is_ok());
    }

    #[test]
    fn test_known_host_root() {
        let root =
            GoVcsResolver::known_host_root("github.com/sirupsen/logrus/hooks/syslog").unwrap();
        assert_eq!(root.root, "github.com/sirupsen/logrus");
        assert_eq!(root.repo, "https://github.com/sirupsen/logrus");
        assert_eq!(root.vcs, "git");

        assert!(GoVcsResolver::known_host_root("gitlab.com/group/project").is_some());
        assert!(GoVcsResolver::known_host_root("github.com/only-owner").is_none());
        assert!(GoVcsResolver::known_host_root("k8s.io/release").is_none());
    }

    #[test]
    fn test_parse_go_import() {
        let html = r#"<html><head>
<meta name="go-import" content="golang.org/x/mod git https://go.googlesource.com/mod">
<meta name="go-source" content="golang.org/x/mod https://github.com/golang/mod/ https://github.com/golang/mod/tree/master{/dir}">
</head></html>"#;

        let root = GoVcsResolver::parse_go_import(html, "golang.org/x/mod/modfile").unwrap();
        assert_eq!(root.root, "golang.org/x/mod");
        assert_eq!(root.repo, "https://go.googlesource.com/mod");

        assert!(GoVcsResolver::parse_go_import(html, "golang.org/x/modern").is_none());
    }

    #[test]
    fn test_validate_import_path() {
        assert!(GoVcsResolver::validate_import_path("k8s.io/release").is_ok());
        assert!(GoVcsResolver::validate_import_path("").is_err());
        assert!(GoVcsResolver::validate_import_path("example.com/../etc").is_err());
        assert!(GoVcsResolver::validate_import_path("example.com/x?y=1").is_err());
    }

    #[tokio::test]
    async fn test_unsupported_import_path_fails_before_network() {
        let resolver = GoVcsResolver::new().unwrap();
        assert!(resolver
            .repo_root_for_import_path("/absolute/path")
            .await
            .is_err());
    }
}
