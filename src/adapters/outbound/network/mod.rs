/// Network adapters for registries and version control hosts
mod caching_vcs_resolver;
mod go_vcs_resolver;
mod registry_client;

pub use caching_vcs_resolver::CachingVcsResolver;
pub use go_vcs_resolver::GoVcsResolver;
pub use registry_client::OciRegistryClient;
