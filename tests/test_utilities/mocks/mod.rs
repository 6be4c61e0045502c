/// Mock implementations for testing
mod mock_image_registry;
mod mock_progress_reporter;
mod mock_vcs_resolver;

pub use mock_image_registry::MockImageRegistry;
pub use mock_progress_reporter::{MockProgressReporter, ReportEvent};
pub use mock_vcs_resolver::MockVcsResolver;
