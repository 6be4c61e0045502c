mod document_factory;
mod verification_code;

pub use document_factory::{DocumentFactory, TOOL_NAME};
pub use verification_code::VerificationCodeCalculator;
