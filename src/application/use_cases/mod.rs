mod build_image_package;
mod generate_document;
mod outline_document;
mod scan_go_modules;

pub use build_image_package::ImagePackageBuilder;
pub use generate_document::{GenerateDocumentUseCase, PLACEHOLDER_NAMESPACE};
pub use outline_document::OutlineDocumentUseCase;
pub use scan_go_modules::GoModuleScanner;
