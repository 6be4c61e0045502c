/// License classifier adapters
mod text_license_classifier;

pub use text_license_classifier::TextLicenseClassifier;
