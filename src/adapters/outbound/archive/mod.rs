/// Archive adapters for docker-archive tarballs
mod tar_extractor;

pub use tar_extractor::TarArchiveExtractor;
