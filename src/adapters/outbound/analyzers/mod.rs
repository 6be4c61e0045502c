/// Layer analyzers that enrich image layer packages
mod debian_layer_analyzer;

pub use debian_layer_analyzer::DebianLayerAnalyzer;
