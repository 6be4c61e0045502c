/// Formatter adapters for SBOM output formats
mod outline_formatter;
mod spdx_tag_value_formatter;

pub use outline_formatter::OutlineFormatter;
pub use spdx_tag_value_formatter::SpdxTagValueFormatter;
