/// Parser adapters reading serialized documents back into the domain model
mod spdx_tag_value_parser;

pub use spdx_tag_value_parser::SpdxTagValueParser;
