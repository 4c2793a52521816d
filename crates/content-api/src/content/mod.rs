//! Property conversion.
//!
//! This module provides:
//! - PropertyConverter: recursive node property conversion
//! - RequestContext: per-request state threaded through a conversion
//! - reference: `node://` / `asset://` token parsing and rewriting
//! - ConvertedValue: the serializable output model

mod context;
mod converter;
mod error;
pub mod reference;
mod value;

pub use context::RequestContext;
pub use converter::PropertyConverter;
pub use error::ConvertError;
pub use reference::{ReferenceScheme, ReferenceToken};
pub use value::{AssetRecord, ConvertedProperties, ConvertedValue};
