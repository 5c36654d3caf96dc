//! Status Blob Codec
//!
//! Smart-home devices report telemetry as a free-form status field holding
//! a serialized list of event dicts, in either Python-literal or JSON
//! syntax. This crate decodes those blobs without evaluating them and
//! extracts numeric measurements for a configured signal code.

mod error;
mod event;
mod extractor;
mod literal;

pub use error::CodecError;
pub use event::{decode_events, EventValue, StatusEvent};
pub use extractor::{Extraction, MeasurementExtractor, DEFAULT_DIVISOR};
pub use literal::Literal;
