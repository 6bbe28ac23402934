pub mod capture;
pub mod error;
pub mod extractor;
pub mod service;

pub use capture::{CaptureOptions, capture_terms};
pub use error::{ExtractError, ExtractResult, TransportError};
pub use extractor::{StaticExtractor, TermExtractor};
pub use service::{
    DUMMY_NER_ENDPOINT, DUMMY_NER_NAME, JsonArrayService, ServiceProperties, ServiceRequest,
    Transport,
};
