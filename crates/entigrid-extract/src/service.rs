//! Connector for extraction services that accept raw text and answer with a
//! JSON array of strings.
//!
//! The connector only shapes the request and parses the response. Moving bytes
//! (HTTP client, retries, credentials on the wire) is the job of the
//! [`Transport`] the host plugs in.

use rustc_hash::FxHashMap;

use crate::error::{ExtractError, ExtractResult, TransportError};
use crate::extractor::TermExtractor;

pub const DUMMY_NER_NAME: &str = "DummyNER";
pub const DUMMY_NER_ENDPOINT: &str = "http://dummyner.freeyourmetadata.org/";

/// Named settings a service exposes, such as credentials. Names are fixed when
/// the service is built; values may be changed later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceProperties {
    names: Vec<String>,
    values: FxHashMap<String, String>,
}

impl ServiceProperties {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            values: FxHashMap::default(),
        }
    }

    /// Property names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a declared property. Returns `false` and ignores the value when
    /// `name` was not declared.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        if !self.names.iter().any(|n| n == name) {
            return false;
        }
        self.values.insert(name.to_string(), value.into());
        true
    }

    /// First declared property without a non-empty value.
    pub fn first_missing(&self) -> Option<&str> {
        self.names
            .iter()
            .find(|n| self.get(n).is_none_or(str::is_empty))
            .map(String::as_str)
    }
}

/// A single extraction request handed to a [`Transport`].
#[derive(Debug, Clone, Copy)]
pub struct ServiceRequest<'a> {
    pub endpoint: &'a str,
    pub properties: &'a ServiceProperties,
    pub body: &'a [u8],
}

pub trait Transport: Send + Sync {
    /// Deliver `request` and return the raw response body.
    fn send(&self, request: &ServiceRequest<'_>) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct JsonArrayService<T> {
    name: String,
    endpoint: String,
    properties: ServiceProperties,
    transport: T,
}

impl<T: Transport> JsonArrayService<T> {
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        property_names: &[S],
        transport: T,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            properties: ServiceProperties::new(property_names),
            transport,
        }
    }

    /// The demonstration service, preconfigured with its public test
    /// credentials.
    pub fn dummy_ner(transport: T) -> Self {
        let mut service = Self::new(
            DUMMY_NER_NAME,
            DUMMY_NER_ENDPOINT,
            &["API user", "API key"],
            transport,
        );
        service.properties.set("API user", "ABCDEFGHIJKL");
        service.properties.set("API key", "KLMNOPQRSTUV");
        service
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn properties(&self) -> &ServiceProperties {
        &self.properties
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<String>) -> bool {
        self.properties.set(name, value)
    }

    pub fn is_configured(&self) -> bool {
        self.properties.first_missing().is_none()
    }

    fn parse_response(&self, body: &[u8]) -> ExtractResult<Vec<String>> {
        serde_json::from_slice::<Vec<String>>(body).map_err(|e| ExtractError::Response {
            service: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

impl<T: Transport> TermExtractor for JsonArrayService<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, text: &str) -> ExtractResult<Vec<String>> {
        if let Some(property) = self.properties.first_missing() {
            return Err(ExtractError::MissingProperty {
                service: self.name.clone(),
                property: property.to_string(),
            });
        }
        let request = ServiceRequest {
            endpoint: &self.endpoint,
            properties: &self.properties,
            body: text.as_bytes(),
        };
        let body = self
            .transport
            .send(&request)
            .map_err(|source| ExtractError::Transport {
                service: self.name.clone(),
                source,
            })?;
        self.parse_response(&body)
    }
}
