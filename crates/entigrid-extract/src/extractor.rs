use rustc_hash::FxHashMap;

use crate::error::ExtractResult;

/// A named service that turns free text into a list of terms.
///
/// The name becomes the header of the column the terms are written to.
pub trait TermExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, text: &str) -> ExtractResult<Vec<String>>;
}

impl<E: TermExtractor + ?Sized> TermExtractor for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn extract(&self, text: &str) -> ExtractResult<Vec<String>> {
        (**self).extract(text)
    }
}

/// Extractor answering from a fixed text-to-terms table. Unknown texts
/// produce no terms.
#[derive(Debug, Clone, Default)]
pub struct StaticExtractor {
    name: String,
    answers: FxHashMap<String, Vec<String>>,
}

impl StaticExtractor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            answers: FxHashMap::default(),
        }
    }

    pub fn with_answer<I, S>(mut self, text: impl Into<String>, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers
            .insert(text.into(), terms.into_iter().map(Into::into).collect());
        self
    }
}

impl TermExtractor for StaticExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract(&self, text: &str) -> ExtractResult<Vec<String>> {
        Ok(self.answers.get(text).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_extractor_answers_exact_text_only() {
        let ner = StaticExtractor::new("places").with_answer("Paris, London", ["Paris", "London"]);
        assert_eq!(ner.name(), "places");
        assert_eq!(ner.extract("Paris, London").unwrap(), vec!["Paris", "London"]);
        assert!(ner.extract("paris, london").unwrap().is_empty());
    }

    #[test]
    fn boxed_extractor_delegates() {
        let boxed: Box<dyn TermExtractor> =
            Box::new(StaticExtractor::new("x").with_answer("a", ["b"]));
        assert_eq!(TermExtractor::name(&boxed), "x");
        assert_eq!(boxed.extract("a").unwrap(), vec!["b"]);
    }
}
