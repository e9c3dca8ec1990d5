//! Response parsing and validation
//!
//! The single most important policy in the pipeline lives here: malformed
//! service output degrades to an empty [`ExtractionResult`] and a recorded
//! diagnostic, never to an error crossing the `process` boundary.

use crate::{DiagnosticEvent, DiagnosticSink, ExtractionResponse, FieldSchema};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Validated key→value mapping extracted from one page.
///
/// Guaranteed well-formed once constructed; zero entries means "extraction
/// failed, nothing usable produced". Values are whatever JSON the service
/// returned for each key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractionResult {
    entries: Map<String, Value>,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Map<String, Value> {
        self.entries
    }
}

/// Parses the raw service response into an [`ExtractionResult`].
///
/// Schema conformance is advisory: keys outside the requested schema pass
/// through unfiltered and missing keys are not synthesized, because the
/// upstream model is not guaranteed to honor the instruction exactly. Drift
/// is logged so prompt regressions stay visible.
///
/// On parse failure the offending text is recorded on `sink` together with
/// the page URL, and an empty result is returned.
pub fn parse_and_validate(
    response: &ExtractionResponse,
    schema: &FieldSchema,
    page_url: &str,
    sink: &dyn DiagnosticSink,
) -> ExtractionResult {
    match parse_object(&response.text) {
        Some(entries) => {
            let missing: Vec<&str> = schema
                .names()
                .filter(|name| !entries.contains_key(*name))
                .collect();
            if !missing.is_empty() {
                warn!(url = %page_url, missing = ?missing, "Response is missing requested keys");
            }
            let extra: Vec<&String> = entries
                .keys()
                .filter(|key| !schema.contains(key))
                .collect();
            if !extra.is_empty() {
                debug!(url = %page_url, extra = ?extra, "Response contains keys outside the schema");
            }
            ExtractionResult { entries }
        }
        None => {
            sink.record(DiagnosticEvent {
                page_url: page_url.to_string(),
                raw_output: response.text.clone(),
            });
            ExtractionResult::empty()
        }
    }
}

/// Parses `text` as a JSON object, salvaging an embedded `{…}` object from
/// surrounding prose when the whole payload does not parse.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(entries)) = serde_json::from_str::<Value>(text) {
        return Some(entries);
    }

    let candidate = extract_json_from_text(text)?;
    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(entries)) => Some(entries),
        _ => None,
    }
}

/// Extract JSON from text content
fn extract_json_from_text(text: &str) -> Option<String> {
    // Find the first '{' and last '}'
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if start <= end {
        let potential_json = &text[start..=end];
        if potential_json.contains('"') || potential_json.contains(':') {
            return Some(potential_json.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;

    fn test_schema() -> FieldSchema {
        FieldSchema::builder()
            .field("name", "Product name")
            .field("price", "Product price as a number")
            .build()
            .unwrap()
    }

    fn response(text: &str) -> ExtractionResponse {
        ExtractionResponse {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_well_formed_object_accepted() {
        let sink = MemorySink::new();
        let result = parse_and_validate(
            &response(r#"{"name": "Dune", "price": "12.99"}"#),
            &test_schema(),
            "http://example.test/book/1",
            &sink,
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("name").unwrap().as_str().unwrap(), "Dune");
        assert_eq!(result.get("price").unwrap().as_str().unwrap(), "12.99");
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_malformed_output_degrades_to_empty() {
        let sink = MemorySink::new();
        let result = parse_and_validate(
            &response("not json at all"),
            &test_schema(),
            "http://example.test/book/1",
            &sink,
        );

        assert!(result.is_empty());
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].page_url, "http://example.test/book/1");
        assert_eq!(events[0].raw_output, "not json at all");
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let sink = MemorySink::new();
        for payload in [r#"[1, 2, 3]"#, r#""just a string""#, "42"] {
            let result = parse_and_validate(
                &response(payload),
                &test_schema(),
                "http://example.test/book/1",
                &sink,
            );
            assert!(result.is_empty(), "payload {payload:?} should not parse");
        }
        assert_eq!(sink.events().len(), 3);
    }

    #[test]
    fn test_object_salvaged_from_surrounding_prose() {
        let sink = MemorySink::new();
        let result = parse_and_validate(
            &response("Here is the data you asked for:\n{\"name\": \"Dune\"}\nLet me know!"),
            &test_schema(),
            "http://example.test/book/1",
            &sink,
        );

        assert_eq!(result.get("name").unwrap().as_str().unwrap(), "Dune");
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_out_of_schema_keys_pass_through() {
        let sink = MemorySink::new();
        let result = parse_and_validate(
            &response(r#"{"name": "Dune", "publisher": "Chilton Books"}"#),
            &test_schema(),
            "http://example.test/book/1",
            &sink,
        );

        assert_eq!(
            result.get("publisher").unwrap().as_str().unwrap(),
            "Chilton Books"
        );
        assert!(result.get("price").is_none());
    }
}
