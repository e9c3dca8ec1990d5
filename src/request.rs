//! Extraction request composition
//!
//! Combines a [`FieldSchema`] and the normalized page text into a single
//! extraction instruction. The expected root keys are enumerated before the
//! page text on purpose: models anchor on instructions presented ahead of
//! long context, and the explicit key list is the main lever against
//! malformed output.

use crate::{FieldSchema, NormalizedText};

/// A single textual extraction instruction, constructed fresh per page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionRequest {
    instruction: String,
}

impl ExtractionRequest {
    /// Composes the instruction for one page.
    ///
    /// Section order is part of the contract: key list, field
    /// descriptions, then the page text.
    pub fn compose(schema: &FieldSchema, text: &NormalizedText) -> Self {
        let key_list = schema.names().collect::<Vec<_>>().join(", ");
        let field_lines = schema
            .fields()
            .map(|f| format!("{}: {}", f.name, f.description))
            .collect::<Vec<_>>()
            .join("\n");

        let instruction = format!(
            "Return a single JSON object with exactly the following root keys: {}\n\
             \n\
             Data to extract:\n\
             {}\n\
             \n\
             Extract it from the following Markdown text:\n\
             \n\
             {}\n\
             \n\
             Respond with only the JSON object, no explanations or markdown fences.",
            key_list,
            field_lines,
            text.as_str()
        );

        Self { instruction }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Normalizer;

    fn test_schema() -> FieldSchema {
        FieldSchema::builder()
            .field("name", "Product name")
            .field("price", "Product price as a number, without the currency symbol")
            .field("availability", "Number of copies in stock")
            .build()
            .unwrap()
    }

    #[test]
    fn test_enumerates_keys_in_schema_order() {
        let text = Normalizer::new().normalize("<body><p>Dune, £12.99</p></body>");
        let request = ExtractionRequest::compose(&test_schema(), &text);

        let instruction = request.instruction();
        let name_pos = instruction.find("name").unwrap();
        let price_pos = instruction.find("price").unwrap();
        let avail_pos = instruction.find("availability").unwrap();
        assert!(name_pos < price_pos);
        assert!(price_pos < avail_pos);
        assert!(instruction.contains("name, price, availability"));
    }

    #[test]
    fn test_keys_precede_page_text() {
        let text = Normalizer::new().normalize("<body><p>PAGE-MARKER</p></body>");
        let request = ExtractionRequest::compose(&test_schema(), &text);

        let instruction = request.instruction();
        let marker_pos = instruction.find("PAGE-MARKER").unwrap();
        assert!(instruction.find("root keys").unwrap() < marker_pos);
        for field in ["name", "price", "availability"] {
            assert!(instruction.find(field).unwrap() < marker_pos);
        }
    }

    #[test]
    fn test_restates_descriptions() {
        let text = Normalizer::new().normalize("");
        let request = ExtractionRequest::compose(&test_schema(), &text);

        assert!(request.instruction().contains("name: Product name"));
        assert!(request
            .instruction()
            .contains("price: Product price as a number, without the currency symbol"));
    }
}
