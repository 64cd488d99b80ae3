use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Word,
    Generic,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Word => "Word",
            Self::Generic => "document",
        }
    }
}

/// Extracted document text carried inside a tagged user message. Held only
/// for the duration of one request; a caller that wants the document on the
/// next turn echoes the tagged message back through the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub raw_text: String,
    pub source_kind: SourceKind,
}

/// Result of splitting a raw user message at its document marker.
///
/// `instruction` is `Some("")` for a tagged upload with no leading text,
/// which downstream treats as a direct-processing signal. It is `None` only
/// when the whole message was blank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMessage {
    pub payload: Option<DocumentPayload>,
    pub instruction: Option<String>,
}

const DOCUMENT_MARKERS: [(&str, SourceKind); 3] = [
    ("[pdf_extraction]", SourceKind::Pdf),
    ("[word_document_extraction]", SourceKind::Word),
    ("[document]", SourceKind::Generic),
];

/// Split a message at the first recognized document marker. Text before the
/// marker is the instruction, text after is the raw payload. A marker with
/// nothing after it yields no payload rather than an error.
pub fn parse(message: &str) -> ParsedMessage {
    for (marker, source_kind) in DOCUMENT_MARKERS {
        if let Some(index) = message.find(marker) {
            let instruction = message[..index].trim().to_string();
            let raw_text = message[index + marker.len()..].trim();
            let payload = if raw_text.is_empty() {
                None
            } else {
                Some(DocumentPayload { raw_text: raw_text.to_string(), source_kind })
            };
            return ParsedMessage { payload, instruction: Some(instruction) };
        }
    }

    let trimmed = message.trim();
    ParsedMessage {
        payload: None,
        instruction: if trimmed.is_empty() { None } else { Some(trimmed.to_string()) },
    }
}
