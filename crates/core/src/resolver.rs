use crate::conversation::{ConversationMessage, Role};
use crate::tag::{self, DocumentPayload};

const CONTINUATION_KEYWORDS: &[&str] = &[
    "create",
    "generate",
    "make",
    "build",
    "produce",
    "summarize",
    "summary",
    "analyze",
    "process",
    "extract",
    "presentation",
    "slides",
    "convert",
    "transform",
    "export",
    "proceed",
    "the document",
    "this document",
    "the file",
    "this file",
    "it",
    "this",
    "that",
    "from this",
    "based on",
];

const SHORT_ACTION_VERBS: &[&str] = &["create", "make", "generate", "show", "convert", "proceed"];

const SHORT_REQUEST_MAX_TOKENS: usize = 10;

/// Walk the transcript newest to oldest and return the first document
/// payload found in a user message.
pub fn find_prior_document(history: &[ConversationMessage]) -> Option<DocumentPayload> {
    history
        .iter()
        .rev()
        .filter(|message| message.role == Role::User)
        .find_map(|message| tag::parse(&message.content).payload)
}

/// A message without an attached document is a continuation when it either
/// carries a reference/action keyword or is a short action request ("do it"
/// style follow-ups lack the generic keywords), and a prior document exists
/// somewhere in the transcript. False whenever no prior document is found.
pub fn is_continuation(message: &str, history: &[ConversationMessage]) -> bool {
    let lowered = message.to_lowercase();
    let has_keyword = CONTINUATION_KEYWORDS.iter().any(|keyword| lowered.contains(keyword));
    let is_short_action = message.split_whitespace().count() <= SHORT_REQUEST_MAX_TOKENS
        && SHORT_ACTION_VERBS.iter().any(|verb| lowered.contains(verb));

    (has_keyword || is_short_action) && find_prior_document(history).is_some()
}

#[cfg(test)]
mod tests {
    use super::{find_prior_document, is_continuation};
    use crate::conversation::ConversationMessage;
    use crate::tag::SourceKind;

    fn history_with_upload() -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::user("what's in this[pdf_extraction]Quarterly results summary"),
            ConversationMessage::assistant("It covers quarterly results."),
        ]
    }

    #[test]
    fn finds_most_recent_document() {
        let mut history = history_with_upload();
        history.push(ConversationMessage::user("thanks[document]Updated draft body"));

        let payload = find_prior_document(&history).expect("payload");
        assert_eq!(payload.raw_text, "Updated draft body");
        assert_eq!(payload.source_kind, SourceKind::Generic);
    }

    #[test]
    fn skips_assistant_messages() {
        let history = vec![
            ConversationMessage::user("hello"),
            ConversationMessage::assistant("[document]not a real upload"),
        ];
        assert!(find_prior_document(&history).is_none());
    }

    #[test]
    fn keyword_followup_is_continuation() {
        assert!(is_continuation("please create the summary", &history_with_upload()));
    }

    #[test]
    fn short_action_request_is_continuation() {
        // "proceed" is in the short-action set even though the message has
        // none of the longer reference phrases
        assert!(is_continuation("ok proceed", &history_with_upload()));
    }

    #[test]
    fn never_continuation_without_prior_document() {
        let history = vec![
            ConversationMessage::user("hello there"),
            ConversationMessage::assistant("Hi, upload a document to begin."),
        ];
        assert!(!is_continuation("create the summary", &history));
        assert!(!is_continuation("it", &history));
        assert!(!is_continuation("proceed", &history));
    }

    #[test]
    fn unrelated_chatter_is_not_continuation() {
        assert!(!is_continuation("good morning", &history_with_upload()));
    }
}
