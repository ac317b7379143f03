//! Lookup and translation requests, and the popup actions around them.

use std::sync::Arc;

use glance_bridge::{
    BridgeError, DataReply, DefinitionData, HostMessage, PageMetadata, TranslateRequest,
    WordLookup,
};
use glance_common::SessionToken;
use glance_config::{LangCode, DEFAULT_LANGUAGE};
use tracing::{debug, warn};

use crate::context::{context_payload, extract_context};
use crate::surface::{LanguageSelector, PageSurface, PopupContent};

use super::events::Completion;
use super::PopupController;

const LOOKUP_FAILED: &str = "Failed to process selection";
const NO_DEFINITION: &str = "No definition available";

/// External page with the full entry for `word`.
pub fn full_definition_url(base: &str, word: &str) -> String {
    let word = word.trim().to_lowercase();
    format!(
        "{}/word/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(&word)
    )
}

fn decode_reply(reply: serde_json::Value) -> Result<DefinitionData, String> {
    let reply: DataReply = serde_json::from_value(reply)
        .map_err(|e| BridgeError::Decode(e.to_string()).to_string())?;
    reply.into_result()
}

impl<S: PageSurface> PopupController<S> {
    /// Send `message` in the background and post the mapped result back as
    /// a completion.
    fn spawn_request<F>(&self, message: HostMessage, finish: F)
    where
        F: FnOnce(Result<DefinitionData, String>) -> Completion + Send + 'static,
    {
        let requester = Arc::clone(&self.requester);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = match requester.send_request(message).await {
                Ok(reply) => decode_reply(reply),
                Err(e) => Err(e.to_string()),
            };
            let _ = completions.send(finish(result));
        });
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub(super) fn request_lookup(&mut self, token: SessionToken, text: &str) {
        let context = match self.surface.selection_ancestry() {
            Some(ancestors) => {
                let context = extract_context(text, &ancestors);
                if let Some(context) = &context {
                    self.contexts.insert(text, context.clone());
                }
                context
            }
            None => self.contexts.get(text).cloned(),
        };
        let payload = context_payload(text, context.as_ref());
        if let Some(session) = self.session.as_mut() {
            session.context = payload.clone();
        }

        let message = HostMessage::WordClicked(WordLookup {
            word: text.to_string(),
            context: payload,
            metadata: PageMetadata {
                url: self.surface.page_url(),
                title: self.surface.page_title(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        });
        debug!(token = %token, word = text, structured = context.is_some(), "lookup requested");
        self.spawn_request(message, move |result| Completion::Lookup { token, result });
    }

    pub(super) fn on_lookup(
        &mut self,
        token: SessionToken,
        result: Result<DefinitionData, String>,
    ) {
        let Some(session) = self.session.as_mut().filter(|s| s.token == token) else {
            debug!(token = %token, "lookup reply for a closed popup dropped");
            return;
        };

        let data = match result {
            Ok(data) => data,
            Err(error) => {
                warn!(token = %token, %error, "lookup failed");
                self.surface
                    .set_content(&PopupContent::Error(LOOKUP_FAILED.to_string()));
                self.error_banner(LOOKUP_FAILED);
                return;
            }
        };

        session.original_definition = Some(data.definition.clone().unwrap_or_default());
        // Nothing translated is on screen any more.
        session.current_language = None;
        session.next_translation();
        session.synonyms = data.synonyms;
        session.examples = data.examples;
        session.detected_language = data.detected_language;
        session.source_language = data.source_language;

        let original = session.original_language().map(str::to_string);
        session.selected_language = original
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let selector = LanguageSelector::build(
            &self.languages,
            original.as_deref(),
            &session.selected_language,
        );

        let content = PopupContent::Definition {
            definition: data.definition.unwrap_or_else(|| NO_DEFINITION.to_string()),
            synonyms: session.synonyms.clone(),
            examples: session.examples.clone(),
        };
        self.surface.set_content(&content);
        self.surface
            .set_detected_language(session.detected_language.as_deref());
        self.surface.set_languages(&selector);
        debug!(token = %token, language = ?original, "lookup applied");
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    pub(super) fn select_language(&mut self, code: &str) {
        let Some(name) = self.languages.name(code).map(str::to_string) else {
            warn!(code, "unknown language selected");
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.selected_language == code {
            return;
        }
        let Some(original_definition) = session.original_definition.clone() else {
            debug!(token = %session.token, code, "lookup pending, language change ignored");
            self.surface.set_language(&session.selected_language);
            return;
        };

        let seq = session.next_translation();
        session.selected_language = code.to_string();
        let token = session.token;
        let request = TranslateRequest {
            word: session.selected_text.clone(),
            original_definition,
            context: session.context.clone(),
            target_language: code.to_string(),
            preserve_context: true,
        };

        self.surface
            .set_content(&PopupContent::Pending(format!("Translating to {name}...")));
        debug!(token = %token, seq, target = code, "translation requested");

        let language = code.to_string();
        self.spawn_request(HostMessage::TranslateDefinition(request), move |result| {
            Completion::Translation {
                token,
                seq,
                language,
                result,
            }
        });
    }

    pub(super) fn on_translation(
        &mut self,
        token: SessionToken,
        seq: u64,
        language: LangCode,
        result: Result<DefinitionData, String>,
    ) {
        let Some(session) = self.session.as_mut().filter(|s| s.token == token) else {
            debug!(token = %token, "translation for a closed popup dropped");
            return;
        };
        if seq != session.translation_seq {
            debug!(
                token = %token,
                seq,
                latest = session.translation_seq,
                "superseded translation dropped"
            );
            return;
        }
        let name = self
            .languages
            .name(&language)
            .unwrap_or(language.as_str())
            .to_string();

        match result {
            Ok(data) => {
                session.current_language = Some(language.clone());
                session.selected_language = language.clone();
                let content = PopupContent::Definition {
                    definition: data.definition.unwrap_or_else(|| NO_DEFINITION.to_string()),
                    synonyms: session.synonyms.clone(),
                    examples: session.examples.clone(),
                };
                self.surface.set_content(&content);
                self.surface.set_language(&language);
                debug!(token = %token, %language, "translation applied");
            }
            Err(error) => {
                let revert = session.revert_language();
                session.selected_language = revert.clone();
                warn!(token = %token, %language, %error, "translation failed");

                let message = format!("Failed to translate to {name}");
                self.surface
                    .set_content(&PopupContent::Error(message.clone()));
                self.surface.set_language(&revert);
                self.error_banner(message);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Other actions
    // -----------------------------------------------------------------------

    pub(super) fn open_full_definition(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let url = full_definition_url(&self.lookup.url_base, &session.selected_text);
        debug!(%url, "opening full definition");
        self.surface.open_url(&url);
    }

    pub(super) fn speak_selection(&mut self) {
        if let Some(session) = self.session.as_ref() {
            self.surface.speak(&session.selected_text);
        }
    }
}
