//! Selection and popup controller.
//!
//! The controller is driven entirely from one event loop: page input
//! arrives as [`PageEvent`]s and finished async work (requests, the
//! gesture debounce) comes back as [`Completion`]s on the channel handed to
//! [`PopupController::new`]. Every request completion carries the token of
//! the popup that issued it and is dropped if that popup is gone.

mod events;
mod gestures;
mod lookup;


use std::sync::Arc;

use glance_bridge::HostRequester;
use glance_common::{Banner, TokenSource};
use glance_config::{GlanceConfig, LanguageCatalog, LookupConfig, PopupConfig, SelectionConfig};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::context::ContextCache;
use crate::popup::{PopupPhase, PopupSession};
use crate::surface::PageSurface;

pub use events::{Completion, PageEvent, PointerTarget};
pub use lookup::full_definition_url;

pub struct PopupController<S: PageSurface> {
    surface: S,
    requester: Arc<dyn HostRequester>,
    completions: mpsc::UnboundedSender<Completion>,

    selection: SelectionConfig,
    popup: PopupConfig,
    lookup: LookupConfig,
    languages: LanguageCatalog,

    tokens: TokenSource,
    session: Option<PopupSession>,
    closed_at: Option<Instant>,
    contexts: ContextCache,
}

impl<S: PageSurface> PopupController<S> {
    pub fn new(
        surface: S,
        requester: Arc<dyn HostRequester>,
        config: &GlanceConfig,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        Self {
            surface,
            requester,
            completions,
            selection: config.selection.clone(),
            popup: config.popup.clone(),
            lookup: config.lookup.clone(),
            languages: config.languages.clone(),
            tokens: TokenSource::new(),
            session: None,
            closed_at: None,
            contexts: ContextCache::new(config.selection.context_cache_capacity),
        }
    }

    pub fn handle_page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::DoubleClick { point } => self.on_double_click(point),
            PageEvent::MouseUp {
                point,
                button,
                alt,
                detail,
            } => self.on_mouse_up(point, button, alt, detail),
            PageEvent::PointerDown { point, target } => self.on_pointer_down(point, target),
            PageEvent::PointerMove { point } => self.on_pointer_move(point),
            PageEvent::Click { target } => self.on_click(target),
            PageEvent::Resize { viewport } => self.on_resize(viewport),
            PageEvent::LanguageSelected { code } => self.select_language(&code),
            PageEvent::CloseClicked => self.close_popup("close button"),
            PageEvent::MoreClicked => self.open_full_definition(),
            PageEvent::SpeakClicked => self.speak_selection(),
        }
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::SelectionSettled { text, anchor } => {
                self.on_selection_settled(&text, anchor)
            }
            Completion::Lookup { token, result } => self.on_lookup(token, result),
            Completion::Translation {
                token,
                seq,
                language,
                result,
            } => self.on_translation(token, seq, language, result),
        }
    }

    /// Show a banner on the page, e.g. one published by the connection
    /// monitor.
    pub fn show_banner(&mut self, banner: &Banner) {
        self.surface.show_banner(banner);
    }

    /// Close the popup, if any. Used at page teardown.
    pub fn close(&mut self) {
        self.close_popup("teardown");
    }

    pub fn phase(&self) -> Option<PopupPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn session(&self) -> Option<&PopupSession> {
        self.session.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether new popups are held off because one just closed.
    pub fn is_suppressed(&self) -> bool {
        self.closed_at
            .is_some_and(|at| at.elapsed() < self.popup.close_suppression())
    }

    fn error_banner(&mut self, message: impl Into<String>) {
        let banner = Banner::error(message).with_ttl(self.popup.banner_ttl());
        debug!(message = %banner.message, "showing banner");
        self.surface.show_banner(&banner);
    }
}
