//! Selection gestures and the popup lifecycle.

use glance_common::{Point, RenderError, SessionToken, Size};
use glance_config::DEFAULT_LANGUAGE;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::placement::{place, reclamp};
use crate::popup::PopupSession;
use crate::selection::{validate_selection, Gesture, SelectionError};
use crate::surface::{
    LanguageSelector, ListenerHandle, PageSurface, PopupContent, PopupListener, PopupView,
};
use crate::theme::ColorScheme;

use super::events::{Completion, PointerTarget};
use super::PopupController;

const PRIMARY_BUTTON: u16 = 0;

impl<S: PageSurface> PopupController<S> {
    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    pub(super) fn on_double_click(&mut self, anchor: Point) {
        if self.session.is_some() {
            return;
        }
        let text = self.surface.selection_text();
        if !Gesture::DoubleClick.accepts(text.trim(), &self.selection) {
            return;
        }
        self.handle_selected_text(anchor);
    }

    pub(super) fn on_mouse_up(&mut self, point: Point, button: u16, alt: bool, detail: u32) {
        if let Some(session) = self.session.as_mut() {
            if session.end_drag() {
                debug!(token = %session.token, "drag finished");
            }
            // Selections made while a popup is open never start a lookup.
            return;
        }
        if detail == 2 || button != PRIMARY_BUTTON || !alt {
            return;
        }

        let text = self.surface.selection_text().trim().to_string();
        if !Gesture::Extended.accepts(&text, &self.selection) {
            return;
        }

        let deadline = Instant::now() + self.selection.debounce();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = completions.send(Completion::SelectionSettled {
                text,
                anchor: point,
            });
        });
    }

    pub(super) fn on_selection_settled(&mut self, text: &str, anchor: Point) {
        let live = self.surface.selection_text();
        if live.trim() != text {
            debug!("selection changed during debounce");
            return;
        }
        self.handle_selected_text(anchor);
    }

    /// Validate the live selection and, if it qualifies, open a popup and
    /// start the lookup.
    fn handle_selected_text(&mut self, anchor: Point) {
        if !self.requester.is_alive() {
            debug!("host not reachable, ignoring selection");
            return;
        }
        if self.session.is_some() {
            return;
        }
        if self.is_suppressed() {
            debug!("popup just closed, ignoring selection");
            return;
        }

        let raw = self.surface.selection_text();
        let text = match validate_selection(&raw, &self.selection) {
            Ok(text) => text.to_string(),
            Err(SelectionError::Empty) => return,
            Err(e) => {
                self.error_banner(e.to_string());
                return;
            }
        };

        match self.open_popup(&text, anchor) {
            Ok(token) => self.request_lookup(token, &text),
            Err(e) => warn!(error = %e, "popup creation failed"),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Mount, place and show a new popup with placeholder content.
    fn open_popup(&mut self, text: &str, anchor: Point) -> Result<SessionToken, RenderError> {
        if self.session.is_some() {
            self.close_popup("replaced");
        }

        let token = self.tokens.next_token();
        let mut session = PopupSession::new(token, anchor, text);
        let scheme = ColorScheme::detect(self.surface.background_color().as_deref());
        let view = PopupView {
            token,
            selected_text: text.to_string(),
            content: PopupContent::analyzing(),
            palette: scheme.palette(),
            languages: LanguageSelector::build(&self.languages, None, DEFAULT_LANGUAGE),
        };

        match self.mount(&view, anchor) {
            Ok((position, size, listeners)) => {
                session.positioned(position, size, listeners);
                info!(token = %token, x = position.x, y = position.y, ?scheme, "popup opened");
                self.session = Some(session);
                Ok(token)
            }
            Err(e) => {
                self.surface.remove_popup();
                self.error_banner(format!("Failed to create popup: {e}"));
                Err(e)
            }
        }
    }

    fn mount(
        &mut self,
        view: &PopupView,
        anchor: Point,
    ) -> Result<(Point, Size, ListenerHandle), RenderError> {
        let mounted = self.surface.mount_popup(view)?;
        let size = mounted.size.unwrap_or(Size::new(
            self.popup.estimated_width,
            self.popup.estimated_height,
        ));
        let position = place(anchor, size, self.surface.viewport(), &self.popup);
        self.surface.set_position(position);
        self.surface.fade_in();
        let listeners = self.surface.listen(&PopupListener::ALL)?;
        Ok((position, size, listeners))
    }

    /// The single close path: release listeners, clear the selection,
    /// remove the popup and start the suppression window.
    pub(super) fn close_popup(&mut self, reason: &'static str) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.begin_close();
        self.surface.clear_selection();
        self.surface.remove_popup();
        self.closed_at = Some(Instant::now());
        info!(token = %session.token, reason, "popup closed");
    }

    pub(super) fn on_click(&mut self, target: PointerTarget) {
        if self.session.is_some() && !target.is_inside_popup() {
            self.close_popup("outside click");
        }
    }

    // -----------------------------------------------------------------------
    // Dragging and resize
    // -----------------------------------------------------------------------

    pub(super) fn on_pointer_down(&mut self, point: Point, target: PointerTarget) {
        if target != PointerTarget::Header {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if session.begin_drag(point) {
                debug!(token = %session.token, "drag started");
            }
        }
    }

    pub(super) fn on_pointer_move(&mut self, point: Point) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(offset) = session.drag_to(point) {
            self.surface.set_translation(offset);
        }
    }

    pub(super) fn on_resize(&mut self, viewport: Size) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let visual = session.visual_position();
        let clamped = reclamp(visual, session.size, viewport, &self.popup);
        if clamped != visual {
            session.shift(clamped - visual);
            self.surface.set_translation(session.drag_offset);
            debug!(token = %session.token, x = clamped.x, y = clamped.y, "popup re-clamped");
        }
    }
}
