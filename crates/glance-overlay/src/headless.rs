//! In-memory [`PageSurface`].
//!
//! Holds a scripted page (selection, viewport, background) and records
//! everything the controller does to it. Used where no real page exists,
//! and in tests. Clones share the same state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glance_common::{Banner, Point, RenderError, Size};

use crate::context::AncestorNode;
use crate::surface::{
    LanguageSelector, ListenerHandle, PageSurface, PopupContent, PopupListener, PopupMount,
    PopupView, Result,
};

/// Scripted page inputs plus a record of surface calls.
#[derive(Debug)]
pub struct HeadlessState {
    // Page inputs.
    pub selection: String,
    pub ancestry: Option<Vec<AncestorNode>>,
    pub viewport: Size,
    pub background: Option<String>,
    pub url: String,
    pub title: String,
    /// Size reported after mounting; `None` means "cannot measure".
    pub measured: Option<Size>,
    /// Next mount fails with this error.
    pub fail_mount: Option<RenderError>,

    // Popup record.
    pub mounted: Option<PopupView>,
    pub position: Option<Point>,
    pub translation: Point,
    pub visible: bool,
    pub contents: Vec<PopupContent>,
    pub languages: Option<LanguageSelector>,
    pub language: Option<String>,
    pub detected_language: Option<String>,
    pub removed: usize,
    pub selection_cleared: usize,

    // Side effects.
    pub banners: Vec<Banner>,
    pub opened_urls: Vec<String>,
    pub spoken: Vec<String>,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            selection: String::new(),
            ancestry: None,
            viewport: Size::new(1280.0, 800.0),
            background: None,
            url: "about:blank".into(),
            title: String::new(),
            measured: None,
            fail_mount: None,
            mounted: None,
            position: None,
            translation: Point::default(),
            visible: false,
            contents: Vec::new(),
            languages: None,
            language: None,
            detected_language: None,
            removed: 0,
            selection_cleared: 0,
            banners: Vec::new(),
            opened_urls: Vec::new(),
            spoken: Vec::new(),
        }
    }
}

impl HeadlessState {
    /// Most recent popup content.
    pub fn content(&self) -> Option<&PopupContent> {
        self.contents.last()
    }

    pub fn banner_messages(&self) -> Vec<&str> {
        self.banners.iter().map(|b| b.message.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Arc<Mutex<HeadlessState>>,
    listeners: Arc<AtomicUsize>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the selection and its ancestry.
    pub fn select(&self, text: &str, ancestry: Option<Vec<AncestorNode>>) {
        let mut state = self.state();
        state.selection = text.to_string();
        state.ancestry = ancestry;
    }

    /// Number of listener sets currently registered.
    pub fn active_listeners(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }
}

struct ListenerRegistration(Arc<AtomicUsize>);

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PageSurface for HeadlessSurface {
    fn selection_text(&self) -> String {
        self.state().selection.clone()
    }

    fn selection_ancestry(&self) -> Option<Vec<AncestorNode>> {
        self.state().ancestry.clone()
    }

    fn clear_selection(&mut self) {
        let mut state = self.state();
        state.selection.clear();
        state.ancestry = None;
        state.selection_cleared += 1;
    }

    fn viewport(&self) -> Size {
        self.state().viewport
    }

    fn background_color(&self) -> Option<String> {
        self.state().background.clone()
    }

    fn page_url(&self) -> String {
        self.state().url.clone()
    }

    fn page_title(&self) -> String {
        self.state().title.clone()
    }

    fn mount_popup(&mut self, view: &PopupView) -> Result<PopupMount> {
        let mut state = self.state();
        if let Some(e) = state.fail_mount.take() {
            return Err(e);
        }
        state.mounted = Some(view.clone());
        state.contents.push(view.content.clone());
        state.languages = Some(view.languages.clone());
        state.translation = Point::default();
        state.visible = false;
        Ok(PopupMount {
            size: state.measured,
        })
    }

    fn set_position(&mut self, position: Point) {
        self.state().position = Some(position);
    }

    fn set_translation(&mut self, offset: Point) {
        self.state().translation = offset;
    }

    fn fade_in(&mut self) {
        self.state().visible = true;
    }

    fn set_content(&mut self, content: &PopupContent) {
        self.state().contents.push(content.clone());
    }

    fn set_languages(&mut self, selector: &LanguageSelector) {
        let mut state = self.state();
        state.language = Some(selector.selected.clone());
        state.languages = Some(selector.clone());
    }

    fn set_language(&mut self, code: &str) {
        self.state().language = Some(code.to_string());
    }

    fn set_detected_language(&mut self, code: Option<&str>) {
        self.state().detected_language = code.map(str::to_string);
    }

    fn remove_popup(&mut self) {
        let mut state = self.state();
        state.mounted = None;
        state.position = None;
        state.visible = false;
        state.removed += 1;
    }

    fn listen(&mut self, _listeners: &[PopupListener]) -> Result<ListenerHandle> {
        self.listeners.fetch_add(1, Ordering::SeqCst);
        Ok(ListenerHandle::new(ListenerRegistration(Arc::clone(
            &self.listeners,
        ))))
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.state().banners.push(banner.clone());
    }

    fn open_url(&mut self, url: &str) {
        self.state().opened_urls.push(url.to_string());
    }

    fn speak(&mut self, text: &str) {
        self.state().spoken.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_common::SessionToken;

    use crate::theme::Palette;

    fn view() -> PopupView {
        PopupView {
            token: SessionToken(1),
            selected_text: "word".into(),
            content: PopupContent::analyzing(),
            palette: Palette::LIGHT,
            languages: LanguageSelector {
                options: Vec::new(),
                selected: "en".into(),
            },
        }
    }

    #[test]
    fn mount_reports_measured_size() {
        let mut surface = HeadlessSurface::new();
        surface.state().measured = Some(Size::new(320.0, 180.0));
        let mount = surface.mount_popup(&view()).unwrap();
        assert_eq!(mount.size, Some(Size::new(320.0, 180.0)));
        assert_eq!(surface.state().content(), Some(&PopupContent::analyzing()));
    }

    #[test]
    fn scripted_mount_failure_fires_once() {
        let mut surface = HeadlessSurface::new();
        surface.state().fail_mount = Some(RenderError::MissingElement("popup header".into()));
        assert!(surface.mount_popup(&view()).is_err());
        assert!(surface.mount_popup(&view()).is_ok());
    }

    #[test]
    fn listener_count_follows_handles() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.listen(&PopupListener::ALL).unwrap();
        assert_eq!(surface.active_listeners(), 1);
        drop(handle);
        assert_eq!(surface.active_listeners(), 0);
    }

    #[test]
    fn clones_share_state() {
        let surface = HeadlessSurface::new();
        let other = surface.clone();
        other.select("shared", None);
        assert_eq!(surface.selection_text(), "shared");
    }
}
