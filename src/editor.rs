//! # Editor State
//!
//! All mutable editor state lives in [`EditorState`] and changes through
//! [`EditorState::handle`], one call per input event. Rendering reads the
//! state and never mutates it.
//!
//! ## Gestures
//!
//! | Button | Session | Move events |
//! |--------|---------|-------------|
//! | primary | draw | stamp the brush at each sampled cell (no interpolation) |
//! | secondary | pan | offset follows the pointer |
//!
//! Only one session is active at a time; pointer up or leave ends it.
//!
//! ## Network responses
//!
//! Save, load, list and delete are started with `begin_*`, which issues a
//! [`RequestToken`] in a [`RequestScope`]. The matching `finish_*` applies the
//! response only if no newer request was issued in the same scope;
//! otherwise it returns [`Completion::Stale`] and changes nothing. Deletes
//! are scoped per project id, so deleting one project never cancels
//! another request. Replacing the open project (load, new, deleting it)
//! also retires any save still in flight.
//!
//! Successful saves and deletes ask for a fresh project list, picked up
//! with [`EditorState::take_list_refresh`].
//!
//! ```
//! use knitgrid::editor::{EditorState, Event, PointerButton, Completion};
//!
//! let mut editor = EditorState::new();
//! editor.handle(Event::PointerDown { button: PointerButton::Primary, x: 25.0, y: 25.0 });
//! editor.handle(Event::PointerUp);
//!
//! let first = editor.begin_save();
//! let second = editor.begin_save();
//! // Only the newest save is applied
//! assert_eq!(editor.finish_save(first.token, Ok("abc".into())), Completion::Stale);
//! assert_eq!(editor.finish_save(second.token, Ok("abc".into())), Completion::Applied);
//! assert_eq!(editor.project_id(), Some("abc"));
//! ```

use image::RgbaImage;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::KnitError;
use crate::grid::{CellStore, Grid};
use crate::project::{DEFAULT_NAME, ProjectDocument, ProjectSummary};
use crate::render::canvas;
use crate::viewport::{Viewport, ViewportSize};

pub const MIN_BRUSH: u32 = 1;
pub const MAX_BRUSH: u32 = 8;
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Paint,
    Erase,
}

/// Input to [`EditorState::handle`]. Pointer positions are relative to the
/// drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    PointerDown { button: PointerButton, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Wheel { delta_y: f64 },
    SetZoom(i32),
    SetBrush(u32),
    SetColor(String),
    SetTool(Tool),
    SetName(String),
    Resize(ViewportSize),
    /// Fixed `(cols, rows)` bounds, or `None` for an unbounded grid. Any
    /// change clears the grid.
    SetDimensions(Option<(u32, u32)>),
    FitToContent,
    /// Start a fresh, unsaved project.
    New,
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Requests only supersede earlier requests of the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestScope {
    Save,
    Load,
    List,
    /// Deletes are tracked per project id.
    Delete(String),
}

/// Monotonic token source; per scope, only the most recently issued token
/// is current.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    issued: u64,
    latest: HashMap<RequestScope, u64>,
}

impl RequestTracker {
    pub fn issue(&mut self, scope: RequestScope) -> RequestToken {
        self.issued += 1;
        self.latest.insert(scope, self.issued);
        RequestToken(self.issued)
    }

    pub fn is_current(&self, scope: &RequestScope, token: RequestToken) -> bool {
        self.latest.get(scope) == Some(&token.0)
    }

    /// Make every outstanding token of `scope` stale.
    pub fn retire(&mut self, scope: &RequestScope) {
        self.latest.remove(scope);
    }

    /// Forget a finished request so completed scopes do not accumulate.
    fn complete(&mut self, scope: &RequestScope) {
        if let RequestScope::Delete(_) = scope {
            self.latest.remove(scope);
        }
    }
}

/// Result of feeding a response back into the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// `POST /api/projects`
    Create,
    /// `PUT /api/projects/{id}`
    Update(String),
}

/// Everything a transport needs to send a save.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub token: RequestToken,
    pub target: SaveTarget,
    pub document: ProjectDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Idle,
    Drawing,
    Panning,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    grid: Grid,
    color: String,
    tool: Tool,
    brush: u32,
    viewport: Viewport,
    viewport_size: ViewportSize,
    session: Session,
    project_id: Option<String>,
    project_name: String,
    requests: RequestTracker,
    notices: Vec<String>,
    projects: Vec<ProjectSummary>,
    list_refresh: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            grid: Grid::default(),
            color: DEFAULT_COLOR.to_string(),
            tool: Tool::Paint,
            brush: MIN_BRUSH,
            viewport: Viewport::default(),
            viewport_size: ViewportSize::default(),
            session: Session::Idle,
            project_id: None,
            project_name: DEFAULT_NAME.to_string(),
            requests: RequestTracker::default(),
            notices: Vec::new(),
            projects: Vec::new(),
            list_refresh: true,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_size(&self) -> ViewportSize {
        self.viewport_size
    }

    pub fn brush(&self) -> u32 {
        self.brush
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn is_drawing(&self) -> bool {
        self.session == Session::Drawing
    }

    pub fn is_panning(&self) -> bool {
        self.session == Session::Panning
    }

    /// Stored projects as of the last applied list response.
    pub fn projects(&self) -> &[ProjectSummary] {
        &self.projects
    }

    /// Messages for the user since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Apply one input event. Returns true when the canvas needs a redraw.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::PointerDown { button, x, y } => {
                if self.session != Session::Idle {
                    return false;
                }
                match button {
                    PointerButton::Primary => {
                        self.session = Session::Drawing;
                        self.stamp_at(x, y);
                        true
                    }
                    PointerButton::Secondary => {
                        self.session = Session::Panning;
                        self.viewport.begin_pan(x, y);
                        false
                    }
                    PointerButton::Auxiliary => false,
                }
            }
            Event::PointerMove { x, y } => match self.session {
                Session::Panning => self.viewport.pan_to(x, y),
                Session::Drawing => {
                    self.stamp_at(x, y);
                    true
                }
                Session::Idle => false,
            },
            Event::PointerUp | Event::PointerLeave => {
                self.session = Session::Idle;
                self.viewport.end_pan();
                false
            }
            Event::Wheel { delta_y } => {
                let before = self.viewport.zoom();
                self.viewport.wheel(delta_y);
                self.viewport.zoom() != before
            }
            Event::SetZoom(zoom) => {
                let before = self.viewport.zoom();
                self.viewport.set_zoom(zoom);
                self.viewport.zoom() != before
            }
            Event::SetBrush(size) => {
                self.brush = size.clamp(MIN_BRUSH, MAX_BRUSH);
                false
            }
            Event::SetColor(color) => {
                self.color = color;
                false
            }
            Event::SetTool(tool) => {
                self.tool = tool;
                false
            }
            Event::SetName(name) => {
                self.project_name = name;
                false
            }
            Event::Resize(size) => {
                self.viewport_size = size;
                true
            }
            Event::SetDimensions(dimensions) => {
                self.session = Session::Idle;
                self.viewport.end_pan();
                self.grid.set_dimensions(dimensions)
            }
            Event::FitToContent => self.viewport.fit_to_content(&self.grid, self.viewport_size),
            Event::New => {
                self.reset_project();
                true
            }
        }
    }

    /// Draw the current viewport.
    pub fn render(&self) -> RgbaImage {
        canvas::render_canvas(
            &self.grid,
            self.viewport_size.width.max(0.0) as u32,
            self.viewport_size.height.max(0.0) as u32,
            self.viewport.offset(),
            self.viewport.zoom(),
        )
    }

    /// The working project as it would be persisted.
    pub fn document(&self) -> ProjectDocument {
        ProjectDocument::from_grid(self.project_name.clone(), &self.grid)
    }

    pub fn begin_save(&mut self) -> SaveRequest {
        let target = match &self.project_id {
            Some(id) => SaveTarget::Update(id.clone()),
            None => SaveTarget::Create,
        };
        SaveRequest {
            token: self.requests.issue(RequestScope::Save),
            target,
            document: self.document(),
        }
    }

    /// Feed back the id returned by a create or update.
    pub fn finish_save(&mut self, token: RequestToken, result: Result<String, KnitError>) -> Completion {
        if !self.requests.is_current(&RequestScope::Save, token) {
            debug!(?token, "discarding stale save response");
            return Completion::Stale;
        }
        match result {
            Ok(id) => {
                let verb = if self.project_id.is_some() { "Updated" } else { "Saved" };
                self.notices.push(format!("{}: {}", verb, id));
                self.project_id = Some(id);
                self.list_refresh = true;
            }
            Err(e) => self.notices.push(format!("Failed to save: {}", e)),
        }
        Completion::Applied
    }

    pub fn begin_load(&mut self, id: &str) -> RequestToken {
        debug!(%id, "loading project");
        self.requests.issue(RequestScope::Load)
    }

    /// Replace the working project with a loaded document and fit it in view.
    pub fn finish_load(
        &mut self,
        token: RequestToken,
        id: &str,
        result: Result<ProjectDocument, KnitError>,
    ) -> Completion {
        if !self.requests.is_current(&RequestScope::Load, token) {
            debug!(?token, %id, "discarding stale load response");
            return Completion::Stale;
        }
        match result {
            Ok(doc) => {
                self.grid = doc.to_grid();
                self.project_name = doc.name;
                self.project_id = Some(id.to_string());
                self.requests.retire(&RequestScope::Save);
                self.session = Session::Idle;
                self.viewport.end_pan();
                self.viewport.fit_to_content(&self.grid, self.viewport_size);
            }
            Err(_) => self.notices.push("Failed to load".to_string()),
        }
        Completion::Applied
    }

    pub fn begin_delete(&mut self, id: &str) -> RequestToken {
        debug!(%id, "deleting project");
        self.requests.issue(RequestScope::Delete(id.to_string()))
    }

    /// Deleting the open project leaves an empty, unsaved one.
    pub fn finish_delete(&mut self, token: RequestToken, id: &str, result: Result<(), KnitError>) -> Completion {
        let scope = RequestScope::Delete(id.to_string());
        if !self.requests.is_current(&scope, token) {
            debug!(?token, %id, "discarding stale delete response");
            return Completion::Stale;
        }
        self.requests.complete(&scope);
        match result {
            Ok(()) => {
                if self.project_id.as_deref() == Some(id) {
                    self.reset_project();
                }
                self.list_refresh = true;
            }
            Err(e) => self.notices.push(format!("Failed to delete: {}", e)),
        }
        Completion::Applied
    }

    pub fn begin_list(&mut self) -> RequestToken {
        self.list_refresh = false;
        self.requests.issue(RequestScope::List)
    }

    /// Replace the held project list. A failed listing keeps the old one.
    pub fn finish_list(&mut self, token: RequestToken, result: Result<Vec<ProjectSummary>, KnitError>) -> Completion {
        if !self.requests.is_current(&RequestScope::List, token) {
            debug!(?token, "discarding stale list response");
            return Completion::Stale;
        }
        match result {
            Ok(projects) => self.projects = projects,
            Err(e) => warn!(error = %e, "failed to list projects"),
        }
        Completion::Applied
    }

    /// Start a list request if one is due: on startup and after every
    /// successful save or delete.
    pub fn take_list_refresh(&mut self) -> Option<RequestToken> {
        if self.list_refresh {
            Some(self.begin_list())
        } else {
            None
        }
    }

    fn stamp_at(&mut self, x: f64, y: f64) {
        let origin = self.viewport.cell_at(x, y);
        let color = match self.tool {
            Tool::Paint => Some(self.color.as_str()),
            Tool::Erase => None,
        };
        self.grid.stamp_brush(origin, self.brush, color);
    }

    fn reset_project(&mut self) {
        self.grid.clear();
        self.project_id = None;
        self.project_name = DEFAULT_NAME.to_string();
        self.requests.retire(&RequestScope::Save);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CellCoord, Offset};
    use crate::grid::SparseGrid;
    use serde_json::json;

    fn down(button: PointerButton, x: f64, y: f64) -> Event {
        Event::PointerDown { button, x, y }
    }

    fn click(editor: &mut EditorState, x: f64, y: f64) {
        editor.handle(down(PointerButton::Primary, x, y));
        editor.handle(Event::PointerUp);
    }

    fn summary(id: &str, name: &str) -> ProjectSummary {
        ProjectSummary {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn test_draw_stroke_stamps_each_sample() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetColor("#ff0000".into()));
        assert!(editor.handle(down(PointerButton::Primary, 5.0, 5.0)));
        assert!(editor.is_drawing());
        // Jump three cells: no interpolation in between
        editor.handle(Event::PointerMove { x: 65.0, y: 5.0 });
        editor.handle(Event::PointerUp);

        assert_eq!(editor.grid().len(), 2);
        assert_eq!(editor.grid().cell(CellCoord::new(0, 0)), Some("#ff0000"));
        assert_eq!(editor.grid().cell(CellCoord::new(3, 0)), Some("#ff0000"));
        assert_eq!(editor.grid().cell(CellCoord::new(1, 0)), None);

        // Moves after release do nothing
        assert!(!editor.handle(Event::PointerMove { x: 105.0, y: 5.0 }));
        assert_eq!(editor.grid().len(), 2);
    }

    #[test]
    fn test_brush_and_eraser() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetBrush(3));
        click(&mut editor, 0.0, 0.0);
        assert_eq!(editor.grid().len(), 9);

        editor.handle(Event::SetTool(Tool::Erase));
        editor.handle(Event::SetBrush(1));
        editor.handle(down(PointerButton::Primary, 25.0, 25.0));
        editor.handle(Event::PointerLeave);
        assert_eq!(editor.grid().len(), 8);
        assert_eq!(editor.grid().cell(CellCoord::new(1, 1)), None);
    }

    #[test]
    fn test_brush_capped() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetBrush(50));
        assert_eq!(editor.brush(), MAX_BRUSH);
        editor.handle(Event::SetBrush(0));
        assert_eq!(editor.brush(), MIN_BRUSH);
    }

    #[test]
    fn test_pan_with_secondary_button() {
        let mut editor = EditorState::new();
        editor.handle(down(PointerButton::Secondary, 100.0, 100.0));
        assert!(editor.is_panning());
        assert!(editor.handle(Event::PointerMove { x: 150.0, y: 80.0 }));
        assert_eq!(editor.viewport().offset(), Offset::new(50.0, -20.0));
        assert!(editor.grid().is_empty(), "panning never paints");
        editor.handle(Event::PointerUp);
        assert!(!editor.is_panning());
    }

    #[test]
    fn test_sessions_are_exclusive() {
        let mut editor = EditorState::new();
        editor.handle(down(PointerButton::Secondary, 0.0, 0.0));
        // Primary press during a pan is ignored
        assert!(!editor.handle(down(PointerButton::Primary, 10.0, 10.0)));
        assert!(editor.grid().is_empty());
        editor.handle(Event::PointerUp);

        editor.handle(down(PointerButton::Primary, 10.0, 10.0));
        editor.handle(down(PointerButton::Secondary, 0.0, 0.0));
        assert!(editor.is_drawing());
        let offset = editor.viewport().offset();
        editor.handle(Event::PointerMove { x: 200.0, y: 200.0 });
        assert_eq!(editor.viewport().offset(), offset);
    }

    #[test]
    fn test_wheel_zoom() {
        let mut editor = EditorState::new();
        assert!(editor.handle(Event::Wheel { delta_y: -100.0 }));
        assert_eq!(editor.viewport().zoom(), 22);
        editor.handle(Event::SetZoom(100));
        assert!(!editor.handle(Event::Wheel { delta_y: -100.0 }));
    }

    #[test]
    fn test_save_create_then_update_adopts_new_id() {
        let mut editor = EditorState::new();
        click(&mut editor, 0.0, 0.0);

        let req = editor.begin_save();
        assert_eq!(req.target, SaveTarget::Create);
        assert_eq!(req.document.grid.len(), 1);
        assert_eq!(editor.finish_save(req.token, Ok("a1".into())), Completion::Applied);
        assert_eq!(editor.project_id(), Some("a1"));
        assert_eq!(editor.take_notices(), vec!["Saved: a1".to_string()]);

        editor.handle(Event::SetName("Hat".into()));
        let req = editor.begin_save();
        assert_eq!(req.target, SaveTarget::Update("a1".into()));
        editor.finish_save(req.token, Ok("a1-hat".into()));
        assert_eq!(editor.project_id(), Some("a1-hat"));
        assert_eq!(editor.take_notices(), vec!["Updated: a1-hat".to_string()]);
    }

    #[test]
    fn test_newer_save_supersedes_older() {
        let mut editor = EditorState::new();
        let first = editor.begin_save();
        let second = editor.begin_save();

        assert_eq!(editor.finish_save(first.token, Ok("late".into())), Completion::Stale);
        assert_eq!(editor.project_id(), None);
        assert!(editor.take_notices().is_empty());
        assert_eq!(editor.finish_save(second.token, Ok("b2".into())), Completion::Applied);
        assert_eq!(editor.project_id(), Some("b2"));
    }

    #[test]
    fn test_unrelated_delete_keeps_pending_save() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetName("Hat".into()));
        let save = editor.begin_save();
        let delete = editor.begin_delete("some-other-project");

        assert_eq!(editor.finish_save(save.token, Ok("newid-hat".into())), Completion::Applied);
        assert_eq!(editor.project_id(), Some("newid-hat"));
        assert_eq!(editor.begin_save().target, SaveTarget::Update("newid-hat".into()));
        assert_eq!(
            editor.finish_delete(delete, "some-other-project", Ok(())),
            Completion::Applied
        );
        assert_eq!(editor.project_id(), Some("newid-hat"));
    }

    #[test]
    fn test_deletes_scoped_per_project() {
        let mut editor = EditorState::new();
        let a = editor.begin_delete("a");
        let b = editor.begin_delete("b");
        let a_again = editor.begin_delete("a");

        assert_eq!(editor.finish_delete(b, "b", Ok(())), Completion::Applied);
        assert_eq!(editor.finish_delete(a, "a", Ok(())), Completion::Stale);
        assert_eq!(editor.finish_delete(a_again, "a", Ok(())), Completion::Applied);
    }

    #[test]
    fn test_load_retires_pending_save() {
        let mut editor = EditorState::new();
        click(&mut editor, 0.0, 0.0);
        let save = editor.begin_save();

        let load = editor.begin_load("p1");
        editor.finish_load(load, "p1", Ok(ProjectDocument::new("Other", SparseGrid::new())));
        // The save belonged to the project that was replaced
        assert_eq!(editor.finish_save(save.token, Ok("old".into())), Completion::Stale);
        assert_eq!(editor.project_id(), Some("p1"));
    }

    #[test]
    fn test_load_replaces_and_fits() {
        let mut editor = EditorState::new();
        editor.handle(Event::Resize(ViewportSize::new(800.0, 600.0)));
        let mut grid = SparseGrid::new();
        grid.set(CellCoord::new(5, 5), "#000");

        let token = editor.begin_load("p1");
        let result = editor.finish_load(token, "p1", Ok(ProjectDocument::new("Loaded", grid)));
        assert_eq!(result, Completion::Applied);
        assert_eq!(editor.project_id(), Some("p1"));
        assert_eq!(editor.project_name(), "Loaded");
        assert_eq!(editor.grid().dimensions(), None);
        assert_eq!(editor.viewport().offset(), Offset::new(300.0, 200.0));
    }

    #[test]
    fn test_newer_load_wins() {
        let mut editor = EditorState::new();
        let first = editor.begin_load("first");
        let second = editor.begin_load("second");
        assert_eq!(
            editor.finish_load(second, "second", Ok(ProjectDocument::new("Second", SparseGrid::new()))),
            Completion::Applied
        );
        assert_eq!(
            editor.finish_load(first, "first", Ok(ProjectDocument::new("First", SparseGrid::new()))),
            Completion::Stale
        );
        assert_eq!(editor.project_name(), "Second");
    }

    #[test]
    fn test_fixed_project_round_trip() {
        let doc: ProjectDocument = serde_json::from_value(json!({
            "name": "Swatch",
            "grid": [[null, "#f00"], ["#0f0", null]],
            "cols": 2,
            "rows": 2
        }))
        .unwrap();

        let mut editor = EditorState::new();
        let token = editor.begin_load("swatch");
        editor.finish_load(token, "swatch", Ok(doc));
        assert_eq!(editor.grid().dimensions(), Some((2, 2)));

        // Far outside the 2x2 bounds: clipped away
        editor.handle(Event::SetZoom(20));
        editor.handle(Event::FitToContent);
        click(&mut editor, 1000.0, 1000.0);
        assert_eq!(editor.grid().len(), 2);

        let save = editor.begin_save();
        assert_eq!(save.target, SaveTarget::Update("swatch".into()));
        assert_eq!((save.document.cols, save.document.rows), (Some(2), Some(2)));
        assert_eq!(
            serde_json::to_value(&save.document.grid).unwrap(),
            json!({"1,0": "#f00", "0,1": "#0f0"})
        );
    }

    #[test]
    fn test_set_dimensions_clears_and_clips() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetBrush(4));
        click(&mut editor, 0.0, 0.0);
        assert_eq!(editor.grid().len(), 16);

        assert!(editor.handle(Event::SetDimensions(Some((3, 2)))));
        assert!(editor.grid().is_empty());
        click(&mut editor, 0.0, 0.0);
        assert_eq!(editor.grid().len(), 6);
        assert!(!editor.handle(Event::SetDimensions(Some((3, 2)))));

        let doc = editor.document();
        assert_eq!((doc.cols, doc.rows), (Some(3), Some(2)));

        assert!(editor.handle(Event::SetDimensions(None)));
        assert!(editor.grid().is_empty());
        assert_eq!(editor.document().cols, None);
    }

    #[test]
    fn test_extreme_cell_loads_and_renders() {
        let doc: ProjectDocument =
            serde_json::from_value(json!({"grid": {"9223372036854775807,0": "#000"}})).unwrap();
        let mut editor = EditorState::new();
        editor.handle(Event::Resize(ViewportSize::new(64.0, 48.0)));
        let token = editor.begin_load("edge");
        assert_eq!(editor.finish_load(token, "edge", Ok(doc)), Completion::Applied);
        assert!(editor.handle(Event::FitToContent));
        assert_eq!(editor.render().dimensions(), (64, 48));

        // Brushing at the edge of the coordinate space drops the cells past i64::MAX
        editor.handle(Event::SetBrush(3));
        click(&mut editor, 32.0, 24.0);
        assert_eq!(editor.grid().len(), 3);
        assert_eq!(editor.grid().cell(CellCoord::new(i64::MAX, 2)), Some(DEFAULT_COLOR));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut editor = EditorState::new();
        click(&mut editor, 0.0, 0.0);

        let token = editor.begin_load("gone");
        editor.finish_load(token, "gone", Err(KnitError::NotFound("gone".into())));
        assert_eq!(editor.grid().len(), 1);
        assert_eq!(editor.project_id(), None);
        assert_eq!(editor.take_notices(), vec!["Failed to load".to_string()]);
    }

    #[test]
    fn test_delete_open_project_resets() {
        let mut editor = EditorState::new();
        let save = editor.begin_save();
        editor.finish_save(save.token, Ok("open".into()));
        click(&mut editor, 0.0, 0.0);

        let other = editor.begin_delete("other");
        editor.finish_delete(other, "other", Ok(()));
        assert_eq!(editor.project_id(), Some("open"));

        let token = editor.begin_delete("open");
        editor.finish_delete(token, "open", Ok(()));
        assert_eq!(editor.project_id(), None);
        assert_eq!(editor.project_name(), DEFAULT_NAME);
        assert!(editor.grid().is_empty());
    }

    #[test]
    fn test_list_refresh_on_start_and_after_mutations() {
        let mut editor = EditorState::new();
        let token = editor.take_list_refresh().unwrap();
        assert!(editor.take_list_refresh().is_none());
        editor.finish_list(token, Ok(vec![summary("a1", "Hat")]));
        assert_eq!(editor.projects(), &[summary("a1", "Hat")]);

        let save = editor.begin_save();
        editor.finish_save(save.token, Ok("b2".into()));
        assert!(editor.take_list_refresh().is_some());

        let delete = editor.begin_delete("a1");
        editor.finish_delete(delete, "a1", Ok(()));
        assert!(editor.take_list_refresh().is_some());

        let failed = editor.begin_delete("x");
        editor.finish_delete(failed, "x", Err(KnitError::NotFound("x".into())));
        assert!(editor.take_list_refresh().is_none());
    }

    #[test]
    fn test_stale_or_failed_list_keeps_projects() {
        let mut editor = EditorState::new();
        let old = editor.begin_list();
        let new = editor.begin_list();
        assert_eq!(editor.finish_list(old, Ok(vec![summary("old", "")])), Completion::Stale);
        assert!(editor.projects().is_empty());

        editor.finish_list(new, Ok(vec![summary("p", "")]));
        let failed = editor.begin_list();
        assert_eq!(
            editor.finish_list(failed, Err(KnitError::Server("down".into()))),
            Completion::Applied
        );
        assert_eq!(editor.projects()[0].label(), "p");
    }

    #[test]
    fn test_new_clears() {
        let mut editor = EditorState::new();
        editor.handle(Event::SetName("x".into()));
        click(&mut editor, 0.0, 0.0);
        editor.handle(Event::New);
        assert!(editor.grid().is_empty());
        assert_eq!(editor.project_name(), DEFAULT_NAME);
    }

    #[test]
    fn test_render_uses_viewport_size() {
        let mut editor = EditorState::new();
        editor.handle(Event::Resize(ViewportSize::new(120.0, 80.0)));
        assert_eq!(editor.render().dimensions(), (120, 80));
    }
}
