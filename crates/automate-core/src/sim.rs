//! In-process [`GestureDriver`] backed by a simulated scroll view.
//!
//! [`SimulatedScrollView`] models a single vertical scroll container on a
//! screen: a viewport frame, a content height, and elements placed either in
//! the scrolling content or fixed on screen. Drags on the container move the
//! content by the dragged distance, clamped to the scroll limits, without
//! momentum. An optional keyboard frame can cover part of the screen.
//!
//! Every gesture is recorded so callers can inspect what a consumer did.
//!
//! # Example
//!
//! ```no_run
//! use automate_core::driver::GestureDriver;
//! use automate_core::element::ElementQuery;
//! use automate_core::geometry::{Rect, Vector};
//! use automate_core::sim::SimulatedScrollView;
//!
//! # async fn run() -> Result<(), automate_core::driver::DriverError> {
//! let view = SimulatedScrollView::new(Rect::new(0.0, 0.0, 100.0, 200.0), 1000.0)
//!     .with_target("row-5", Rect::new(0.0, 400.0, 100.0, 40.0));
//!
//! // Drag half the viewport upwards.
//! view.swipe(&view.container(), Vector::new(0.5, 0.75), Vector::new(0.5, 0.25)).await?;
//! let frame = view.frame(&ElementQuery::id("row-5")).await?;
//! assert_eq!(frame.y, 300.0);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use crate::driver::{DriverError, GestureDriver};
use crate::element::{ElementQuery, ElementValue};
use crate::geometry::{Rect, Vector};

/// Identifier of the simulated scroll container.
pub const CONTAINER_ID: &str = "scroll-view";

/// Where an element lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Inside the scrolling content; the frame is in content coordinates,
    /// relative to the top-left of the content.
    Content(Rect),
    /// Fixed on screen; the frame is in screen coordinates and never moves.
    Fixed(Rect),
}

/// An element of the simulated screen.
#[derive(Debug, Clone)]
pub struct SimElement {
    pub identifier: Option<String>,
    pub label: Option<String>,
    pub element_type: Option<String>,
    pub placement: Placement,
    pub value: Option<ElementValue>,
    /// Whether typing and deleting change the value.
    pub editable: bool,
}

impl SimElement {
    pub fn new(identifier: impl Into<String>, placement: Placement) -> Self {
        Self {
            identifier: Some(identifier.into()),
            label: None,
            element_type: None,
            placement,
            value: None,
            editable: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    pub fn with_value(mut self, value: ElementValue) -> Self {
        self.value = Some(value);
        self
    }

    /// A text field holding `text` that accepts typing and deletion.
    pub fn text_field(identifier: impl Into<String>, placement: Placement, text: impl Into<String>) -> Self {
        let mut element = Self::new(identifier, placement)
            .with_type("TextField")
            .with_value(ElementValue::Text(text.into()));
        element.editable = true;
        element
    }

    fn matches(&self, query: &ElementQuery) -> bool {
        query.matches(
            self.identifier.as_deref(),
            self.label.as_deref(),
            self.element_type.as_deref(),
        )
    }
}

/// A recorded press-and-drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeRecord {
    pub element: ElementQuery,
    pub from: Vector,
    pub to: Vector,
    pub press_secs: f64,
}

/// A recorded tap.
#[derive(Debug, Clone, PartialEq)]
pub struct TapRecord {
    pub element: ElementQuery,
    pub offset: Vector,
    /// The tapped point in screen coordinates.
    pub point: (f64, f64),
}

#[derive(Debug, Default)]
struct SimState {
    scroll_offset: f64,
    keyboard: Option<Rect>,
    elements: Vec<SimElement>,
    focused: Option<usize>,
    swipes: Vec<SwipeRecord>,
    taps: Vec<TapRecord>,
}

/// A simulated vertical scroll view implementing [`GestureDriver`].
#[derive(Debug)]
pub struct SimulatedScrollView {
    viewport: Rect,
    content_height: f64,
    delete_key: bool,
    state: Mutex<SimState>,
}

impl SimulatedScrollView {
    /// Creates a scroll view occupying `viewport` with `content_height` points of content.
    pub fn new(viewport: Rect, content_height: f64) -> Self {
        Self {
            viewport,
            content_height,
            delete_key: true,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Adds an element inside the scrolling content.
    pub fn with_target(self, identifier: impl Into<String>, content_frame: Rect) -> Self {
        self.with_element(SimElement::new(identifier, Placement::Content(content_frame)))
    }

    /// Adds an element fixed on screen, outside the scrolling content.
    pub fn with_fixed(self, identifier: impl Into<String>, frame: Rect) -> Self {
        self.with_element(SimElement::new(identifier, Placement::Fixed(frame)))
    }

    pub fn with_element(mut self, element: SimElement) -> Self {
        self.state.get_mut().elements.push(element);
        self
    }

    /// Shows a keyboard occupying `frame`.
    pub fn with_keyboard(mut self, frame: Rect) -> Self {
        self.state.get_mut().keyboard = Some(frame);
        self
    }

    /// Starts scrolled down by `offset` points.
    pub fn with_scroll_offset(mut self, offset: f64) -> Self {
        let max = self.max_offset();
        self.state.get_mut().scroll_offset = offset.clamp(0.0, max);
        self
    }

    /// Makes [`tap_delete_key`](GestureDriver::tap_delete_key) unavailable.
    pub fn without_delete_key(mut self) -> Self {
        self.delete_key = false;
        self
    }

    /// Query addressing the scroll container.
    pub fn container(&self) -> ElementQuery {
        ElementQuery::id(CONTAINER_ID)
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub async fn set_keyboard(&self, frame: Option<Rect>) {
        self.state.lock().await.keyboard = frame;
    }

    pub async fn scroll_offset(&self) -> f64 {
        self.state.lock().await.scroll_offset
    }

    pub async fn swipes(&self) -> Vec<SwipeRecord> {
        self.state.lock().await.swipes.clone()
    }

    pub async fn taps(&self) -> Vec<TapRecord> {
        self.state.lock().await.taps.clone()
    }

    fn max_offset(&self) -> f64 {
        (self.content_height - self.viewport.height).max(0.0)
    }

    fn is_container(query: &ElementQuery) -> bool {
        query.matches(Some(CONTAINER_ID), None, Some("ScrollView"))
    }

    fn screen_frame(&self, state: &SimState, element: &SimElement) -> Rect {
        match element.placement {
            Placement::Content(frame) => Rect::new(
                self.viewport.x + frame.x,
                self.viewport.y + frame.y - state.scroll_offset,
                frame.width,
                frame.height,
            ),
            Placement::Fixed(frame) => frame,
        }
    }

    fn find(state: &SimState, query: &ElementQuery) -> Result<usize, DriverError> {
        state
            .elements
            .iter()
            .position(|e| e.matches(query))
            .ok_or_else(|| DriverError::ElementNotFound(query.clone()))
    }

    fn frame_locked(&self, state: &SimState, query: &ElementQuery) -> Result<Rect, DriverError> {
        if Self::is_container(query) {
            return Ok(self.viewport);
        }
        let index = Self::find(state, query)?;
        Ok(self.screen_frame(state, &state.elements[index]))
    }
}

fn edit_text(value: &mut Option<ElementValue>, text: &str) {
    let mut current = match value.take() {
        Some(ElementValue::Text(t)) => t,
        _ => String::new(),
    };
    for c in text.chars() {
        if c == '\u{8}' {
            current.pop();
        } else {
            current.push(c);
        }
    }
    *value = Some(ElementValue::Text(current));
}

#[async_trait]
impl GestureDriver for SimulatedScrollView {
    async fn frame(&self, element: &ElementQuery) -> Result<Rect, DriverError> {
        let state = self.state.lock().await;
        self.frame_locked(&state, element)
    }

    async fn exists(&self, element: &ElementQuery) -> Result<bool, DriverError> {
        if Self::is_container(element) {
            return Ok(true);
        }
        let state = self.state.lock().await;
        Ok(state.elements.iter().any(|e| e.matches(element)))
    }

    async fn is_hittable(&self, element: &ElementQuery) -> Result<bool, DriverError> {
        let state = self.state.lock().await;
        let frame = match self.frame_locked(&state, element) {
            Ok(frame) => frame,
            Err(DriverError::ElementNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let (cx, cy) = Vector::CENTER.point_in(&frame);
        let on_screen = match Self::find(&state, element).map(|i| state.elements[i].placement) {
            Ok(Placement::Fixed(_)) => true,
            _ => {
                cx >= self.viewport.min_x()
                    && cx <= self.viewport.max_x()
                    && cy >= self.viewport.min_y()
                    && cy <= self.viewport.max_y()
            }
        };
        let under_keyboard = state
            .keyboard
            .is_some_and(|k| cx >= k.min_x() && cx <= k.max_x() && cy >= k.min_y() && cy <= k.max_y());
        Ok(on_screen && !under_keyboard)
    }

    async fn is_keyboard_present(&self) -> Result<bool, DriverError> {
        Ok(self.state.lock().await.keyboard.is_some())
    }

    async fn keyboard_frame(&self) -> Result<Rect, DriverError> {
        self.state
            .lock()
            .await
            .keyboard
            .ok_or_else(|| DriverError::CommandFailed("no keyboard on screen".to_string()))
    }

    async fn press_and_drag(
        &self,
        element: &ElementQuery,
        from: Vector,
        to: Vector,
        press_secs: f64,
    ) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        let frame = self.frame_locked(&state, element)?;
        if Self::is_container(element) {
            let distance = (from.dy - to.dy) * frame.height;
            state.scroll_offset = (state.scroll_offset + distance).clamp(0.0, self.max_offset());
            trace!(distance, offset = state.scroll_offset, "simulated drag");
        }
        state.swipes.push(SwipeRecord {
            element: element.clone(),
            from,
            to,
            press_secs,
        });
        Ok(())
    }

    async fn tap(&self, element: &ElementQuery, offset: Vector) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        let frame = self.frame_locked(&state, element)?;
        if !Self::is_container(element) {
            let index = Self::find(&state, element)?;
            state.focused = Some(index);
        }
        state.taps.push(TapRecord {
            element: element.clone(),
            offset,
            point: offset.point_in(&frame),
        });
        Ok(())
    }

    async fn type_text(&self, element: &ElementQuery, text: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().await;
        let index = Self::find(&state, element)?;
        let target = &mut state.elements[index];
        if target.editable {
            edit_text(&mut target.value, text);
        }
        Ok(())
    }

    async fn value(&self, element: &ElementQuery) -> Result<Option<ElementValue>, DriverError> {
        let state = self.state.lock().await;
        let index = Self::find(&state, element)?;
        Ok(state.elements[index].value.clone())
    }

    async fn tap_delete_key(&self) -> Result<bool, DriverError> {
        if !self.delete_key {
            return Ok(false);
        }
        let mut state = self.state.lock().await;
        let Some(index) = state.focused else {
            return Err(DriverError::CommandFailed("no element has keyboard focus".to_string()));
        };
        let target = &mut state.elements[index];
        if target.editable {
            edit_text(&mut target.value, "\u{8}");
        }
        Ok(true)
    }
}
