//! Shared test helpers for automate-core integration tests.
//!
//! [`ScriptedDriver`] replays a fixed sequence of target frames, one per swipe,
//! and records every gesture it receives. Unlike the simulated scroll view it
//! lets a test dictate exactly what the revealer observes.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use automate_core::driver::{DriverError, GestureDriver};
use automate_core::element::{ElementQuery, ElementValue};
use automate_core::geometry::{Rect, Vector};

pub const CONTAINER: &str = "table";
pub const TARGET: &str = "cell";

pub fn container() -> ElementQuery {
    ElementQuery::id(CONTAINER)
}

pub fn target() -> ElementQuery {
    ElementQuery::id(TARGET)
}

/// Shorthand for a full-width frame spanning `min_y..max_y`.
pub fn rows(min_y: f64, max_y: f64) -> Rect {
    Rect::from_edges(0.0, min_y, 100.0, max_y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swipe {
    pub from: Vector,
    pub to: Vector,
    pub press_secs: f64,
}

/// A driver whose target frame is `frames[n]` after `n` swipes.
///
/// Once the script runs out, the last frame repeats.
pub struct ScriptedDriver {
    container_frame: Rect,
    keyboard: Option<Rect>,
    frames: Vec<Rect>,
    swipes: Mutex<Vec<Swipe>>,
    frame_queries: Mutex<usize>,
}

impl ScriptedDriver {
    pub fn new(container_frame: Rect, frames: Vec<Rect>) -> Self {
        assert!(!frames.is_empty(), "script needs at least one frame");
        Self {
            container_frame,
            keyboard: None,
            frames,
            swipes: Mutex::new(Vec::new()),
            frame_queries: Mutex::new(0),
        }
    }

    pub fn with_keyboard(mut self, frame: Rect) -> Self {
        self.keyboard = Some(frame);
        self
    }

    pub fn swipes(&self) -> Vec<Swipe> {
        self.swipes.lock().unwrap().clone()
    }

    pub fn frame_queries(&self) -> usize {
        *self.frame_queries.lock().unwrap()
    }

    fn current_target(&self) -> Rect {
        let n = self.swipes.lock().unwrap().len();
        self.frames[n.min(self.frames.len() - 1)]
    }
}

#[async_trait]
impl GestureDriver for ScriptedDriver {
    async fn frame(&self, element: &ElementQuery) -> Result<Rect, DriverError> {
        *self.frame_queries.lock().unwrap() += 1;
        match element.selector() {
            CONTAINER => Ok(self.container_frame),
            TARGET => Ok(self.current_target()),
            _ => Err(DriverError::ElementNotFound(element.clone())),
        }
    }

    async fn exists(&self, element: &ElementQuery) -> Result<bool, DriverError> {
        Ok(matches!(element.selector(), CONTAINER | TARGET))
    }

    async fn is_hittable(&self, element: &ElementQuery) -> Result<bool, DriverError> {
        self.exists(element).await
    }

    async fn is_keyboard_present(&self) -> Result<bool, DriverError> {
        Ok(self.keyboard.is_some())
    }

    async fn keyboard_frame(&self) -> Result<Rect, DriverError> {
        self.keyboard.ok_or(DriverError::CommandFailed("no keyboard".to_string()))
    }

    async fn press_and_drag(
        &self,
        _element: &ElementQuery,
        from: Vector,
        to: Vector,
        press_secs: f64,
    ) -> Result<(), DriverError> {
        self.swipes.lock().unwrap().push(Swipe {
            from,
            to,
            press_secs,
        });
        Ok(())
    }

    async fn tap(&self, _element: &ElementQuery, _offset: Vector) -> Result<(), DriverError> {
        Ok(())
    }

    async fn type_text(&self, _element: &ElementQuery, _text: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn value(&self, _element: &ElementQuery) -> Result<Option<ElementValue>, DriverError> {
        Ok(None)
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
