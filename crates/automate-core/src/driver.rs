//! Gesture driver trait for backend-agnostic UI automation.
//!
//! This module defines the [`GestureDriver`] trait, the seam between the
//! convenience layer in this crate and whatever automation backend actually
//! talks to the device. The revealer and the element actions only ever see
//! this trait, so they work the same against a live agent, a physical device,
//! or the in-process [`SimulatedScrollView`](crate::sim::SimulatedScrollView).
//!
//! Coordinates passed to gesture methods are [`Vector`]s normalized to the
//! target element's own frame; the backend is responsible for mapping them to
//! screen points.

use async_trait::async_trait;
use thiserror::Error;

use crate::element::{ElementQuery, ElementValue};
use crate::geometry::{Rect, Vector};

/// Press duration used by [`GestureDriver::swipe`].
pub const DEFAULT_PRESS_SECS: f64 = 0.1;

/// Errors that can occur during driver operations.
///
/// This enum unifies errors from all backends behind a single type,
/// allowing consumers to handle errors uniformly regardless of the
/// underlying automation backend.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A command or operation failed with the given message.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No element in the hierarchy matched the query.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementQuery),

    /// The backend is not available or not connected.
    #[error("Not connected to automation backend")]
    NotConnected,

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for backend-agnostic gesture and geometry access.
///
/// Implementors resolve [`ElementQuery`]s on every call, so consecutive calls
/// observe the UI as it is at that moment. Calls are issued strictly one at a
/// time by the consumers in this crate; each is awaited before the next.
///
/// # Required Methods
///
/// [`frame`](GestureDriver::frame), [`exists`](GestureDriver::exists),
/// [`is_hittable`](GestureDriver::is_hittable),
/// [`is_keyboard_present`](GestureDriver::is_keyboard_present),
/// [`keyboard_frame`](GestureDriver::keyboard_frame),
/// [`press_and_drag`](GestureDriver::press_and_drag),
/// [`tap`](GestureDriver::tap), [`type_text`](GestureDriver::type_text)
/// and [`value`](GestureDriver::value).
#[async_trait]
pub trait GestureDriver: Send + Sync {
    /// Current frame of the element in screen points.
    async fn frame(&self, element: &ElementQuery) -> Result<Rect, DriverError>;

    /// Whether the element is present in the hierarchy.
    async fn exists(&self, element: &ElementQuery) -> Result<bool, DriverError>;

    /// Whether the element can receive a tap at its hit point.
    async fn is_hittable(&self, element: &ElementQuery) -> Result<bool, DriverError>;

    /// Whether a software keyboard is currently on screen.
    async fn is_keyboard_present(&self) -> Result<bool, DriverError>;

    /// Frame of the on-screen keyboard.
    ///
    /// Only meaningful when [`is_keyboard_present`](Self::is_keyboard_present)
    /// returns true.
    async fn keyboard_frame(&self) -> Result<Rect, DriverError>;

    /// Press at `from` for `press_secs`, then drag to `to`.
    ///
    /// Both points are normalized to `element`'s frame.
    async fn press_and_drag(
        &self,
        element: &ElementQuery,
        from: Vector,
        to: Vector,
        press_secs: f64,
    ) -> Result<(), DriverError>;

    /// Swipe between two points normalized to `element`'s frame.
    ///
    /// The default implementation presses for [`DEFAULT_PRESS_SECS`].
    async fn swipe(&self, element: &ElementQuery, from: Vector, to: Vector) -> Result<(), DriverError> {
        self.press_and_drag(element, from, to, DEFAULT_PRESS_SECS).await
    }

    /// Tap at a point normalized to `element`'s frame.
    async fn tap(&self, element: &ElementQuery, offset: Vector) -> Result<(), DriverError>;

    /// Type text into the element, which must have keyboard focus.
    async fn type_text(&self, element: &ElementQuery, text: &str) -> Result<(), DriverError>;

    /// The element's accessibility value, if it has one.
    async fn value(&self, element: &ElementQuery) -> Result<Option<ElementValue>, DriverError>;

    /// Tap the keyboard's delete key.
    ///
    /// Returns `Ok(false)` if the backend cannot address the delete key, in
    /// which case callers fall back to typing a backspace character. The
    /// default implementation always returns `Ok(false)`.
    async fn tap_delete_key(&self) -> Result<bool, DriverError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::CommandFailed("drag failed".to_string());
        assert!(err.to_string().contains("drag failed"));

        let err = DriverError::ElementNotFound(ElementQuery::id("contacts-table"));
        assert!(err.to_string().contains("#contacts-table"));

        let err = DriverError::NotConnected;
        assert!(err.to_string().contains("Not connected"));

        let err = DriverError::from(serde_json::from_str::<Rect>("{").unwrap_err());
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
