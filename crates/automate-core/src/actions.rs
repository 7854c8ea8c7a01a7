//! Convenience actions available on every [`GestureDriver`].
//!
//! [`ElementActions`] is blanket-implemented, so importing the trait is all it
//! takes:
//!
//! ```no_run
//! use automate_core::actions::ElementActions;
//! use automate_core::driver::GestureDriver;
//! use automate_core::element::ElementQuery;
//!
//! # async fn run(driver: &impl GestureDriver) -> Result<(), automate_core::actions::ActionError> {
//! let email = ElementQuery::typed("email", false, "TextField");
//! if driver.is_visible(&email).await? {
//!     driver.clear_and_type(&email, "jane@example.com").await?;
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::driver::{DriverError, GestureDriver};
use crate::element::{ElementQuery, ElementValue};
use crate::geometry::Vector;
use crate::reveal::{RevealError, ScrollRevealer};

/// Character typed to delete when the keyboard's delete key is unavailable.
const BACKSPACE: &str = "\u{8}";

/// Errors returned by [`ElementActions`].
#[derive(Error, Debug)]
pub enum ActionError {
    /// The element's value is missing or is not text.
    #[error("Value of {element} is not a string: {value:?}")]
    NotText {
        element: ElementQuery,
        value: Option<ElementValue>,
    },

    /// A tap offset component is outside `[0, 1]`.
    #[error("Tap offset {0} is outside the element")]
    OffsetOutOfRange(Vector),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[async_trait]
pub trait ElementActions: GestureDriver {
    /// Whether the element exists and can be tapped.
    async fn is_visible(&self, element: &ElementQuery) -> Result<bool, DriverError> {
        Ok(self.exists(element).await? && self.is_hittable(element).await?)
    }

    /// The element's value as text.
    async fn text(&self, element: &ElementQuery) -> Result<String, ActionError> {
        match self.value(element).await? {
            Some(ElementValue::Text(text)) => Ok(text),
            value => Err(ActionError::NotText {
                element: element.clone(),
                value,
            }),
        }
    }

    /// Tap at `offset` within the element, where `(0, 0)` is its top-left corner.
    async fn tap_with_offset(&self, element: &ElementQuery, offset: Vector) -> Result<(), ActionError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(offset.dx) || !in_range(offset.dy) {
            return Err(ActionError::OffsetOutOfRange(offset));
        }
        self.tap(element, offset).await?;
        Ok(())
    }

    /// Deletes characters until the text stops getting shorter.
    ///
    /// Uses the keyboard's delete key when the driver has one, otherwise types
    /// a backspace. Stops when the field is empty or refuses deletion.
    async fn clear_text_field(&self, element: &ElementQuery) -> Result<(), ActionError> {
        let mut previous_len = 0;
        let mut deletions = 0u32;
        loop {
            let len = self.text(element).await?.chars().count();
            if len == previous_len {
                break;
            }
            previous_len = len;
            if !self.tap_delete_key().await? {
                self.type_text(element, BACKSPACE).await?;
            }
            deletions += 1;
        }
        debug!(%element, deletions, remaining = previous_len, "text field cleared");
        Ok(())
    }

    /// Taps the element, clears it and types `text`.
    async fn clear_and_type(&self, element: &ElementQuery, text: &str) -> Result<(), ActionError> {
        self.tap(element, Vector::CENTER).await?;
        self.clear_text_field(element).await?;
        self.type_text(element, text).await?;
        Ok(())
    }

    /// Swipes `container` until `target` is fully visible, avoiding the keyboard.
    ///
    /// See [`ScrollRevealer`] for the algorithm and for tuning options.
    async fn swipe_to(&self, container: &ElementQuery, target: &ElementQuery) -> Result<(), RevealError>
    where
        Self: Sized,
    {
        ScrollRevealer::new(self).reveal(container, target).await
    }
}

impl<D: GestureDriver> ElementActions for D {}
