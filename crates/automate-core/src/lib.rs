//! # automate-core
//!
//! Convenience extensions over a mobile UI automation backend.
//!
//! The backend itself (element lookup, gesture injection, accessibility
//! values) is abstracted behind the [`driver::GestureDriver`] trait. On top of
//! it this crate adds scroll-to-reveal and a handful of element helpers.
//!
//! ## Modules
//!
//! - [`geometry`] - `Rect` and `Vector` value types
//! - [`element`] - Element queries and accessibility values
//! - [`driver`] - The backend-agnostic driver trait and its error type
//! - [`reveal`] - Swiping a scroll container until an element is fully visible
//! - [`actions`] - Visibility, text, tapping and text-field clearing helpers
//! - [`config`] - Persistent gesture defaults in `~/.automate/config.json`
//! - [`sim`] - An in-process simulated scroll view driver
//!
//! ## Example
//!
//! ```no_run
//! use automate_core::actions::ElementActions;
//! use automate_core::element::ElementQuery;
//! use automate_core::geometry::Rect;
//! use automate_core::sim::SimulatedScrollView;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let view = SimulatedScrollView::new(Rect::new(0.0, 0.0, 375.0, 600.0), 3000.0)
//!     .with_target("row-40", Rect::new(0.0, 2400.0, 375.0, 60.0))
//!     .with_keyboard(Rect::new(0.0, 400.0, 375.0, 300.0));
//!
//! let row = ElementQuery::id("row-40");
//! view.swipe_to(&view.container(), &row).await?;
//! assert!(view.is_visible(&row).await?);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod driver;
pub mod element;
pub mod geometry;
pub mod reveal;
pub mod sim;
