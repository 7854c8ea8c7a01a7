//! Swipe a scroll container until a target element is fully visible.
//!
//! [`ScrollRevealer`] works in two passes. The downward pass swipes content up
//! while the target hangs below the visible region; the upward pass swipes
//! content down while the target sticks out above it. A pass stops as soon as
//! the target is inside on that edge, or when a swipe leaves the target's frame
//! unchanged, which means the container reached its scroll limit.
//!
//! The visible region is the container's frame minus whatever part of it the
//! on-screen keyboard covers.
//!
//! # Example
//!
//! ```no_run
//! use automate_core::element::ElementQuery;
//! use automate_core::reveal::ScrollRevealer;
//! use automate_core::sim::SimulatedScrollView;
//! use automate_core::geometry::Rect;
//!
//! # async fn run() -> Result<(), automate_core::reveal::RevealError> {
//! let view = SimulatedScrollView::new(Rect::new(0.0, 0.0, 100.0, 200.0), 1000.0)
//!     .with_target("row-20", Rect::new(0.0, 800.0, 100.0, 40.0));
//!
//! ScrollRevealer::new(&view)
//!     .reveal(&view.container(), &ElementQuery::id("row-20"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info_span, warn, Instrument};

use crate::config::{valid_non_negative, valid_swipe_length, AutomateConfig};
use crate::driver::{DriverError, GestureDriver};
use crate::element::ElementQuery;
use crate::geometry::{Rect, Vector};

/// Errors returned by [`ScrollRevealer::reveal`].
#[derive(Error, Debug)]
pub enum RevealError {
    /// The keyboard covers the whole container, nothing can be revealed.
    #[error("Container {container} is completely hidden behind the keyboard at {keyboard}")]
    ContainerObscured { container: Rect, keyboard: Rect },

    /// Both passes finished and the target is still not fully visible.
    #[error("Failed to reveal element: frame {target} is not inside visible region {region}")]
    RevealFailed { target: Rect, region: Rect },

    /// A [`RevealOptions`] field is out of range.
    #[error("Invalid reveal option {name}: {value}")]
    InvalidOption { name: &'static str, value: f64 },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Progress of a single reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    ScrollingDown,
    ScrollingUp,
    Done,
    Failed,
}

impl fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ScrollingDown => "scrolling_down",
            Self::ScrollingUp => "scrolling_up",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tunables for [`ScrollRevealer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the visible region each swipe travels.
    pub swipe_length: f64,
    /// Press duration before each drag, in seconds.
    pub press_duration_secs: f64,
    /// Exclude the keyboard from the visible region.
    pub avoid_keyboard: bool,
    /// Frames closer than this on every component count as unchanged.
    pub frame_tolerance: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::from(&AutomateConfig::default())
    }
}

impl From<&AutomateConfig> for RevealOptions {
    fn from(config: &AutomateConfig) -> Self {
        Self {
            swipe_length: config.swipe_length,
            press_duration_secs: config.press_duration_secs,
            avoid_keyboard: config.avoid_keyboard,
            frame_tolerance: config.frame_tolerance,
        }
    }
}

impl RevealOptions {
    /// Rejects options that would make a reveal misbehave.
    ///
    /// `swipe_length` must be in `(0, 1]`, the press duration and frame
    /// tolerance finite and non-negative.
    pub fn validate(&self) -> Result<(), RevealError> {
        let checks: [(&'static str, f64, fn(f64) -> bool); 3] = [
            ("swipe_length", self.swipe_length, valid_swipe_length),
            ("press_duration_secs", self.press_duration_secs, valid_non_negative),
            ("frame_tolerance", self.frame_tolerance, valid_non_negative),
        ];
        match checks.into_iter().find(|(_, value, valid)| !valid(*value)) {
            Some((name, value, _)) => Err(RevealError::InvalidOption { name, value }),
            None => Ok(()),
        }
    }
}

/// Computes the part of `container` not covered by `keyboard`.
///
/// The overlap is removed from the bottom edge. Fails with
/// [`RevealError::ContainerObscured`] when the keyboard's top edge is at or
/// above the container's top edge.
pub fn visible_region(container: Rect, keyboard: Option<Rect>) -> Result<Rect, RevealError> {
    let Some(keyboard) = keyboard else {
        return Ok(container);
    };
    let keyboard_top = keyboard.min_y();
    if keyboard_top <= container.min_y() {
        return Err(RevealError::ContainerObscured {
            container,
            keyboard,
        });
    }
    let overlap = (container.max_y() - keyboard_top).max(0.0);
    Ok(container.divided_from_max_y(overlap))
}

/// Start and end points of one reveal swipe, normalized to the container.
///
/// The swipe is centered on the visible region and covers `delta_y` of its
/// height. A positive `delta_y` drags upwards, scrolling content towards the
/// bottom of the list.
pub fn swipe_vectors(region: &Rect, container: &Rect, delta_y: f64) -> (Vector, Vector) {
    if container.height <= 0.0 {
        return (Vector::new(0.5, 0.0), Vector::new(0.5, 0.0));
    }
    let offset = region.height / container.height * (delta_y / 2.0);
    let center = region.height / 2.0 / container.height;
    (
        Vector::new(0.5, center + offset),
        Vector::new(0.5, center - offset),
    )
}

/// Visible region and swipe vectors for a container, without touching a driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealPlan {
    pub container: Rect,
    pub region: Rect,
    pub down: (Vector, Vector),
    pub up: (Vector, Vector),
}

impl RevealPlan {
    pub fn new(container: Rect, keyboard: Option<Rect>, swipe_length: f64) -> Result<Self, RevealError> {
        if !valid_swipe_length(swipe_length) {
            return Err(RevealError::InvalidOption {
                name: "swipe_length",
                value: swipe_length,
            });
        }
        let region = visible_region(container, keyboard)?;
        Ok(Self {
            container,
            region,
            down: swipe_vectors(&region, &container, swipe_length),
            up: swipe_vectors(&region, &container, -swipe_length),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Down,
    Up,
}

impl Pass {
    fn phase(self) -> RevealPhase {
        match self {
            Pass::Down => RevealPhase::ScrollingDown,
            Pass::Up => RevealPhase::ScrollingUp,
        }
    }

    fn needs_scroll(self, target: &Rect, region: &Rect) -> bool {
        match self {
            Pass::Down => target.max_y() > region.max_y(),
            Pass::Up => target.min_y() < region.min_y(),
        }
    }
}

/// State for one reveal call.
struct ScrollSession {
    container: Rect,
    region: Rect,
    phase: RevealPhase,
}

/// Brings elements into view by swiping their scroll container.
///
/// The revealer issues driver calls strictly one after another and keeps no
/// state between [`reveal`](Self::reveal) calls.
pub struct ScrollRevealer<'d> {
    driver: &'d dyn GestureDriver,
    options: RevealOptions,
}

impl<'d> ScrollRevealer<'d> {
    pub fn new(driver: &'d dyn GestureDriver) -> Self {
        Self::with_options(driver, RevealOptions::default())
    }

    pub fn with_options(driver: &'d dyn GestureDriver, options: RevealOptions) -> Self {
        Self { driver, options }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Swipes `container` until `target` is fully inside its visible region.
    ///
    /// `container` is assumed to exist and be at least partially on screen.
    /// Out-of-range options fail with [`RevealError::InvalidOption`] before
    /// any driver call.
    pub async fn reveal(&self, container: &ElementQuery, target: &ElementQuery) -> Result<(), RevealError> {
        self.reveal_with(container, target, self.options.avoid_keyboard)
            .await
    }

    /// Like [`reveal`](Self::reveal), overriding keyboard avoidance for this call.
    pub async fn reveal_with(
        &self,
        container: &ElementQuery,
        target: &ElementQuery,
        avoid_keyboard: bool,
    ) -> Result<(), RevealError> {
        let span = info_span!("reveal", %container, %target, avoid_keyboard);
        self.run(container, target, avoid_keyboard)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        container: &ElementQuery,
        target: &ElementQuery,
        avoid_keyboard: bool,
    ) -> Result<(), RevealError> {
        self.options.validate()?;
        let mut session = self.open_session(container, avoid_keyboard).await?;

        let mut swipes = self.scroll(&mut session, container, target, Pass::Down).await?;
        swipes += self.scroll(&mut session, container, target, Pass::Up).await?;

        let frame = self.driver.frame(target).await?;
        if session.region.contains_rect(&frame) {
            session.phase = RevealPhase::Done;
            debug!(phase = %session.phase, swipes, %frame, "element revealed");
            Ok(())
        } else {
            session.phase = RevealPhase::Failed;
            warn!(phase = %session.phase, swipes, %frame, region = %session.region, "failed to reveal element");
            Err(RevealError::RevealFailed {
                target: frame,
                region: session.region,
            })
        }
    }

    async fn open_session(&self, container: &ElementQuery, avoid_keyboard: bool) -> Result<ScrollSession, RevealError> {
        let frame = self.driver.frame(container).await?;
        let keyboard = if avoid_keyboard && self.driver.is_keyboard_present().await? {
            Some(self.driver.keyboard_frame().await?)
        } else {
            None
        };
        let region = visible_region(frame, keyboard)?;
        debug!(container_frame = %frame, %region, keyboard = keyboard.is_some(), "visible region computed");
        Ok(ScrollSession {
            container: frame,
            region,
            phase: RevealPhase::Idle,
        })
    }

    /// Runs one pass and returns how many swipes it issued.
    async fn scroll(
        &self,
        session: &mut ScrollSession,
        container: &ElementQuery,
        target: &ElementQuery,
        pass: Pass,
    ) -> Result<u32, RevealError> {
        session.phase = pass.phase();
        let delta_y = match pass {
            Pass::Down => self.options.swipe_length,
            Pass::Up => -self.options.swipe_length,
        };
        let (from, to) = swipe_vectors(&session.region, &session.container, delta_y);

        let mut previous = self.driver.frame(target).await?;
        let mut swipes = 0;
        while pass.needs_scroll(&previous, &session.region) {
            self.driver
                .press_and_drag(container, from, to, self.options.press_duration_secs)
                .await?;
            swipes += 1;

            let current = self.driver.frame(target).await?;
            debug!(phase = %session.phase, %from, %to, frame = %current, "swiped");
            if current.approx_eq(&previous, self.options.frame_tolerance) {
                debug!(phase = %session.phase, swipes, "target stopped moving");
                break;
            }
            previous = current;
        }
        Ok(swipes)
    }
}
