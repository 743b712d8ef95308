//! Overlay session API and monitoring runtime
//!
//! The session is the single-threaded owner of all overlay state; the
//! runtime wraps it in an event loop fed by the sensor channels and a
//! refresh timer.

pub mod runtime;
pub mod session;
pub mod types;

pub use runtime::MonitorHandle;
pub use session::OverlaySession;
pub use types::{
    CallbackHandle, MarkerCallback, MarkerEvent, MarkerUpdate, OverlayError, OverlayResult,
    PointId, SessionState,
};
