//! Layout measurements shared by the app and its tests.

use std::time::Duration;

/// Height of the header bar in rows, borders included.
pub const HEADER_HEIGHT: u16 = 3;

/// Minimum terminal height for useful rendering.
///
/// Below this height the sign shows a "terminal too small" message instead
/// of content.
pub const MIN_HEIGHT: u16 = 8;

/// Minimum terminal height for rendering with the header.
///
/// Between `MIN_HEIGHT` and this height the header is hidden so the body
/// keeps its rows.
pub const MIN_HEIGHT_WITH_HEADER: u16 = MIN_HEIGHT + HEADER_HEIGHT;

/// Minimum terminal width for useful rendering.
pub const MIN_WIDTH: u16 = 24;

/// Most render passes one settle may take before the frame is drawn as is.
///
/// Every pass that does not settle moves some region one step or one trim
/// unit forward, so this is only reached by very dense payloads.
pub const MAX_SETTLE_PASSES: usize = 64;

/// Longest the app waits for input before redrawing.
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_millis(100);
