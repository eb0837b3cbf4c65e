//! Overflow measurement against painted extents.
//!
//! A measured region is represented by a [`NodeRef`]. The render pass paints
//! the region and attaches the resulting [`Metrics`]; the measure pass reads
//! them back through [`has_overflow`]. Nothing is cached between renders: a
//! node only ever reports what was attached by the most recent paint.

use std::cell::Cell;

/// The axis along which overflow is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal: painted width against available width.
    X,
    /// Vertical: painted height against available height.
    Y,
}

/// Painted and available extents of a region, in terminal cells.
///
/// `scroll_*` is the extent the content needs; `client_*` is the extent the
/// region actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Metrics {
    /// Width of the widest painted row.
    pub scroll_width: u16,
    /// Number of rows the content occupies.
    pub scroll_height: u16,
    /// Width available to the region.
    pub client_width: u16,
    /// Height available to the region.
    pub client_height: u16,
}

impl Metrics {
    /// Creates metrics from painted and available extents.
    #[must_use]
    pub const fn new(
        scroll_width: u16,
        scroll_height: u16,
        client_width: u16,
        client_height: u16,
    ) -> Self {
        Self {
            scroll_width,
            scroll_height,
            client_width,
            client_height,
        }
    }

    /// Returns `true` if the painted extent exceeds the available extent
    /// along `axis`.
    ///
    /// # Examples
    ///
    /// ```
    /// use headway_fit::{Axis, Metrics};
    ///
    /// let metrics = Metrics::new(12, 3, 20, 2);
    /// assert!(!metrics.overflows(Axis::X));
    /// assert!(metrics.overflows(Axis::Y));
    /// ```
    #[must_use]
    pub const fn overflows(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.scroll_width > self.client_width,
            Axis::Y => self.scroll_height > self.client_height,
        }
    }
}

/// Something that can report the extents it was last painted with.
pub trait Measure {
    /// Returns the painted metrics, or `None` if nothing is attached.
    fn metrics(&self) -> Option<Metrics>;
}

impl Measure for Metrics {
    fn metrics(&self) -> Option<Metrics> {
        Some(*self)
    }
}

impl Measure for Option<Metrics> {
    fn metrics(&self) -> Option<Metrics> {
        *self
    }
}

/// A handle to a measured region.
///
/// Render code takes `&NodeRef` and attaches metrics while painting, so the
/// render pass itself stays free of fitting state changes.
#[derive(Debug, Default)]
pub struct NodeRef {
    metrics: Cell<Option<Metrics>>,
}

impl NodeRef {
    /// Creates a detached node.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            metrics: Cell::new(None),
        }
    }

    /// Records the metrics of the latest paint.
    pub fn attach(&self, metrics: Metrics) {
        self.metrics.set(Some(metrics));
    }

    /// Forgets any attached metrics.
    pub fn detach(&self) {
        self.metrics.set(None);
    }

    /// Returns `true` if the node has been painted.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.metrics.get().is_some()
    }
}

impl Measure for NodeRef {
    fn metrics(&self) -> Option<Metrics> {
        self.metrics.get()
    }
}

/// Returns `true` if the node's painted content overflows along `axis`.
///
/// A node that has not been painted yet never overflows, so an unmounted
/// region cannot trigger a step change or a trim.
///
/// # Examples
///
/// ```
/// use headway_fit::{Axis, Metrics, NodeRef, has_overflow};
///
/// let node = NodeRef::new();
/// assert!(!has_overflow(&node, Axis::Y));
///
/// node.attach(Metrics::new(10, 5, 10, 4));
/// assert!(has_overflow(&node, Axis::Y));
/// ```
#[must_use]
pub fn has_overflow<M: Measure + ?Sized>(node: &M, axis: Axis) -> bool {
    node.metrics().is_some_and(|m| m.overflows(axis))
}
