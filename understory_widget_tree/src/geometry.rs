// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and the pure geometry used by the tree.

/// An integer rectangle: origin plus extent.
///
/// `x`/`y` are relative to the enclosing parent's origin (or to the screen
/// origin for top-level widgets). `w`/`h` are expected to be non-negative; the
/// tree clamps negative extents to zero on entry (see [`Rect::normalized`]).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Horizontal position of the left edge.
    pub x: i32,
    /// Vertical position of the top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a rectangle from `(x, y, width, height)`.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the same rectangle with negative extents clamped to zero.
    pub const fn normalized(self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            w: if self.w < 0 { 0 } else { self.w },
            h: if self.h < 0 { 0 } else { self.h },
        }
    }

    /// X coordinate of the right edge (exclusive).
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Y coordinate of the bottom edge (exclusive).
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Returns `true` if the rectangle covers no area.
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Move the rectangle by `(dx, dy)`, keeping its extent.
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            w: self.w,
            h: self.h,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// Both rectangles must be expressed in the same coordinate space.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Returns `true` if `other` lies entirely within `self`. Edges are inclusive.
    pub fn contains_rect(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns `true` if the point lies within the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    pub fn contains_point(self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.right() && py < self.bottom()
    }

    /// Grow the extent so that the far edges of `local` are covered.
    ///
    /// `local` is expressed in this rectangle's local space, where `(0, 0)` is
    /// `(self.x, self.y)`. Width and height are extended independently, each
    /// only when `local` overflows along that axis. The origin never moves and
    /// near edges (negative offsets) are ignored.
    #[must_use]
    pub fn grow_extent_to(self, local: Self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            w: self.w.max(local.right()),
            h: self.h.max(local.bottom()),
        }
    }

    /// Convert to a [`kurbo::Rect`] in the same coordinate space.
    #[cfg(feature = "kurbo")]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }
}

#[cfg(feature = "kurbo")]
impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        r.to_kurbo()
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Rect {
    /// Rounds outward to the enclosing integer rectangle.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Widget geometry is integral; out-of-range values saturate."
    )]
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs().expand();
        Self::new(
            r.x0 as i32,
            r.y0 as i32,
            r.width() as i32,
            r.height() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 20, 5);
        let u = a.union(b);
        assert_eq!(u, Rect::new(0, -5, 25, 15));
        assert!(u.contains_rect(a), "union must contain the first operand");
        assert!(u.contains_rect(b), "union must contain the second operand");
    }

    #[test]
    fn union_of_distant_rects_saturates() {
        let left = Rect::new(-2_000_000_000, -2_000_000_000, 10, 10);
        let right = Rect::new(2_000_000_000, 2_000_000_000, 10, 10);
        let u = left.union(right);
        assert_eq!(u.x, -2_000_000_000);
        assert_eq!(u.y, -2_000_000_000);
        assert_eq!(u.w, i32::MAX, "width clamps instead of overflowing");
        assert_eq!(u.h, i32::MAX, "height clamps instead of overflowing");
    }

    #[test]
    fn grow_extent_is_per_axis() {
        // Root's child from the composed geometry figure: only width overflows.
        let child = Rect::new(0, 20, 70, 90);
        let grandchild = Rect::new(40, 20, 80, 40);
        let composed = child.grow_extent_to(grandchild);
        assert_eq!(composed, Rect::new(0, 20, 120, 90));
    }

    #[test]
    fn grow_extent_ignores_negative_offsets() {
        let r = Rect::new(3, 4, 10, 10);
        let grown = r.grow_extent_to(Rect::new(-50, -50, 20, 20));
        assert_eq!(grown, r, "origin and extent are untouched by near-edge overflow");
    }

    #[test]
    fn normalized_clamps_extent() {
        assert_eq!(Rect::new(1, 2, -3, 4).normalized(), Rect::new(1, 2, 0, 4));
        assert!(Rect::new(0, 0, 0, 4).is_empty());
    }

    #[test]
    fn point_containment_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains_point(10, 10));
        assert!(r.contains_point(14, 14));
        assert!(!r.contains_point(15, 10));
        assert!(!r.contains_point(9, 12));
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_conversion() {
        let r = Rect::new(1, 2, 3, 4);
        let k: kurbo::Rect = r.into();
        assert_eq!(k, kurbo::Rect::new(1.0, 2.0, 4.0, 6.0));
        assert_eq!(Rect::from(kurbo::Rect::new(0.5, 0.5, 2.5, 3.0)), Rect::new(0, 0, 3, 3));
    }
}
