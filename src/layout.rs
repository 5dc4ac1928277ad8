use egui::Pos2;
use serde::{Deserialize, Serialize};

/// Drawing tool selector.
///
/// Tools are plain tags; everything a shape needs to render lives in its
/// [`Layout`]. Dispatch is a `match` per tool, which keeps the set closed
/// and avoids boxing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Rect,
    Circle,
    Line,
    Brush,
}

impl Tool {
    /// All tools, in toolbar order.
    pub const ALL: [Tool; 4] = [Tool::Rect, Tool::Circle, Tool::Line, Tool::Brush];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Rect => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Line => "Line",
            Tool::Brush => "Brush",
        }
    }
}

/// One drawn primitive: a tool tag, the anchor point where the gesture
/// pressed, and the drag point where the shape currently ends.
///
/// A layout without a drag point is "open": its gesture has not moved yet.
/// Open layouts exist only as the tip of an in-progress gesture; committed
/// history holds closed layouts only. An open layout and a zero-length one
/// (`drag == Some(anchor)`) are distinct values and compare unequal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    tool: Tool,
    anchor: Pos2,
    drag: Option<Pos2>,
}

impl Layout {
    /// Starts an open layout at the gesture's press point.
    pub fn open(tool: Tool, anchor: Pos2) -> Self {
        Self {
            tool,
            anchor,
            drag: None,
        }
    }

    /// A finished layout with both points known.
    pub fn closed(tool: Tool, anchor: Pos2, drag: Pos2) -> Self {
        Self {
            tool,
            anchor,
            drag: Some(drag),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    pub fn drag(&self) -> Option<Pos2> {
        self.drag
    }

    pub fn is_open(&self) -> bool {
        self.drag.is_none()
    }

    /// Copy of this layout closed at `drag`, keeping tool and anchor.
    pub fn close_at(&self, drag: Pos2) -> Self {
        Self {
            drag: Some(drag),
            ..*self
        }
    }

    /// Copy closed at its own anchor: the zero-length shape a click without
    /// movement commits.
    pub fn collapse(&self) -> Self {
        Self {
            drag: Some(self.anchor),
            ..*self
        }
    }

    /// Points exactly as recorded. Order matters for [`Tool::Line`], whose
    /// rendering preserves start-to-end direction.
    pub fn raw(&self) -> (Pos2, Option<Pos2>) {
        (self.anchor, self.drag)
    }

    /// Axis-aligned corner pair with `min.x <= max.x` and `min.y <= max.y`,
    /// swapping each axis independently. An open layout substitutes its
    /// anchor for the missing drag point and yields a degenerate pair.
    pub fn normalized(&self) -> (Pos2, Pos2) {
        let end = self.drag.unwrap_or(self.anchor);
        let min = Pos2::new(self.anchor.x.min(end.x), self.anchor.y.min(end.y));
        let max = Pos2::new(self.anchor.x.max(end.x), self.anchor.y.max(end.y));
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_normalized_swaps_each_axis_independently() {
        let layout = Layout::closed(Tool::Rect, pos2(50.0, 10.0), pos2(10.0, 40.0));
        let (min, max) = layout.normalized();
        assert_eq!(min, pos2(10.0, 10.0));
        assert_eq!(max, pos2(50.0, 40.0));
    }

    #[test]
    fn test_normalized_is_idempotent() {
        let layout = Layout::closed(Tool::Rect, pos2(80.0, 5.0), pos2(20.0, 60.0));
        let (min, max) = layout.normalized();
        let renormalized = Layout::closed(Tool::Rect, min, max).normalized();
        assert_eq!(renormalized, (min, max));
    }

    #[test]
    fn test_open_layout_normalizes_to_degenerate_pair() {
        let layout = Layout::open(Tool::Circle, pos2(12.0, 34.0));
        assert_eq!(layout.normalized(), (pos2(12.0, 34.0), pos2(12.0, 34.0)));
    }

    #[test]
    fn test_raw_preserves_recorded_direction() {
        let layout = Layout::closed(Tool::Line, pos2(90.0, 90.0), pos2(10.0, 20.0));
        let (start, end) = layout.raw();
        assert_eq!(start, pos2(90.0, 90.0));
        assert_eq!(end, Some(pos2(10.0, 20.0)));
    }

    #[test]
    fn test_close_at_keeps_tool_and_anchor() {
        let open = Layout::open(Tool::Brush, pos2(3.0, 4.0));
        let closed = open.close_at(pos2(7.0, 8.0));
        assert_eq!(closed.tool(), Tool::Brush);
        assert_eq!(closed.anchor(), pos2(3.0, 4.0));
        assert_eq!(closed.drag(), Some(pos2(7.0, 8.0)));
        assert!(!closed.is_open());
    }

    #[test]
    fn test_open_differs_from_zero_length() {
        let open = Layout::open(Tool::Line, pos2(5.0, 5.0));
        let collapsed = open.collapse();
        assert_ne!(open, collapsed);
        assert_eq!(collapsed.drag(), Some(pos2(5.0, 5.0)));
    }

    #[test]
    fn test_equality_is_structural_over_all_fields() {
        let a = Layout::closed(Tool::Rect, pos2(1.0, 2.0), pos2(3.0, 4.0));
        let b = Layout::closed(Tool::Rect, pos2(1.0, 2.0), pos2(3.0, 4.0));
        let c = Layout::closed(Tool::Circle, pos2(1.0, 2.0), pos2(3.0, 4.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
