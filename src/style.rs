use crate::model::ShapeKind;

pub const STROKE_WIDTH: f32 = 2.0;

/// Active tool. Everything except `Text` is drawn by dragging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Line,
    Rectangle,
    Circle,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Line, Tool::Rectangle, Tool::Circle, Tool::Text];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Text => "Text",
        }
    }

    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Text => None,
        }
    }
}

/// Settings applied to every annotation at render time.
///
/// Annotations don't carry their own style, so changing a colour here
/// recolours the whole log on the next redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub annotation_color: [u8; 3],
    pub text_color: [u8; 3],
    pub text_size: f32,
    pub tool: Tool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            annotation_color: [0, 255, 0],
            text_color: [0, 0, 0],
            text_size: 1.0,
            tool: Tool::Line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_text_tool_has_no_shape() {
        let kinds: Vec<_> = Tool::ALL.iter().map(|t| t.shape_kind()).collect();
        assert_eq!(
            kinds,
            vec![
                Some(ShapeKind::Line),
                Some(ShapeKind::Rectangle),
                Some(ShapeKind::Circle),
                None
            ]
        );
    }
}
