//! Pointer state machine for drawing on the canvas.
//!
//! `Idle` → pointer down with a shape tool → `Dragging` → pointer up → `Idle`,
//! committing one shape. Pointer down with the text tool opens `Prompting`
//! instead, which ends with either a text annotation or nothing.

use crate::model::{Point, ShapeAnnotation, ShapeKind, TextAnnotation};
use crate::style::Tool;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        kind: ShapeKind,
        start: Point,
        current: Point,
    },
    Prompting {
        anchor: Point,
        buffer: String,
    },
}

impl Interaction {
    pub fn pointer_down(&mut self, tool: Tool, at: Point) {
        if !matches!(self, Interaction::Idle) {
            return;
        }
        *self = match tool.shape_kind() {
            Some(kind) => Interaction::Dragging {
                kind,
                start: at,
                current: at,
            },
            None => Interaction::Prompting {
                anchor: at,
                buffer: String::new(),
            },
        };
    }

    /// Returns the ephemeral preview shape while dragging.
    pub fn pointer_move(&mut self, at: Point) -> Option<ShapeAnnotation> {
        if let Interaction::Dragging { current, .. } = self {
            *current = at;
        }
        self.preview()
    }

    /// Ends a drag, returning the shape to commit.
    pub fn pointer_up(&mut self, at: Option<Point>) -> Option<ShapeAnnotation> {
        let Interaction::Dragging {
            kind,
            start,
            current,
        } = *self
        else {
            return None;
        };
        *self = Interaction::Idle;
        Some(ShapeAnnotation::new(kind, start, at.unwrap_or(current)))
    }

    pub fn preview(&self) -> Option<ShapeAnnotation> {
        match *self {
            Interaction::Dragging {
                kind,
                start,
                current,
            } => Some(ShapeAnnotation::new(kind, start, current)),
            _ => None,
        }
    }

    pub fn text_buffer(&mut self) -> Option<&mut String> {
        match self {
            Interaction::Prompting { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Closes the prompt, yielding its text. Empty text is still a result.
    pub fn submit_text(&mut self) -> Option<TextAnnotation> {
        match std::mem::take(self) {
            Interaction::Prompting { anchor, buffer } => Some(TextAnnotation::new(buffer, anchor)),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn cancel_text(&mut self) {
        if matches!(self, Interaction::Prompting { .. }) {
            *self = Interaction::Idle;
        }
    }

    pub fn reset(&mut self) {
        *self = Interaction::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Interaction::Dragging { .. })
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self, Interaction::Prompting { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_previews_then_commits_final_pair() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Rectangle, Point::new(5, 5));
        assert!(state.is_dragging());

        let preview = state.pointer_move(Point::new(20, 30)).expect("preview");
        assert_eq!(preview.end, Point::new(20, 30));
        let preview = state.pointer_move(Point::new(25, 35)).expect("preview");
        assert_eq!(preview.kind, ShapeKind::Rectangle);

        let committed = state.pointer_up(None).expect("commit");
        assert_eq!(
            committed,
            ShapeAnnotation::new(ShapeKind::Rectangle, Point::new(5, 5), Point::new(25, 35))
        );
        assert_eq!(state, Interaction::Idle);
    }

    #[test]
    fn release_position_wins_over_last_move() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Line, Point::new(0, 0));
        state.pointer_move(Point::new(3, 3));
        let committed = state.pointer_up(Some(Point::new(4, 4))).expect("commit");
        assert_eq!(committed.end, Point::new(4, 4));
    }

    #[test]
    fn click_without_move_commits_zero_length_shape() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Circle, Point::new(7, 8));
        let committed = state.pointer_up(None).expect("commit");
        assert_eq!(committed.start, committed.end);
        assert_eq!(committed.radius(), 0);
    }

    #[test]
    fn idle_ignores_move_and_release() {
        let mut state = Interaction::default();
        assert_eq!(state.pointer_move(Point::new(1, 1)), None);
        assert_eq!(state.pointer_up(Some(Point::new(1, 1))), None);
        assert_eq!(state, Interaction::Idle);
    }

    #[test]
    fn text_tool_prompts_instead_of_dragging() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Text, Point::new(12, 40));
        assert!(state.is_prompting());
        assert_eq!(state.pointer_move(Point::new(50, 50)), None);
        assert_eq!(state.pointer_up(None), None);

        state.text_buffer().expect("buffer").push_str("label");
        let text = state.submit_text().expect("text");
        assert_eq!(text, TextAnnotation::new("label", Point::new(12, 40)));
        assert_eq!(state, Interaction::Idle);
    }

    #[test]
    fn empty_prompt_is_accepted_and_cancel_is_noop() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Text, Point::new(1, 2));
        assert_eq!(state.submit_text(), Some(TextAnnotation::new("", Point::new(1, 2))));

        state.pointer_down(Tool::Text, Point::new(1, 2));
        state.text_buffer().expect("buffer").push_str("discard me");
        state.cancel_text();
        assert_eq!(state, Interaction::Idle);
        assert_eq!(state.submit_text(), None);
    }

    #[test]
    fn pointer_down_is_ignored_outside_idle() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Text, Point::new(1, 1));
        state.pointer_down(Tool::Line, Point::new(9, 9));
        assert!(state.is_prompting());
    }

    #[test]
    fn reset_abandons_drag() {
        let mut state = Interaction::default();
        state.pointer_down(Tool::Line, Point::new(0, 0));
        state.reset();
        assert_eq!(state.pointer_up(None), None);
    }
}
