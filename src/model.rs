//! Committed annotations and the clear-all / restore-all history.

// ── Geometry ────────────────────────────────────────────────────────────────

/// Integer pixel position in image space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ── Annotations ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

/// A drawn shape. Colour and stroke come from the style at render time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeAnnotation {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

impl ShapeAnnotation {
    pub fn new(kind: ShapeKind, start: Point, end: Point) -> Self {
        Self { kind, start, end }
    }

    /// Circle radius: distance from start to end, rounded to the nearest pixel.
    ///
    /// Coordinates aren't validated, so distances beyond `u32::MAX` (only
    /// reachable with points near the `i32` limits) saturate at `u32::MAX`.
    pub fn radius(&self) -> u32 {
        let dx = f64::from(self.end.x) - f64::from(self.start.x);
        let dy = f64::from(self.end.y) - f64::from(self.start.y);
        dx.hypot(dy).round() as u32
    }

    /// Corners of the axis-aligned box spanned by start and end, as (min, max).
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextAnnotation {
    pub text: String,
    /// Left end of the text baseline.
    pub anchor: Point,
}

impl TextAnnotation {
    pub fn new(text: impl Into<String>, anchor: Point) -> Self {
        Self {
            text: text.into(),
            anchor,
        }
    }
}

// ── Log ─────────────────────────────────────────────────────────────────────

/// Deep copy of both annotation sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub shapes: Vec<ShapeAnnotation>,
    pub texts: Vec<TextAnnotation>,
}

/// Ordered annotations plus the redo stack.
///
/// `undo` snapshots and clears *everything*; `redo` replaces the current
/// sequences with the latest snapshot. Adding annotations never touches the
/// redo stack, so a redo after new additions discards them.
#[derive(Debug, Default)]
pub struct AnnotationLog {
    shapes: Vec<ShapeAnnotation>,
    texts: Vec<TextAnnotation>,
    redo_stack: Vec<Snapshot>,
}

impl AnnotationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, kind: ShapeKind, start: Point, end: Point) {
        self.shapes.push(ShapeAnnotation::new(kind, start, end));
    }

    pub fn add_text(&mut self, text: impl Into<String>, anchor: Point) {
        self.texts.push(TextAnnotation::new(text, anchor));
    }

    /// Returns `true` if anything was cleared.
    pub fn undo(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.redo_stack.push(Snapshot {
            shapes: std::mem::take(&mut self.shapes),
            texts: std::mem::take(&mut self.texts),
        });
        true
    }

    /// Returns `true` if a snapshot was restored.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(Snapshot { shapes, texts }) => {
                self.shapes = shapes;
                self.texts = texts;
                true
            }
            None => false,
        }
    }

    pub fn shapes(&self) -> &[ShapeAnnotation] {
        &self.shapes
    }

    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.texts.is_empty()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
