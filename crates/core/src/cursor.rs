//! Segment-at-a-time reader over a fragment.

use sheet_history_diagnostics::Span;

/// A saved cursor position, restored with [`TextCursor::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSavePoint(usize);

/// A movable position over fragment text.
///
/// Components are `/`-prefixed segments. Reading a component never consumes
/// the slash that starts the following one.
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    /// A cursor positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Consume `/` and the segment following it, up to the next `/` or the end.
    ///
    /// Returns `None` without moving when the cursor is not at a `/`.
    pub fn parse_component(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let after = rest.strip_prefix('/')?;
        let len = after.find('/').unwrap_or(after.len());
        self.pos += 1 + len;
        Some(&after[..len])
    }

    /// Consume everything remaining, minus one leading `/` if present.
    ///
    /// Returns `None` only when the cursor is already at the end.
    pub fn parse_all(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        self.pos = self.text.len();
        Some(rest.strip_prefix('/').unwrap_or(rest))
    }

    /// The next component without consuming it.
    pub fn peek_component(&self) -> Option<&'a str> {
        self.clone().parse_component()
    }

    /// Remember the current position.
    pub fn save(&self) -> CursorSavePoint {
        CursorSavePoint(self.pos)
    }

    /// Return to a previously saved position.
    pub fn restore(&mut self, save: CursorSavePoint) {
        self.pos = save.0;
    }

    /// True once every character has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Skip whatever is left.
    pub fn end(&mut self) {
        self.pos = self.text.len();
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed text.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Span from a saved point up to the current position.
    pub fn span_since(&self, save: CursorSavePoint) -> Span {
        Span::new(save.0, self.pos)
    }

    /// Span covering everything not yet consumed.
    pub fn rest_span(&self) -> Span {
        Span::new(self.pos, self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_read_one_at_a_time() {
        let mut c = TextCursor::new("/1/Untitled/cell");
        assert_eq!(c.parse_component(), Some("1"));
        assert_eq!(c.parse_component(), Some("Untitled"));
        assert_eq!(c.parse_component(), Some("cell"));
        assert_eq!(c.parse_component(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn component_requires_slash() {
        let mut c = TextCursor::new("abc");
        assert_eq!(c.parse_component(), None);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn empty_component_between_slashes() {
        let mut c = TextCursor::new("//x");
        assert_eq!(c.parse_component(), Some(""));
        assert_eq!(c.parse_component(), Some("x"));
    }

    #[test]
    fn parse_all_keeps_inner_slashes() {
        let mut c = TextCursor::new("/save/=1/2");
        assert_eq!(c.parse_component(), Some("save"));
        assert_eq!(c.parse_all(), Some("=1/2"));
        assert!(c.is_empty());
        assert_eq!(c.parse_all(), None);
    }

    #[test]
    fn save_and_restore() {
        let mut c = TextCursor::new("/A1/top-left");
        c.parse_component();
        let save = c.save();
        assert_eq!(c.parse_component(), Some("top-left"));
        c.restore(save);
        assert_eq!(c.peek_component(), Some("top-left"));
        assert_eq!(c.rest(), "/top-left");
    }

    #[test]
    fn spans_track_consumed_bytes() {
        let mut c = TextCursor::new("/1/abc");
        let save = c.save();
        c.parse_component();
        assert_eq!(c.span_since(save), Span::new(0, 2));
        assert_eq!(c.rest_span(), Span::new(2, 6));
    }
}
