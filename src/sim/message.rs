//! Typewriter message board for the ending sequence

use crate::renderer::{ImageId, Rect, Surface, TextStyle};

/// Characters per line before wrapping
pub const LINE_CHARS: usize = 28;

/// Forces a line break before the word it is attached to
const BREAK: char = '|';

/// Wrap `text` into lines of at most [`LINE_CHARS`] characters
///
/// Words are never split; a word longer than a line gets a line of its own.
pub fn wrap(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buffer = String::new();

    for word in text.split(' ') {
        let clean: String = word.chars().filter(|&c| c != BREAK).collect();
        let fits = buffer.chars().count() + clean.chars().count() < LINE_CHARS;

        if fits && word.contains(BREAK) || !fits && !buffer.is_empty() {
            lines.push(buffer.trim().to_string());
            buffer.clear();
        }
        buffer.push_str(&clean);
        buffer.push(' ');
    }
    lines.push(buffer.trim().to_string());
    lines
}

/// Reveals wrapped text one character at a time
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBoard {
    lines: Vec<String>,
    total_chars: usize,
    revealed: usize,
    char_ms: f32,
    ms_since_last_char: f32,
    style: TextStyle,
    backdrop: Option<Rect>,
    complete: bool,
}

impl MessageBoard {
    pub fn new(text: &str, chars_per_sec: f32, style: TextStyle) -> Self {
        let lines = wrap(text);
        let total_chars = lines.iter().map(|line| line.chars().count()).sum();
        Self {
            lines,
            total_chars,
            revealed: 0,
            char_ms: 1000.0 / chars_per_sec,
            ms_since_last_char: 0.0,
            style,
            backdrop: None,
            complete: false,
        }
    }

    /// Draw the board image of `size` behind the text
    pub fn with_backdrop(mut self, size: Option<(u32, u32)>) -> Self {
        self.backdrop = size.map(|(w, h)| Rect::new(0.0, 0.0, w as f32, h as f32));
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Revealed part of each started line
    pub fn visible(&self) -> Vec<String> {
        let mut left = self.revealed;
        let mut visible = Vec::new();
        for line in &self.lines {
            if left == 0 {
                break;
            }
            let len = line.chars().count();
            visible.push(line.chars().take(left).collect());
            left = left.saturating_sub(len);
        }
        visible
    }

    /// Returns true exactly once, on the update after the last character shows
    pub fn update(&mut self, elapsed_ms: f32) -> bool {
        if self.complete {
            return false;
        }

        self.ms_since_last_char += elapsed_ms;
        if self.ms_since_last_char <= self.char_ms {
            return false;
        }
        self.ms_since_last_char = 0.0;

        if self.revealed >= self.total_chars {
            self.complete = true;
            return true;
        }
        self.revealed += 1;
        false
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let (x, top, spacing) = match self.style {
            TextStyle::Board => (42.0, 33.0, 12.0),
            TextStyle::Final => (20.0, 30.0, 25.0),
        };

        if let Some(src) = self.backdrop {
            surface.blit(ImageId::MessageBoard, src, Rect::new(35.0, 20.0, src.w, src.h), 1.0);
        }
        for (i, line) in self.visible().iter().enumerate() {
            surface.text(line, x, top + spacing * i as f32 + 1.0, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, RecordingSurface};

    #[test]
    fn test_wrap_at_line_width() {
        let lines = wrap("Thank you for helping Raphael beat Shredder. But there is someone else who needs you.");
        assert_eq!(
            lines,
            vec![
                "Thank you for helping",
                "Raphael beat Shredder. But",
                "there is someone else who",
                "needs you.",
            ]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= LINE_CHARS));
    }

    #[test]
    fn test_wrap_forced_breaks() {
        assert_eq!(
            wrap("The city sleeps safely tonight. | |Thanks for playing!"),
            vec!["The city sleeps safely", "tonight.", "", "Thanks for playing!"]
        );
    }

    #[test]
    fn test_wrap_long_word() {
        let long = "x".repeat(30);
        assert_eq!(wrap(&format!("{long} y")), vec![long.clone(), "y".to_string()]);
    }

    #[test]
    fn test_reveal_and_complete_once() {
        let mut board = MessageBoard::new("ab cd", 10.0, TextStyle::Board);
        assert_eq!(board.lines(), ["ab cd"]);

        board.update(50.0);
        assert!(board.visible().is_empty());

        for _ in 0..5 {
            assert!(!board.update(101.0));
        }
        assert_eq!(board.visible(), vec!["ab cd"]);
        assert!(!board.is_complete());

        assert!(board.update(101.0));
        assert!(!board.update(101.0));
        assert!(board.is_complete());
    }

    #[test]
    fn test_reveal_spans_lines() {
        let mut board = MessageBoard::new("one |two", 10.0, TextStyle::Final);
        for _ in 0..4 {
            board.update(101.0);
        }
        assert_eq!(board.visible(), vec!["one", "t"]);

        let mut surface = RecordingSurface::new();
        board.draw(&mut surface);
        assert_eq!(
            surface.calls.last(),
            Some(&DrawCall::Text {
                text: "t".into(),
                x: 20.0,
                y: 56.0,
                style: TextStyle::Final,
            })
        );
    }

    #[test]
    fn test_backdrop_drawn_first() {
        let board = MessageBoard::new("hi", 12.0, TextStyle::Board).with_backdrop(Some((186, 80)));
        let mut surface = RecordingSurface::new();
        board.draw(&mut surface);
        assert_eq!(
            surface.blits_of(ImageId::MessageBoard),
            vec![(Rect::new(0.0, 0.0, 186.0, 80.0), Rect::new(35.0, 20.0, 186.0, 80.0))]
        );
    }
}
