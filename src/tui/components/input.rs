use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Single line text input. `cursor` counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub placeholder: String,
    pub label: String,
    pub focused: bool,
}

impl InputField {
    pub fn new(label: &str, placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            focused: false,
        }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.value.remove(at);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.char_len() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.label.as_str())
            .border_style(if self.focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            });

        let text = if self.value.is_empty() && !self.focused {
            Line::from(Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::raw(&self.value))
        };

        let paragraph = Paragraph::new(text).block(block);
        f.render_widget(paragraph, area);

        if self.focused {
            let before = &self.value[..self.byte_index(self.cursor)];
            let column = area.x + 1 + before.width() as u16;
            let max_column = area.x + area.width.saturating_sub(2);
            f.set_cursor_position((column.min(max_column), area.y + 1));
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::InputField;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(field: &mut InputField, code: KeyCode) {
        field.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn edits_multibyte_text_by_character() {
        let mut field = InputField::new("URL", "");
        for c in "añb".chars() {
            press(&mut field, KeyCode::Char(c));
        }
        press(&mut field, KeyCode::Left);
        press(&mut field, KeyCode::Backspace);

        assert_eq!(field.value, "ab");
        assert_eq!(field.cursor, 1);

        press(&mut field, KeyCode::Delete);
        assert_eq!(field.value, "a");
        press(&mut field, KeyCode::Right);
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn blank_value_is_invalid() {
        let mut field = InputField::new("URL", "");
        assert!(!field.is_valid());
        press(&mut field, KeyCode::Char(' '));
        assert!(!field.is_valid());
        press(&mut field, KeyCode::Char('x'));
        assert!(field.is_valid());
    }
}
