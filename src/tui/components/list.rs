use crate::core::chunker::Chunk;
use crate::core::report::time_range;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

const PREVIEW_WORDS: usize = 12;

/// Scrollable list of the sections a transcript was split into.
pub struct ChunkList {
    pub items: Vec<Chunk>,
    pub state: ListState,
    viewport_size: usize,
}

impl ChunkList {
    pub fn new(items: Vec<Chunk>) -> Self {
        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(0));
        }

        Self {
            items,
            state,
            viewport_size: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.previous();
                true
            }
            KeyCode::Down => {
                self.next();
                true
            }
            KeyCode::PageDown => {
                self.move_by(self.viewport_size.max(1) as isize);
                true
            }
            KeyCode::PageUp => {
                self.move_by(-(self.viewport_size.max(1) as isize));
                true
            }
            KeyCode::Home => {
                self.select(0);
                true
            }
            KeyCode::End => {
                self.select(self.items.len().saturating_sub(1));
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.move_by(-1);
                true
            }
            MouseEventKind::ScrollDown => {
                self.move_by(1);
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    fn move_by(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }

        let current = self.state.selected().unwrap_or(0) as isize;
        let last = self.items.len() as isize - 1;
        self.select((current + delta).clamp(0, last) as usize);
    }

    fn select(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        self.state.select(Some(index.min(self.items.len() - 1)));
        self.adjust_offset();
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, title: &str) {
        self.viewport_size = (area.height.saturating_sub(2) as usize).max(1);
        self.adjust_offset();

        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, chunk)| {
                let line = Line::from(vec![
                    Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::Gray)),
                    Span::styled(time_range(chunk), Style::default().fg(Color::Yellow)),
                    Span::raw(format!("  {:>5} words  ", chunk.word_count())),
                    Span::styled(preview(&chunk.text), Style::default().fg(Color::White)),
                ]);

                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.state);
    }

    fn adjust_offset(&mut self) {
        if self.items.is_empty() {
            *self.state.offset_mut() = 0;
            return;
        }

        let viewport = self.viewport_size.max(1);
        let selected = self.state.selected().unwrap_or(0).min(self.items.len() - 1);

        let max_offset = self.items.len().saturating_sub(viewport);
        let mut offset = self.state.offset().min(max_offset);

        if selected < offset {
            offset = selected;
        } else if selected >= offset + viewport {
            offset = selected + 1 - viewport;
        }
        *self.state.offset_mut() = offset;
    }
}

fn preview(text: &str) -> String {
    let mut words = text.split_whitespace();
    let head: Vec<&str> = words.by_ref().take(PREVIEW_WORDS).collect();
    if words.next().is_some() {
        format!("{}…", head.join(" "))
    } else {
        head.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n)
            .map(|i| Chunk {
                text: format!("chunk {i}"),
                start: i as f64,
                end: i as f64 + 1.0,
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_wraps_and_clamps() {
        let mut list = ChunkList::new(chunks(3));
        assert_eq!(list.state.selected(), Some(0));

        list.handle_key(key(KeyCode::Up));
        assert_eq!(list.state.selected(), Some(2));

        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.state.selected(), Some(0));

        list.handle_key(key(KeyCode::End));
        assert_eq!(list.state.selected(), Some(2));

        list.handle_key(key(KeyCode::PageDown));
        assert_eq!(list.state.selected(), Some(2));

        list.handle_key(key(KeyCode::Home));
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn empty_list_ignores_navigation() {
        let mut list = ChunkList::new(Vec::new());
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::End));
        assert_eq!(list.state.selected(), None);
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(preview(&long), "0 1 2 3 4 5 6 7 8 9 10 11…");
        assert_eq!(preview("short text"), "short text");
    }
}
