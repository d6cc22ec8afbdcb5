use ratatui::widgets::ListState;

/// Cursor over whatever list the current screen shows. The list itself is
/// re-derived on every frame, so every move takes its current length.
#[derive(Default)]
pub struct Selection {
    pub state: ListState,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Keeps the cursor inside `0..len`, selecting the first item of a
    /// non-empty list when nothing is selected.
    pub fn clamp(&mut self, len: usize) {
        let i = match (self.state.selected(), len) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(i);
    }

    pub fn reset(&mut self) {
        self.state.select(None);
    }

    pub fn next(&mut self, len: usize) {
        self.jump_down(1, len);
    }

    pub fn previous(&mut self, len: usize) {
        self.jump_up(1, len);
    }

    pub fn first(&mut self, len: usize) {
        self.state.select(if len == 0 { None } else { Some(0) });
    }

    pub fn last(&mut self, len: usize) {
        self.state.select(len.checked_sub(1));
    }

    pub fn jump_up(&mut self, offset: usize, len: usize) {
        let i = self.state.selected().unwrap_or(0).saturating_sub(offset);
        self.state.select(Some(i));
        self.clamp(len);
    }

    pub fn jump_down(&mut self, offset: usize, len: usize) {
        let i = match self.state.selected() {
            Some(i) => i.saturating_add(offset),
            None => 0,
        };
        self.state.select(Some(i));
        self.clamp(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_stays_in_bounds() {
        let mut sel = Selection::new();
        sel.next(3);
        assert_eq!(sel.selected(), Some(0));
        sel.jump_down(10, 3);
        assert_eq!(sel.selected(), Some(2));
        sel.previous(3);
        sel.jump_up(10, 3);
        assert_eq!(sel.selected(), Some(0));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut sel = Selection::new();
        sel.last(5);
        sel.clamp(0);
        assert_eq!(sel.selected(), None);
        sel.next(0);
        assert_eq!(sel.selected(), None);
    }
}
