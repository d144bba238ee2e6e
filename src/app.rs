use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::layout::Rect;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::runtime::AppEvent;
use crate::session::{ClickOutcome, GameSession, PhaseKind};
use crate::settings::{GridSize, Preset, SchulteSettingsStore, SchulteUpdate};
use crate::storage::Storage;
use crate::ui::layout::{screen_chunks, BoardLayout};

/// Terminal application state: the session, its settings and the cursor
#[derive(Debug)]
pub struct App<S: Storage, C: Clock + Clone = SystemClock, R: Rng = StdRng> {
    pub session: GameSession<C, R>,
    pub settings: SchulteSettingsStore<S>,
    /// Row-major index of the highlighted cell
    pub cursor: usize,
    pub should_quit: bool,
    area: Rect,
}

impl<S: Storage, C: Clock + Clone, R: Rng> App<S, C, R> {
    pub fn new(session: GameSession<C, R>, settings: SchulteSettingsStore<S>) -> Self {
        let mut app = Self {
            session,
            settings,
            cursor: 0,
            should_quit: false,
            area: Rect::default(),
        };
        app.sync_grid_size();
        app
    }

    /// Records the terminal area so mouse positions can be mapped to cells
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn phase(&self) -> PhaseKind {
        self.session.phase().kind()
    }

    /// Layout of the board inside the last known terminal area
    pub fn board_layout(&self) -> BoardLayout {
        let [_, body, _] = screen_chunks(self.area);
        BoardLayout::compute(body, self.session.grid_size())
    }

    /// Applies one event. Returns true when the screen should be redrawn.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Tick => self.session.on_tick(),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                self.on_key(key);
                true
            }
            AppEvent::Mouse(mouse) => self.on_mouse(mouse),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        match self.phase() {
            PhaseKind::Idle => match key.code {
                KeyCode::Enter | KeyCode::Char('s') => self.start(),
                KeyCode::Char('1') => self.apply_preset(Preset::Easy),
                KeyCode::Char('2') => self.apply_preset(Preset::Medium),
                KeyCode::Char('3') => self.apply_preset(Preset::Hard),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.resize_grid(GridSize::grow);
                }
                KeyCode::Char('-') => {
                    self.resize_grid(GridSize::shrink);
                }
                _ => {}
            },
            PhaseKind::Playing => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
                KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
                KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.select(self.cursor);
                }
                KeyCode::Char('g') => {
                    self.session.give_up();
                }
                _ => {}
            },
            PhaseKind::Result => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => {
                    self.session.play_again();
                    self.sync_grid_size();
                }
                _ => {}
            },
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.phase() != PhaseKind::Playing {
            return false;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        match self.board_layout().cell_at(mouse.column, mouse.row) {
            Some(index) => {
                self.cursor = index;
                self.select(index);
                true
            }
            None => false,
        }
    }

    /// Selects the cell at `index` on the current board
    pub fn select(&mut self, index: usize) -> ClickOutcome {
        let value = match self.session.board().and_then(|b| b.value_at(index)) {
            Some(value) => value,
            None => return ClickOutcome::Ignored,
        };
        let outcome = self.session.click(value);
        debug!(index, value, ?outcome, "cell selected");
        outcome
    }

    fn start(&mut self) {
        let size = self.settings.settings().grid_size;
        if self.session.start(size) {
            self.cursor = 0;
        }
    }

    fn apply_preset(&mut self, preset: Preset) {
        self.settings.apply_preset(preset);
        self.sync_grid_size();
    }

    fn resize_grid(&mut self, step: fn(GridSize) -> Option<GridSize>) {
        if let Some(size) = step(self.settings.settings().grid_size) {
            self.settings.update_setting(SchulteUpdate::GridSize(size));
            self.sync_grid_size();
        }
    }

    fn sync_grid_size(&mut self) {
        self.session.set_grid_size(self.settings.settings().grid_size);
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let size = self.session.grid_size().get() as i32;
        let row = (self.cursor as i32 / size + dy).clamp(0, size - 1);
        let col = (self.cursor as i32 % size + dx).clamp(0, size - 1);
        self.cursor = (row * size + col) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::settings::{open_schulte_settings, DifficultyLevel};
    use crate::storage::MemoryStorage;
    use rand::SeedableRng;

    type TestApp = App<MemoryStorage, ManualClock, StdRng>;

    fn app() -> (TestApp, ManualClock) {
        let clock = ManualClock::new();
        let settings = open_schulte_settings(MemoryStorage::new());
        let session = GameSession::with_parts(
            clock.clone(),
            StdRng::seed_from_u64(9),
            settings.settings().grid_size,
        );
        let mut app = App::new(session, settings);
        app.set_area(Rect::new(0, 0, 100, 40));
        (app, clock)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click_at(column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn index_of(app: &TestApp, value: u32) -> usize {
        app.session.board().unwrap().position_of(value).unwrap()
    }

    #[test]
    fn enter_starts_with_settings_grid_size() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.phase(), PhaseKind::Playing);
        assert_eq!(app.session.board().unwrap().len(), 25);
    }

    #[test]
    fn preset_keys_update_settings_and_session() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Char('3')));
        assert_eq!(app.settings.level(), DifficultyLevel::Hard);
        assert_eq!(app.session.grid_size().get(), 7);

        app.handle_event(key(KeyCode::Char('-')));
        assert_eq!(app.settings.level(), DifficultyLevel::Custom);
        assert_eq!(app.session.grid_size().get(), 6);
    }

    #[test]
    fn cursor_moves_and_clamps() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Enter));
        app.handle_event(key(KeyCode::Left));
        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.cursor, 0);
        for _ in 0..5 {
            app.handle_event(key(KeyCode::Right));
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.cursor, 8);
        app.handle_event(key(KeyCode::Char('h')));
        assert_eq!(app.cursor, 7);
    }

    #[test]
    fn space_selects_cell_under_cursor() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Enter));
        app.cursor = index_of(&app, 1);
        app.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(app.session.current_target(), Some(2));
        assert!(app.session.timer().is_running());
    }

    #[test]
    fn mouse_click_selects_cell() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Enter));
        let idx = index_of(&app, 1);
        let rect = app.board_layout().cell_rect(idx);
        assert!(app.handle_event(click_at(rect.x + 1, rect.y + rect.height / 2)));
        assert_eq!(app.session.current_target(), Some(2));
        assert_eq!(app.cursor, idx);
    }

    #[test]
    fn mouse_outside_board_is_ignored() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Enter));
        assert!(!app.handle_event(click_at(0, 0)));
        assert_eq!(app.session.current_target(), Some(1));
    }

    #[test]
    fn give_up_and_play_again_keys() {
        let (mut app, _) = app();
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Enter));
        app.handle_event(key(KeyCode::Char('g')));
        assert_eq!(app.phase(), PhaseKind::Idle);

        app.handle_event(key(KeyCode::Enter));
        for value in 1..=9 {
            let idx = index_of(&app, value);
            app.select(idx);
        }
        assert_eq!(app.phase(), PhaseKind::Result);
        app.handle_event(key(KeyCode::Char('r')));
        assert_eq!(app.phase(), PhaseKind::Idle);
    }

    #[test]
    fn quit_keys() {
        for event in [
            key(KeyCode::Esc),
            key(KeyCode::Char('q')),
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let (mut app, _) = app();
            app.handle_event(event);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn tick_reports_feedback_expiry() {
        let (mut app, clock) = app();
        app.handle_event(key(KeyCode::Char('1')));
        app.handle_event(key(KeyCode::Enter));
        let idx = index_of(&app, 1);
        app.select(idx);
        clock.advance_ms(5);
        assert!(!app.handle_event(AppEvent::Tick));
        clock.advance_ms(200);
        assert!(app.handle_event(AppEvent::Tick));
        assert_eq!(app.session.feedback(), None);
    }
}
