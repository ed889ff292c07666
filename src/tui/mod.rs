pub mod widgets;

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use crate::cli::{ColorModel, ExportKind};
use crate::export::{generate_css_variables, generate_tailwind_config};
use crate::notify::{Notifier, ToastNotifier};
use crate::pipeline::extract::Extractor;
use crate::store::{AddOutcome, PaletteStore};

use widgets::{ExportWidget, PaletteWidget, StatusLine};

/// State for the interactive TUI application.
pub struct TuiApp {
    pub store: PaletteStore,
    pub notifier: ToastNotifier,
    pub extractor: Extractor,
    pub model: ColorModel,
    pub export_kind: ExportKind,
    pub selected: Option<usize>,
}

impl TuiApp {
    pub fn new(store: PaletteStore, extractor: Extractor, model: ColorModel) -> Self {
        let selected = store.len().checked_sub(1);
        Self {
            store,
            notifier: ToastNotifier::default(),
            extractor,
            model,
            export_kind: ExportKind::Css,
            selected,
        }
    }

    /// Apply one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('o') if ctrl => self.extract_from_input(),
            KeyCode::Char('x') if ctrl => {
                self.store.clear();
                self.selected = None;
            }
            KeyCode::Char('e') if ctrl => self.store.set_show_export(!self.store.show_export()),
            KeyCode::Char('t') if ctrl => {
                self.export_kind = match self.export_kind {
                    ExportKind::Css => ExportKind::Tailwind,
                    _ => ExportKind::Css,
                };
            }
            KeyCode::Char(c) if !ctrl => self.store.current_color_mut().push(c),
            KeyCode::Backspace => {
                self.store.current_color_mut().pop();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => self.model = self.model.next(),
            KeyCode::Up => self.selected = self.selected.map(|s| s.saturating_sub(1)),
            KeyCode::Down => {
                self.selected = match self.selected {
                    Some(s) if s + 1 < self.store.len() => Some(s + 1),
                    None if !self.store.is_empty() => Some(0),
                    other => other,
                };
            }
            KeyCode::Delete => self.remove_selected(),
            _ => {}
        }
        false
    }

    fn submit(&mut self) {
        let input = self.store.current_color().to_string();
        if input.trim().is_empty() {
            return;
        }
        // Rejections are already reported through the notifier.
        if let Ok(AddOutcome::Added(index)) = self.store.add_color(&input, &mut self.notifier) {
            self.selected = Some(index);
        }
    }

    fn extract_from_input(&mut self) {
        let path = PathBuf::from(self.store.current_color().trim());
        if path.as_os_str().is_empty() {
            self.notifier
                .info("No image path", Some("type the path of an image, then press Ctrl-O"));
            return;
        }
        if let Ok(added) = self.extractor.extract_file(&path, &mut self.store, &mut self.notifier) {
            self.store.set_current_color("");
            if added > 0 {
                self.selected = Some(self.store.len() - 1);
            }
        }
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        if self.store.remove_at(index).is_some() {
            self.selected = match self.store.len() {
                0 => None,
                len => Some(index.min(len - 1)),
            };
        }
    }

    fn export_text(&self) -> (&'static str, String) {
        match self.export_kind {
            ExportKind::Tailwind => ("Tailwind config", generate_tailwind_config(self.store.colors())),
            _ => ("CSS variables", generate_css_variables(self.store.colors(), self.model)),
        }
    }
}

/// Launch the TUI application; returns the final palette state on exit.
pub fn run(mut app: TuiApp) -> Result<PaletteStore> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result.map(|()| app.store)
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut TuiApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn draw(frame: &mut Frame, app: &TuiApp) {
    let [main, input, status] = Layout::vertical([
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let title = match app.store.uploaded_image() {
        Some(path) => format!("Palette ({}) · {}", app.model, path.display()),
        None => format!("Palette ({})", app.model),
    };
    let palette = PaletteWidget::new(app.store.colors(), app.model, app.selected).title(title);

    if app.store.show_export() {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(main);
        frame.render_widget(palette, left);
        let (export_title, content) = app.export_text();
        frame.render_widget(ExportWidget::new(export_title, &content), right);
    } else {
        frame.render_widget(palette, main);
    }

    let pending = app.store.current_color();
    frame.render_widget(
        Paragraph::new(pending).block(Block::bordered().title("Color or image path")),
        input,
    );
    frame.set_cursor_position(cursor_position(input, pending));

    frame.render_widget(StatusLine::new(app.notifier.current.as_ref()), status);
}

/// Cursor after the pending text, kept inside the input box borders.
fn cursor_position(input: Rect, pending: &str) -> (u16, u16) {
    let max = input.width.saturating_sub(2);
    let typed = u16::try_from(pending.chars().count()).unwrap_or(u16::MAX).min(max);
    (input.x.saturating_add(1).saturating_add(typed), input.y.saturating_add(1))
}
