use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchday_widget::catalog::{
    self, CatalogStore, Entity, EntityKind, KICKOFF_FORMAT, kind_label,
};
use matchday_widget::config::WidgetSettings;
use matchday_widget::suggest::suggestions;
use matchday_widget::widget::{Command, WidgetConfig, lifecycle_label, variant_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Text,
    League,
}

struct App {
    state: WidgetConfig,
    store: CatalogStore,
    tab: usize,
    page: usize,
    cursor: usize,
    input_mode: InputMode,
    input: String,
    help_overlay: bool,
    should_quit: bool,
}

impl App {
    fn new(settings: WidgetSettings, store: CatalogStore) -> Self {
        Self {
            state: WidgetConfig::with_settings(settings),
            store,
            tab: 0,
            page: 1,
            cursor: 0,
            input_mode: InputMode::Normal,
            input: String::new(),
            help_overlay: false,
            should_quit: false,
        }
    }

    fn current_kind(&self) -> EntityKind {
        let tabs = self.state.variant().tabs();
        tabs[self.tab.min(tabs.len() - 1)]
    }

    fn current_suggestions(&self) -> Vec<String> {
        match self.input_mode {
            InputMode::Normal => Vec::new(),
            // The match tab searches by club, so it suggests club names.
            InputMode::Text => {
                let kind = match self.current_kind() {
                    EntityKind::Matches => EntityKind::Clubs,
                    kind => kind,
                };
                suggestions(kind, &self.store, &self.input)
            }
            InputMode::League => suggestions(EntityKind::Leagues, &self.store, &self.input),
        }
    }

    fn dispatch(&mut self, command: Command) {
        // Rejections are already logged by the widget state.
        let _ = self.state.dispatch(command);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let page = self.state.page(&self.store, self.current_kind(), self.page);
        self.page = page.page;
        if page.items.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= page.items.len() {
            self.cursor = page.items.len() - 1;
        }
    }

    fn reset_view(&mut self) {
        self.page = 1;
        self.cursor = 0;
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.on_normal_key(key),
            InputMode::Text | InputMode::League => self.on_input_key(key),
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent) {
        let kind = self.current_kind();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            KeyCode::Char('v') => {
                let next = self.state.variant().next();
                self.dispatch(Command::SetVariant(next));
                self.tab = self.tab.min(next.tabs().len() - 1);
                self.reset_view();
            }
            KeyCode::Tab | KeyCode::Char('l') => {
                self.tab = (self.tab + 1) % self.state.variant().tabs().len();
                self.reset_view();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.state.page(&self.store, kind, self.page).items.len();
                if len > 0 {
                    self.cursor = (self.cursor + 1) % len;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.state.page(&self.store, kind, self.page).items.len();
                if len > 0 {
                    self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
                }
            }
            KeyCode::Char('n') | KeyCode::Right => {
                self.page += 1;
                self.cursor = 0;
                self.clamp_cursor();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.page = self.page.saturating_sub(1).max(1);
                self.cursor = 0;
                self.clamp_cursor();
            }
            KeyCode::Char(' ') => {
                let key = self
                    .state
                    .page(&self.store, kind, self.page)
                    .items
                    .get(self.cursor)
                    .map(|entity| entity.key().to_string());
                if let Some(key) = key {
                    self.dispatch(Command::ToggleSelection { kind, key });
                }
            }
            KeyCode::Char('/') => {
                self.input = self.state.filter(kind).text_query.clone();
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('g') if kind == EntityKind::Matches => {
                self.input = self.state.filter(kind).league_query.clone();
                self.input_mode = InputMode::League;
            }
            KeyCode::Char('t') if kind == EntityKind::Matches => {
                self.dispatch(Command::SetFilterToday { kind })
            }
            KeyCode::Char('T') => self.dispatch(Command::SetFilterDate { kind, date: None }),
            KeyCode::Char('i') => self.dispatch(Command::ToggleIncludedOnly { kind }),
            KeyCode::Char('P') => self.dispatch(Command::Publish),
            KeyCode::Char('D') => self.dispatch(Command::Delete),
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        let kind = self.current_kind();
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Tab => {
                // Accept the first suggestion.
                if let Some(first) = self.current_suggestions().into_iter().next() {
                    self.input = first.clone();
                    match self.input_mode {
                        InputMode::League => {
                            self.dispatch(Command::SetMatchLeagueFilter { text: first })
                        }
                        _ => self.dispatch(Command::SelectSuggestion { kind, value: first }),
                    }
                }
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => return,
        }
        let text = self.input.clone();
        self.reset_view();
        match self.input_mode {
            InputMode::League => self.dispatch(Command::SetMatchLeagueFilter { text }),
            _ => self.dispatch(Command::SetFilterText { kind, text }),
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let settings = WidgetSettings::from_env();
    let store = match &settings.catalog_path {
        Some(path) => catalog::load_catalog_file(path)?,
        None => catalog::seed_catalog(),
    };
    let mut app = App::new(settings, store);
    app.state.push_log(format!(
        "[INFO] Catalog: {} leagues, {} clubs, {} matches",
        app.store.leagues.len(),
        app.store.clubs.len(),
        app.store.matches.len()
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let filters = Paragraph::new(filter_text(app)).style(Style::default().fg(Color::Gray));
    frame.render_widget(filters, chunks[1]);

    render_rows(frame, chunks[2], app);

    let logs: Vec<Line> = app
        .state
        .logs()
        .iter()
        .rev()
        .take(5)
        .map(|line| Line::from(line.as_str()))
        .collect();
    let log_panel =
        Paragraph::new(logs).block(Block::default().title("Log").borders(Borders::TOP));
    frame.render_widget(log_panel, chunks[3]);

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> Text<'static> {
    let snapshot = app.state.snapshot();
    let status_style = if app.state.is_live() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
    };
    let dirty = if snapshot.dirty { "unsaved changes" } else { "saved" };
    let tabs = snapshot
        .tabs
        .iter()
        .map(|kind| {
            if *kind == app.current_kind() {
                format!("[{}]", kind_label(*kind))
            } else {
                format!(" {} ", kind_label(*kind))
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Text::from(vec![
        Line::from(Span::styled(snapshot.status, status_style)),
        Line::from(format!(
            "Widget: {} | {} | {}",
            variant_label(snapshot.variant),
            lifecycle_label(snapshot.lifecycle),
            dirty
        )),
        Line::from(tabs),
    ])
}

fn filter_text(app: &App) -> String {
    let kind = app.current_kind();
    let criteria = app.state.filter(kind);
    let mut parts = vec![format!("Search: \"{}\"", criteria.text_query)];
    if kind == EntityKind::Matches {
        parts.push(format!("League: \"{}\"", criteria.league_query));
        let date = criteria
            .date_exact
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "any".to_string());
        parts.push(format!("Date: {date}"));
    }
    parts.push(if criteria.included_only {
        "Showing included".to_string()
    } else {
        "Showing all".to_string()
    });
    let mut line = parts.join(" | ");
    match app.input_mode {
        InputMode::Normal => {}
        InputMode::Text | InputMode::League => {
            let hints = app.current_suggestions();
            line.push_str(&format!("\n> {}  {}", app.input, hints.join(", ")));
        }
    }
    line
}

fn render_rows(frame: &mut Frame, area: Rect, app: &App) {
    let kind = app.current_kind();
    let page = app.state.page(&app.store, kind, app.page);
    if page.items.is_empty() {
        let label = kind_label(kind).to_lowercase();
        let empty = Paragraph::new(format!("No {label} match the filters"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    let selection = app.state.selection(kind);
    let mut lines: Vec<Line> = page
        .items
        .iter()
        .enumerate()
        .map(|(idx, entity)| {
            let mark = if selection.is_selected(entity.key()) { "[x]" } else { "[ ]" };
            let text = row_text(entity);
            let style = if idx == app.cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{mark} {text}"), style))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Page {}/{} ({} rows)",
        page.page, page.page_count, page.total
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

fn row_text(entity: &Entity) -> String {
    match entity.as_match() {
        Some(m) => format!("{}  {}", entity.display_text(), m.kickoff.format(KICKOFF_FORMAT)),
        None => entity.display_text(),
    }
}

fn footer_text(app: &App) -> String {
    match app.input_mode {
        InputMode::Normal => {
            "v Variant | Tab Next tab | j/k Move | Space Toggle | / Search | g League | t/T Date | i Included | n/p Page | P Publish | D Delete | ? Help | q Quit".to_string()
        }
        InputMode::Text | InputMode::League => {
            "Type to filter | Tab Accept suggestion | Enter Done | Esc Back".to_string()
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Widget - Help",
        "",
        "Widget:",
        "  v            Cycle variant (match / matches / table)",
        "  P            Save and publish",
        "  D            Take the widget down",
        "",
        "Catalog:",
        "  Tab / l      Next tab",
        "  j/k or ↑/↓   Move",
        "  n/p or ←/→   Page",
        "  Space        Include / exclude row",
        "  /            Search by name",
        "  g            Filter matches by league",
        "  t / T        Matches on today / any date",
        "  i            Show included only",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
