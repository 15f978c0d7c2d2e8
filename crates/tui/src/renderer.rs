use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use pprof_tree_core::model::Granularity;

use crate::app::{App, Row};
use crate::dump::header;

const BAR_WIDTH: usize = 10;

/// Color a row by its share of the total.
fn heat_color(percent: f64) -> Color {
    if percent >= 50.0 {
        Color::Red
    } else if percent >= 20.0 {
        Color::Yellow
    } else if percent >= 5.0 {
        Color::Green
    } else {
        Color::Gray
    }
}

fn percent_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64)
        .round()
        .clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn row_line(app: &App, row: &Row) -> Line<'static> {
    let marker = if row.is_leaf {
        "  "
    } else if row.expanded {
        "▾ "
    } else {
        "▸ "
    };
    let color = heat_color(row.percent);
    Line::from(vec![
        Span::styled(percent_bar(row.percent), Style::default().fg(color)),
        Span::raw(format!(" {:7.3}% ", row.percent)),
        Span::raw("  ".repeat(row.depth)),
        Span::raw(marker),
        Span::styled(row.label.clone(), Style::default().fg(Color::White)),
        Span::styled(
            format!(" - {}", app.view().value_unit().format_value(row.value)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw(frame: &mut Frame, app: &App, list_state: &mut ListState) {
    let [header_area, tree_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let options = app.options();
    let title = format!(
        " {} | mode: {} | by {} ",
        header(app.view()),
        options.mode,
        match options.granularity {
            Granularity::Function => "function",
            Granularity::Line => "line",
        }
    );
    frame.render_widget(
        Paragraph::new(title).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        header_area,
    );

    let rows = app.rows();
    let items: Vec<ListItem> = rows.iter().map(|r| ListItem::new(row_line(app, r))).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    list_state.select(if rows.is_empty() { None } else { Some(app.selected()) });
    frame.render_stateful_widget(list, tree_area, list_state);

    let footer = if app.editing_filter {
        Line::from(vec![
            Span::styled(" filter: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{}█", options.filter)),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {status}"), Style::default().fg(Color::LightRed)))
    } else {
        let filter = if options.filter.is_empty() {
            String::new()
        } else {
            format!(" | filter: {}", options.filter)
        };
        Line::from(format!(
            " ↑↓ move | →/enter expand | ← collapse | / filter | a aggregation | m mode | q quit{filter}"
        ))
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(Color::Black)),
        footer_area,
    );
}

pub fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut list_state = ListState::default();
    loop {
        terminal.draw(|frame| draw(frame, app, &mut list_state))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            break;
        }

        if app.editing_filter {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => app.editing_filter = false,
                KeyCode::Backspace => app.pop_filter(),
                KeyCode::Char(c) => app.push_filter(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
            KeyCode::PageUp => app.move_selection(-20),
            KeyCode::PageDown => app.move_selection(20),
            KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => app.expand_selected(),
            KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
            KeyCode::Char('/') => {
                app.status = None;
                app.editing_filter = true;
            }
            KeyCode::Char('a') => app.toggle_granularity(),
            KeyCode::Char('m') => app.cycle_mode(),
            _ => {}
        }
    }
    Ok(())
}
