//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use super::runtime::{App, InputMode};
use super::style;
use crate::clock::Clock;
use crate::report::{format_currency, format_timer};

/// Renders the full TUI frame.
pub fn render<C: Clock>(frame: &mut Frame, app: &App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(6),    // device table
            Constraint::Length(3), // add form / tariff
            Constraint::Length(3), // summary
            Constraint::Length(1), // message
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_devices(frame, app, chunks[1]);
    render_inputs(frame, app, chunks[2]);
    render_summary(frame, app, chunks[3]);
    render_message(frame, app, chunks[4]);
    render_footer(frame, app, chunks[5]);
}

/// Header bar: title, device counts, undo depth.
fn render_header<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            " ENERGY TRACKER ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ {} devices │ {} on │ undo: {} ",
            app.report.devices.len(),
            app.report.active_count(),
            app.registry().undo_depth(),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Device table with status colors and running timers.
fn render_devices<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let header = Row::new(["Name", "Power", "Status", "Time", "Energy"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .report
        .devices
        .iter()
        .map(|d| {
            Row::new(vec![
                Cell::from(d.name.clone()),
                Cell::from(format!("{} W", d.wattage_w)),
                Cell::from(Span::styled(
                    d.status.as_str(),
                    Style::default()
                        .fg(style::status_color(d.status))
                        .add_modifier(Modifier::BOLD),
                )),
                Cell::from(format_timer(d.running_seconds)),
                Cell::from(format!("{:.2} Wh", d.energy_wh)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Devices ").borders(Borders::ALL))
        .row_highlight_style(Style::default().bg(style::SELECTED_BG))
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(
        (!app.report.devices.is_empty()).then_some(app.selected),
    );
    frame.render_stateful_widget(table, area, &mut state);
}

/// Add form and tariff field.
fn render_inputs<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(20),
        ])
        .split(area);

    let fields = [
        (" Name ", &app.name_input, InputMode::Name),
        (" Power (W) ", &app.wattage_input, InputMode::Wattage),
        (" Tariff /kWh ", &app.rate_input, InputMode::Rate),
    ];
    for ((title, value, mode), chunk) in fields.into_iter().zip(chunks.iter()) {
        let border = if app.mode == mode {
            Style::default().fg(style::ACTIVE_INPUT)
        } else {
            Style::default()
        };
        let widget = Paragraph::new(value.as_str()).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(widget, *chunk);
    }
}

/// Total energy and estimated cost.
fn render_summary<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let line = Line::from(format!(
        "  Total energy: {:.2} Wh   Estimated cost: {}   (at {} per kWh)",
        app.report.total_energy_wh,
        format_currency(app.report.estimated_cost, &app.currency),
        app.report.rate_per_kwh,
    ));
    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Latest feedback message.
fn render_message<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let Some(message) = &app.message else {
        return;
    };
    let line = Line::from(Span::styled(
        format!(" {}", message.text),
        Style::default().fg(style::message_color(message.kind)),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer with keybinding hints for the current mode.
fn render_footer<C: Clock>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let hints = match app.mode {
        InputMode::Normal => {
            " q:Quit  ↑/↓:Select  t:Toggle  a:Add  d:Remove  u:Undo  r:Tariff  e:Export"
        }
        InputMode::Name | InputMode::Wattage => " Enter:Next/Add  Tab:Switch field  Esc:Cancel",
        InputMode::Rate => " Enter:Apply  Esc:Cancel",
        InputMode::ConfirmRemove(_) => " y:Remove  any other key:Cancel",
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
