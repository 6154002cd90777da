use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use crate::grading::{Component, PredictionResult};
use crate::output::{approximate_letter, final_standing, format_percent, format_weight, Standing, CUTOFFS};
use crate::tui::app::{App, Field, InputMode};

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 14 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let body = Layout::horizontal([
        Constraint::Length(44), // Entry form
        Constraint::Fill(1),    // Results
    ])
    .split(chunks[1]);

    render_title(frame, chunks[0], app);
    render_form(frame, body[0], app);
    render_results(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled("Grade Calculator", Style::default().fg(app.colors.title_color).bold()),
        Span::styled(
            "  HW 5% | Discussion 10% | Midterms 20% each | Final 25%",
            Style::default().fg(app.colors.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::Score(component) => component.label(),
        Field::Target => "Target grade",
        Field::Curve => "Curve points",
        Field::DropRule => "Drop Midterm 1 if lower",
    }
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let dropped = app.current().dropped;

    let rows: Vec<Row> = Field::ALL
        .iter()
        .enumerate()
        .map(|(idx, &field)| {
            let editing = app.input_mode == InputMode::Editing && idx == app.selected;

            let (marker, marker_color) = match field {
                Field::Score(component) if dropped == Some(component) => ("[-]", colors.dropped_marker),
                Field::Score(component) if app.inputs.is_present(component) => {
                    ("[x]", colors.present_marker)
                }
                Field::Score(_) => ("[ ]", colors.missing_marker),
                Field::DropRule if app.drop_rule.is_enabled() => ("[x]", colors.present_marker),
                Field::DropRule => ("[ ]", colors.missing_marker),
                Field::Target | Field::Curve => ("   ", colors.muted),
            };

            let value_cell = if editing {
                Cell::from(format!("{}|", app.edit_buffer)).style(colors.editing)
            } else {
                match field {
                    Field::Score(component) if app.inputs.is_present(component) => {
                        Cell::from(format_percent(app.inputs[component].score))
                    }
                    Field::Score(_) => Cell::from("--").style(Style::default().fg(colors.muted)),
                    Field::Target => Cell::from(format_percent(app.target)),
                    Field::Curve => Cell::from(format!("+{}", app.curve_points)),
                    Field::DropRule => Cell::from(""),
                }
            };

            let weight = match field {
                Field::Score(component) => format_weight(component.weight()),
                _ => String::new(),
            };

            Row::new(vec![
                Cell::from(marker).style(Style::default().fg(marker_color)),
                Cell::from(field_label(field)),
                Cell::from(weight).style(Style::default().fg(colors.muted)),
                value_cell,
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),  // Marker
        Constraint::Length(23), // Label
        Constraint::Length(4),  // Weight
        Constraint::Fill(1),    // Value
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["", "Component", "Wt", "Score"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected)
        .block(Block::bordered().title(" Enter Your Grades "));

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn completion_bar(included_weight: f64, width: usize, app: &App) -> Line<'static> {
    let filled = ((included_weight.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(app.colors.bar_filled)),
        Span::styled("░".repeat(empty), Style::default().fg(app.colors.bar_empty)),
        Span::raw(format!(" {} complete", format_weight(included_weight))),
    ])
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let prediction = app.prediction();
    let current = prediction.current;
    let request = app.request();
    let heading = Style::default().fg(colors.title_color).bold();

    let mut lines = vec![Line::from(Span::styled("Current Progress", heading))];

    match current.current_average {
        Some(average) => {
            lines.push(Line::from(format!("Points earned: {}", format_percent(current.earned_points))));
            lines.push(completion_bar(current.included_weight, 20, app));
            lines.push(Line::from(vec![
                Span::raw("Current average: "),
                Span::styled(
                    format!("{} ({})", format_percent(average), approximate_letter(average)),
                    Style::default().fg(colors.grade_color(average)).bold(),
                ),
            ]));
            if let Some(component) = current.dropped {
                lines.push(Line::from(Span::styled(
                    format!("{} dropped (lower than {})", component.label(), Component::Mid2.label()),
                    Style::default().fg(colors.dropped_marker),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "Enter at least one grade to see your progress.",
            Style::default().fg(colors.muted),
        ))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Prediction", heading)));

    match prediction.outcome {
        PredictionResult::NoRemainingWork => {
            lines.push(Line::from("All grades entered. Your final grade is calculated."));
            match final_standing(&current, &request) {
                Some(Standing::Met { final_grade }) => lines.push(Line::from(Span::styled(
                    format!("{} meets your target of {}", format_percent(final_grade), format_percent(request.target)),
                    Style::default().fg(colors.grade_high),
                ))),
                Some(Standing::Below { final_grade }) => lines.push(Line::from(Span::styled(
                    format!("{} is below your target of {}", format_percent(final_grade), format_percent(request.target)),
                    Style::default().fg(colors.grade_mid),
                ))),
                None => {}
            }
        }
        PredictionResult::AlreadyMet => lines.push(Line::from(Span::styled(
            format!("Target of {} already met!", format_percent(request.target)),
            Style::default().fg(colors.grade_high).bold(),
        ))),
        PredictionResult::RequiredAverage(required) | PredictionResult::Impossible(required) => {
            lines.push(Line::from(format!("To reach {} you need:", format_percent(request.target))));
            lines.push(Line::from(Span::styled(
                format!("{} average on remaining work", format_percent(required)),
                Style::default().fg(colors.required_color(required)).bold(),
            )));
            if matches!(prediction.outcome, PredictionResult::Impossible(_)) {
                lines.push(Line::from(Span::styled(
                    "Impossible (max is 100%). Consider adjusting your target.",
                    Style::default().fg(colors.grade_low),
                )));
            }
        }
    }

    let remaining = app.remaining();
    if !remaining.is_empty() && prediction.outcome != PredictionResult::NoRemainingWork {
        let names = remaining
            .iter()
            .map(|c| format!("{} ({})", c.label(), format_weight(c.weight())))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(Span::styled(
            format!("Remaining ({}): {}", format_weight(prediction.remaining_weight), names),
            Style::default().fg(colors.muted),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Approximate Cutoffs", heading)));
    let cutoffs = CUTOFFS
        .iter()
        .map(|(min, letter)| format!("{} {:.0}%", letter, min))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(Line::from(Span::styled(
        format!("{}  F below", cutoffs),
        Style::default().fg(colors.muted),
    )));

    let results = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(" Results "));
    frame.render_widget(results, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Invalid") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.input_mode {
            InputMode::Editing => &[("Enter", ":confirm "), ("Esc", ":cancel")],
            _ => &[
                ("j/k", ":nav "),
                ("Space", ":toggle "),
                ("Enter", ":edit "),
                ("x", ":clear "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let colors = &app.colors;
    let popup_area = centered_rect_fixed(52, 13, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Space         ", "Toggle received / drop rule"),
        ("Enter / e     ", "Edit the selected value"),
        ("x             ", "Clear all grades"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Grades are kept only while the app is open.",
        Style::default().fg(colors.muted),
    )));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
