use crate::output::format_grade;
use crate::scoring::single_course_lift;
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Tab bar
        Constraint::Fill(1),   // Course table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::CourseInput => render_course_input_popup(frame, app),
        InputMode::Help => render_help_popup(frame),
        InputMode::PlanView => render_plan_popup(frame, app),
        InputMode::Normal => {}
    }

    // Render the spinner while the pass/fail search runs (on top of everything)
    if app.is_planning {
        render_planning_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    // Build title with the overall average on the right
    let mut spans = vec![Span::styled(
        "GPA Bro",
        Style::default().fg(theme::TITLE_COLOR).bold(),
    )];

    if !app.ledger.is_empty() {
        let average_text = format!("Overall: {}", format_grade(app.overall_average()));
        let left_len = "GPA Bro".len();
        let right_len = average_text.len();
        let padding_len = (area.width as usize).saturating_sub(left_len + right_len);

        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(
            average_text,
            Style::default().fg(theme::MUTED),
        ));
    }

    let title = Line::from(spans);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles = vec!["Current", "Past"];
    let selected = match app.current_view {
        View::Current => 0,
        View::Past => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme::MUTED))
        .highlight_style(Style::default().fg(theme::TITLE_COLOR).bold().reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let courses = app.visible_courses();

    if courses.is_empty() {
        let empty_msg = Paragraph::new("No courses here yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    // Lift is computed over the whole ledger, not just the visible term
    let all_courses = app.ledger.courses.clone();

    // Build rows
    let rows: Vec<Row> = courses
        .iter()
        .enumerate()
        .map(|(idx, course)| {
            let index = format!("{}.", idx + 1);
            let grade_str = format!("{:>6}", format_grade(course.grade));
            let bar_line = grade_bar(course.grade, 8);

            // Build grade cell with colored text and bar
            let grade_clr = theme::grade_color(course.grade);
            let mut grade_spans = vec![Span::styled(
                format!("{} ", grade_str),
                Style::default().fg(grade_clr),
            )];
            grade_spans.extend(bar_line.spans);
            let grade_line = Line::from(grade_spans);

            let credits = format!("{:>4}", format_grade(course.credits));
            let lift = single_course_lift(course, &all_courses);
            let lift_str = format!("{:>7}", format!("+{}", format_grade(lift)));

            let name = truncate_name(&course.name, 60);

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme::ROW_ALT_BG)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(theme::INDEX_COLOR)),
                Cell::from(grade_line),
                Cell::from(credits),
                Cell::from(lift_str).style(Style::default().fg(theme::MUTED)),
                Cell::from(name),
            ])
            .style(row_style)
        })
        .collect();

    // Column widths
    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(16), // Grade + bar: " 81.25 ██████░░"
        Constraint::Length(5),  // Credits
        Constraint::Length(8),  // Lift: "  +12.5"
        Constraint::Fill(1),    // Name
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Grade", "Cr", "Lift", "Course"])
                .style(theme::HEADER_STYLE)
                .bottom_margin(1),
        )
        .row_highlight_style(theme::ROW_SELECTED);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Invalid") {
            theme::FLASH_ERROR
        } else if msg.starts_with("Added:")
            || msg.starts_with("Updated:")
            || msg.starts_with("Removed:")
            || msg.starts_with("Undid")
        {
            theme::FLASH_SUCCESS
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        // Show normal status
        let count = format!("{} courses", app.visible_courses().len());

        let view_mode = match app.current_view {
            View::Current => "Current",
            View::Past => "Past",
        };

        // Build hints with colored shortcut keys
        let mut hint_spans = Vec::new();
        let hints = match app.current_view {
            View::Current => vec![
                ("j", "/", "k", ":nav "),
                ("a", "", "", ":add "),
                ("e", "", "", ":edit "),
                ("d", "", "", ":delete "),
                ("p", "", "", ":plan "),
                ("Tab", "", "", ":past "),
                ("?", "", "", ":help "),
                ("q", "", "", ":quit"),
            ],
            View::Past => vec![
                ("j", "/", "k", ":nav "),
                ("a", "", "", ":add "),
                ("e", "", "", ":edit "),
                ("d", "", "", ":delete "),
                ("p", "", "", ":plan "),
                ("Tab", "", "", ":current "),
                ("?", "", "", ":help "),
                ("q", "", "", ":quit"),
            ],
        };

        for (i, (key1, sep, key2, label)) in hints.iter().enumerate() {
            if i > 0 {
                hint_spans.push(Span::raw(" "));
            }
            hint_spans.push(Span::styled(
                *key1,
                Style::default().fg(theme::STATUS_KEY_COLOR),
            ));
            if !sep.is_empty() {
                hint_spans.push(Span::raw(*sep));
                hint_spans.push(Span::styled(
                    *key2,
                    Style::default().fg(theme::STATUS_KEY_COLOR),
                ));
            }
            hint_spans.push(Span::raw(*label));
        }

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme::MUTED)),
            Span::raw(" "),
            Span::styled(view_mode, Style::default().fg(theme::MUTED)),
            Span::raw("  "),
        ];
        spans.extend(hint_spans);
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme::STATUS_BAR_BG)),
        area,
    );
}

/// Fixed-scale bar for a 0-100 grade
fn grade_bar(grade: f64, width: usize) -> Line<'static> {
    let ratio = (grade / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_color = theme::grade_color(grade);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(bar_color),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme::BAR_EMPTY),
        ));
    }

    Line::from(spans)
}

fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Render the course input popup (add or edit)
fn render_course_input_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(46, 5, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let title = if app.editing_id.is_some() {
        "Edit Course"
    } else {
        "Add Course"
    };
    let block = Block::bordered().title(title);
    frame.render_widget(block.clone(), popup_area);

    // Get inner area (inside the border)
    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Input line
        Constraint::Length(1), // Help text
    ])
    .split(inner);

    // Render input with cursor
    let input_text = format!("{}|", app.course_input);
    let input = Paragraph::new(input_text);
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("name grade credits, e.g. 'Calculus 87 5'")
        .style(Style::default().fg(theme::MUTED));
    frame.render_widget(help, chunks[1]);
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
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

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame) {
    let popup_area = centered_rect_fixed(54, 16, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(Color::Cyan).bold();
    let help_lines = vec![
        Line::from(vec![
            Span::styled("j / Down      ", key_style),
            Span::raw("Move down"),
        ]),
        Line::from(vec![
            Span::styled("k / Up        ", key_style),
            Span::raw("Move up"),
        ]),
        Line::from(vec![
            Span::styled("a             ", key_style),
            Span::raw("Add a course to this term"),
        ]),
        Line::from(vec![
            Span::styled("e / Enter     ", key_style),
            Span::raw("Edit the selected course"),
        ]),
        Line::from(vec![
            Span::styled("d             ", key_style),
            Span::raw("Delete the selected course"),
        ]),
        Line::from(vec![
            Span::styled("z             ", key_style),
            Span::raw("Undo last add/edit/delete"),
        ]),
        Line::from(vec![
            Span::styled("Tab           ", key_style),
            Span::raw("Toggle Current/Past term"),
        ]),
        Line::from(vec![
            Span::styled("p             ", key_style),
            Span::raw("Find the best pass/fail plan"),
        ]),
        Line::from(vec![
            Span::styled("?             ", key_style),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("q / Ctrl-c    ", key_style),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(theme::MUTED),
        )),
    ];

    let help_text = Paragraph::new(help_lines);
    frame.render_widget(help_text, inner);
}

/// Render the pass/fail plan result popup
fn render_plan_popup(frame: &mut Frame, app: &App) {
    let plan = match &app.plan {
        Some(plan) => plan,
        None => return,
    };

    let height = (7 + plan.converted.len() as u16).min(frame.area().height);
    let popup_area = centered_rect_fixed(56, height, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Pass/Fail Plan ");
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let mut lines = vec![Line::from(vec![
        Span::raw("Current average: "),
        Span::styled(format_grade(plan.baseline), Style::default().bold()),
    ])];

    if plan.converted.is_empty() {
        lines.push(Line::from(
            "No conversion beats keeping everything numeric.",
        ));
    } else {
        lines.push(Line::from(vec![
            Span::raw("With conversions: "),
            Span::styled(
                format_grade(plan.best_average),
                Style::default().fg(theme::FLASH_SUCCESS).bold(),
            ),
            Span::styled(
                format!(" (+{})", format_grade(plan.gain())),
                Style::default().fg(theme::FLASH_SUCCESS),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from("Convert to pass/fail:"));
        for course in &plan.converted {
            lines.push(Line::from(format!(
                "  - {} (grade {}, {} cr)",
                truncate_name(&course.name, 34),
                format_grade(course.grade),
                format_grade(course.credits)
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc or p to close",
        Style::default().fg(theme::MUTED),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the spinner shown while the pass/fail search runs
fn render_planning_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % 10];

    let text = format!("{} Searching plans...", spinner);

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(loading_text, inner);
}
