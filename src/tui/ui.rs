use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap};

use crate::catalog::Category;
use crate::output::{format_result, truncate_name};
use crate::tui::app::{App, InputMode, Screen};
use crate::tui::theme::{goodness, ThemeColors};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Heading(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    match app.current_screen() {
        Screen::Home => {
            render_heading(frame, chunks[1], "Choose a category", &app.theme);
            render_home(frame, chunks[2], app);
        }
        Screen::Category(category) => {
            render_heading(frame, chunks[1], category.heading(), &app.theme);
            render_table(frame, chunks[2], app);
        }
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }

    // Loading overlay appears on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "Eco Catalog",
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let crumbs: Vec<&str> = app
        .screens
        .iter()
        .skip(1)
        .filter_map(|s| match s {
            Screen::Category(c) => Some(c.label()),
            Screen::Home => None,
        })
        .collect();
    if !crumbs.is_empty() {
        spans.push(Span::styled(
            format!(" > {}", crumbs.join(" > ")),
            Style::default().fg(app.theme.muted),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_heading(frame: &mut Frame, area: Rect, text: &str, theme: &ThemeColors) {
    let heading = Paragraph::new(text.to_string()).style(theme.header_style);
    frame.render_widget(heading, area);
}

fn render_home(frame: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = Category::ALL
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}. ", idx + 1),
                    Style::default().fg(app.theme.index_color),
                ),
                Span::raw(category.label()),
                Span::styled(
                    format!("  ({})", category.table()),
                    Style::default().fg(app.theme.muted),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(app.theme.row_selected);

    frame.render_stateful_widget(list, area, &mut app.home_state);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let products = &app.products;
    let theme = &app.theme;

    if products.is_empty() {
        let msg = if app.is_loading {
            ""
        } else {
            "No products found"
        };
        let empty_msg = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    // Largest computed score, used to read lower-is-better lists
    let worst = products
        .iter()
        .filter(|(_, r)| r.sentinel.is_none())
        .map(|(_, r)| r.score)
        .fold(0.0_f64, f64::max);

    let rows: Vec<Row> = products
        .iter()
        .enumerate()
        .map(|(idx, (product, result))| {
            let g = goodness(result, worst);
            let color = theme.score_color(g);

            let mut score_spans = vec![Span::styled(
                format!("{:>9} ", format_result(result)),
                Style::default().fg(color),
            )];
            score_spans.extend(score_bar(g, 8, color, theme).spans);

            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(truncate_name(product.display_name(), 60)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // "99."
        Constraint::Length(19), // "9999.00* ████░░░░"
        Constraint::Fill(1),
    ];

    let direction = products[0].1.direction.describe();
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                "#".to_string(),
                format!("Score ({})", direction),
                "Name".to_string(),
            ])
            .style(theme.header_style)
            .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

/// Filled portion shows goodness; sentinel rows get a flagged marker instead
fn score_bar(goodness: Option<f64>, width: usize, color: Color, theme: &ThemeColors) -> Line<'static> {
    let ratio = match goodness {
        Some(g) => g,
        None => return Line::from(Span::styled("!", Style::default().fg(color))),
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }
    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") || msg.contains("cancelled") {
            theme.flash_error
        } else if msg.starts_with("Loaded") || msg.starts_with("Opened:") || msg.starts_with("Re-authenticated") {
            theme.flash_success
        } else {
            theme.flash_default
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let mut spans = Vec::new();
        let hints: &[(&str, &str)] = match app.current_screen() {
            Screen::Home => &[("j/k", ":nav "), ("Enter", ":open "), ("?", ":help "), ("q", ":quit")],
            Screen::Category(_) => {
                spans.push(Span::styled(
                    format!("{} products", app.products.len()),
                    Style::default().fg(theme.muted),
                ));
                if let Some(at) = app.last_refresh {
                    let elapsed = at.elapsed().as_secs();
                    let ago = if elapsed < 60 {
                        format!(" loaded {}s ago", elapsed)
                    } else {
                        format!(" loaded {}m ago", elapsed / 60)
                    };
                    spans.push(Span::styled(ago, Style::default().fg(theme.muted)));
                }
                spans.push(Span::raw("  "));
                &[
                    ("j/k", ":nav "),
                    ("Enter", ":buy "),
                    ("b", ":breakdown "),
                    ("r", ":refresh "),
                    ("Esc", ":back "),
                    ("?", ":help "),
                    ("q", ":quit"),
                ]
            }
        };

        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
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

fn popup_block(title: &str, theme: &ThemeColors) -> Block<'static> {
    Block::bordered()
        .title(Span::styled(format!(" {} ", title), theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg))
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 15, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block("Keyboard Shortcuts", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Enter         ", "Open category / buy from others"),
        ("o             ", "Buy from others"),
        ("b             ", "Score breakdown"),
        ("r             ", "Reload this list"),
        ("Esc / Bksp    ", "Back"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "A * after a score means some fields were missing",
        Style::default().fg(theme.muted),
    )));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let (product, result) = match (app.selected_product(), app.selected_score_result()) {
        (Some(p), Some(r)) => (p, r),
        _ => return,
    };
    let theme = &app.theme;

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Score: ", Style::default().bold()),
            Span::raw(format_result(result)),
            Span::styled(
                format!("  ({})", result.direction.describe()),
                Style::default().fg(theme.muted),
            ),
        ]),
    ];
    if let Some(sentinel) = result.sentinel {
        lines.push(Line::from(Span::styled(
            format!("Flag: {}", sentinel.describe()),
            Style::default().fg(theme.score_flagged),
        )));
    }
    lines.push(Line::from(""));
    for factor in &result.breakdown {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", factor.label), Style::default().bold()),
            Span::raw(factor.description.clone()),
            Span::styled(
                format!(" = {:.2}", factor.value),
                Style::default().fg(theme.status_key_color),
            ),
        ]));
    }
    if result.incomplete() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Defaulted: {}", result.defaulted.join(", ")),
            Style::default().fg(theme.muted),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/b: close  j/k: next product",
        Style::default().fg(theme.muted),
    )));

    let height = (lines.len() as u16 + 2).min(frame.area().height);
    let popup_area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(&truncate_name(product.display_name(), 50), theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    let text = format!("{} Loading products...", spinner);

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));
    frame.render_widget(loading_text, inner);
}
