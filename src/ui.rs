pub mod screen;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::{
    app::App,
    controller::ExportOutcome,
    images::ImageStatus,
    report::summarize,
    session::{InputMode, Page},
    util::{format_bytes, format_secs},
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

// 3x5 glyphs for the countdown
const DIGITS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"],
    [" █ ", "██ ", " █ ", " █ ", "███"],
    ["███", "  █", "███", "█  ", "███"],
    ["███", "  █", "███", "  █", "███"],
    ["█ █", "█ █", "███", "  █", "  █"],
    ["███", "█  ", "███", "  █", "███"],
    ["███", "█  ", "███", "█ █", "███"],
    ["███", "  █", "  █", "  █", "  █"],
    ["███", "█ █", "███", "█ █", "███"],
    ["███", "█ █", "███", "  █", "███"],
];

fn big_number(n: u8) -> Vec<Line<'static>> {
    let digits: Vec<usize> = n
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as usize)
        .collect();
    (0..5)
        .map(|row| {
            let text = digits
                .iter()
                .map(|&d| DIGITS[d][row])
                .collect::<Vec<_>>()
                .join(" ");
            Line::from(text)
        })
        .collect()
}

fn legend_text(app: &App) -> &'static str {
    match (app.controller.page(), app.controller.input_mode()) {
        (Page::Landing, _) => "(enter) initialize / (esc)ape",
        (Page::Countdown, _) => "(h)ome / (esc)ape",
        (Page::Session, InputMode::Standard) => {
            "(n)ormal / (t)umor / (o)ther / (h)ome / (esc)ape"
        }
        (Page::Session, InputMode::Custom) => "(enter) confirm / (esc) cancel / (home) home",
        (Page::Results, _) => "(s)ave csv / (n)ew assessment / (h)ome / (esc)ape",
    }
}

/// Draws the whole frame for the current page.
pub fn draw(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // page body
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let page = app.controller.page();
    if page != Page::Landing {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("⌂ ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("RadView", Style::default().fg(Color::DarkGray)),
        ]));
        f.render_widget(header, chunks[0]);
    }

    screen::current_screen(page).render(app, f, chunks[1]);

    let legend = Paragraph::new(Span::styled(
        legend_text(app),
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(legend, chunks[2]);
}

pub(crate) fn render_landing(f: &mut Frame, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("RadView Assessment", bold.fg(Color::Cyan))),
        Line::from(Span::styled("CLINICAL DIAGNOSTIC TIMING PROTOCOL", dim)),
        Line::from("─".repeat(40)),
        Line::from(""),
        Line::from(Span::styled("Welcome, Doctor.", bold)),
        Line::from(""),
        Line::from("This session will measure your diagnostic speed and accuracy."),
        Line::from("1. A series of Radiology scans will be presented."),
        Line::from(vec![
            Span::raw("2. Assess: "),
            Span::styled("Normal", bold),
            Span::raw(", "),
            Span::styled("Tumor", bold),
            Span::raw(", or specify "),
            Span::styled("Other", bold),
            Span::raw("."),
        ]),
        Line::from("3. Timing begins immediately upon image load."),
        Line::from(""),
        Line::from(Span::styled(
            "[ Initialize Session ]",
            bold.add_modifier(Modifier::REVERSED),
        )),
    ];

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

pub(crate) fn render_countdown(app: &App, f: &mut Frame, area: Rect) {
    let Some(countdown) = app.controller.countdown() else {
        return;
    };

    let lines = big_number(countdown.remaining);
    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(lines.len() as u16),
            Constraint::Min(0),
        ])
        .split(area);

    let widget = Paragraph::new(lines)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, chunks[1]);
}

fn image_panel(app: &App) -> Paragraph<'static> {
    let title = app
        .controller
        .session()
        .current_image()
        .unwrap_or_default()
        .to_string();
    let block = Block::default().borders(Borders::ALL).title(title);

    let text = match app.image_status() {
        Some(ImageStatus::Available { path, bytes }) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "▣ scan loaded",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} ({})", path.display(), format_bytes(*bytes))),
        ],
        Some(ImageStatus::Missing { path }) => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("File {} not found (Demo Mode)", path.display()),
                Style::default().fg(Color::Yellow),
            )),
        ],
        Some(ImageStatus::Unreadable { reason, .. }) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Error loading image.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                reason.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        None => vec![],
    };

    Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

pub(crate) fn render_session(app: &App, f: &mut Frame, area: Rect) {
    let session = app.controller.session();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // progress
            Constraint::Length(1), // case caption
            Constraint::Min(3),    // image
            Constraint::Length(5), // interaction
        ])
        .split(area);

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(session.progress().clamp(0.0, 1.0))
        .label("");
    f.render_widget(progress, chunks[0]);

    let caption = Paragraph::new(Span::styled(
        format!("Case {} / {}", session.cursor + 1, session.total_cases()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(caption, chunks[1]);

    f.render_widget(image_panel(app), chunks[2]);

    match session.input_mode {
        InputMode::Standard => {
            let buttons = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(chunks[3]);

            for (label, rect) in ["(n) Normal", "(t) Tumor", "(o) Other..."]
                .into_iter()
                .zip(buttons.iter())
            {
                let button = Paragraph::new(Line::from(""))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(label)
                            .title_alignment(Alignment::Center),
                    )
                    .alignment(Alignment::Center);
                f.render_widget(button, *rect);
            }
        }
        InputMode::Custom => {
            let draft = if app.draft.is_empty() {
                Span::styled(
                    "e.g. Benign, Cyst, Artifact...",
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::styled(
                    format!("{}▏", app.draft),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            };
            let form = Paragraph::new(vec![
                Line::from(draft),
                Line::from(""),
                Line::from(Span::styled(
                    "(enter) Confirm Diagnosis   (esc) Cancel / Back",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Specify Diagnosis:"),
            );
            f.render_widget(form, chunks[3]);
        }
    }
}

pub(crate) fn render_results(app: &App, f: &mut Frame, area: Rect) {
    let results = &app.controller.session().results;
    let summary = app
        .controller
        .summary()
        .copied()
        .unwrap_or_else(|| summarize(results));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(3), // metrics
            Constraint::Min(3),    // table
            Constraint::Length(1), // export status
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "Analysis Complete",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    match summary.mean_secs {
        Some(mean) if summary.has_data() => {
            let metrics = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .split(chunks[1]);
            let metric = |name: &'static str, value: String| {
                Paragraph::new(Span::styled(
                    value,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .block(Block::default().borders(Borders::ALL).title(name))
                .alignment(Alignment::Center)
            };
            f.render_widget(metric("Cases", summary.cases.to_string()), metrics[0]);
            f.render_widget(metric("Avg Speed", format_secs(mean)), metrics[1]);

            let header = Row::new(vec![
                Cell::from("Image_ID"),
                Cell::from("Diagnosis"),
                Cell::from("Time_Seconds"),
                Cell::from("Timestamp"),
            ])
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

            let rows: Vec<Row> = results
                .iter()
                .map(|r| {
                    Row::new(vec![
                        Cell::from(r.image_id.clone()),
                        Cell::from(r.diagnosis.clone()),
                        Cell::from(format!("{:.3}", r.elapsed_secs)),
                        Cell::from(r.timestamp.format("%H:%M:%S").to_string()),
                    ])
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(16),
                    Constraint::Min(14),
                    Constraint::Length(14),
                    Constraint::Length(10),
                ],
            )
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Cases"));
            f.render_widget(table, chunks[2]);
        }
        _ => {
            let no_data = Paragraph::new("No data recorded.\nStart a new assessment to try again.")
                .block(Block::default().borders(Borders::ALL).title("No Data"))
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center);
            f.render_widget(no_data, chunks[2]);
        }
    }

    let status = match app.controller.last_export() {
        Some(ExportOutcome::Saved(path)) => Span::styled(
            format!("Saved to {}", path.display()),
            Style::default().fg(Color::Green),
        ),
        Some(ExportOutcome::Failed(reason)) => Span::styled(
            format!("Export failed: {}", reason),
            Style::default().fg(Color::Red),
        ),
        None => Span::raw(""),
    };
    f.render_widget(Paragraph::new(status), chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pacing;
    use crate::controller::{Action, Controller};
    use crate::deck::DeckProvider;
    use crate::images::DirImageSource;
    use crate::session::Label;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;
    use tempfile::tempdir;

    fn app_in(dir: &std::path::Path, images: &[&str]) -> App {
        let controller = Controller::new(
            DeckProvider::new(images.iter().copied()),
            Pacing::immediate(),
        )
        .with_export_dir(dir);
        App::new(controller, Box::new(DirImageSource::new(dir)))
    }

    fn start(app: &mut App) {
        let now = Instant::now();
        app.controller.dispatch(Action::Initialize, now);
        while app.controller.page() == Page::Countdown {
            app.on_tick(now);
        }
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn landing_renders_protocol() {
        let dir = tempdir().unwrap();
        let app = app_in(dir.path(), &["a.jpg"]);
        let content = render(&app);
        assert!(content.contains("RadView Assessment"));
        assert!(content.contains("CLINICAL DIAGNOSTIC TIMING PROTOCOL"));
        assert!(content.contains("Initialize Session"));
    }

    #[test]
    fn countdown_renders_digit() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path(), &["a.jpg"]);
        app.controller.dispatch(Action::Initialize, Instant::now());
        let content = render(&app);
        assert!(content.contains("███"));
    }

    #[test]
    fn big_number_is_five_rows() {
        assert_eq!(big_number(3).len(), 5);
        assert_eq!(big_number(12)[0].to_string(), " █  ███");
    }

    #[test]
    fn session_warns_on_missing_image() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path(), &["pt1.jpg"]);
        start(&mut app);
        let content = render(&app);
        assert!(content.contains("Case 1 / 1"));
        assert!(content.contains("not found (Demo Mode)"));
        assert!(content.contains("(t) Tumor"));
    }

    #[test]
    fn session_shows_available_image() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pt1.jpg"), [0u8; 10]).unwrap();
        let mut app = app_in(dir.path(), &["pt1.jpg"]);
        start(&mut app);
        let content = render(&app);
        assert!(content.contains("scan loaded"));
        assert!(content.contains("10 B"));
    }

    #[test]
    fn custom_mode_shows_form() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path(), &["pt1.jpg"]);
        start(&mut app);
        app.controller.dispatch(Action::OpenCustom, Instant::now());
        let content = render(&app);
        assert!(content.contains("Specify Diagnosis:"));
        assert!(content.contains("e.g. Benign, Cyst, Artifact..."));
    }

    #[test]
    fn results_render_table_and_metrics() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path(), &["pt1.jpg", "nt1.jpg"]);
        start(&mut app);
        let now = Instant::now();
        app.controller.dispatch(Action::Choose(Label::Normal), now);
        app.controller.dispatch(Action::Choose(Label::Tumor), now);
        app.controller.dispatch(Action::Export, now);

        let content = render(&app);
        assert!(content.contains("Analysis Complete"));
        assert!(content.contains("Avg Speed"));
        assert!(content.contains("Image_ID"));
        assert!(content.contains("Tumor"));
        assert!(content.contains("Saved to"));
    }

    #[test]
    fn empty_results_render_no_data() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path(), &[]);
        start(&mut app);
        assert_eq!(app.controller.page(), Page::Results);
        let content = render(&app);
        assert!(content.contains("No data recorded."));
        assert!(!content.contains("Avg Speed"));
    }
}
