use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, PageStatus};
use crate::transform::{PageView, TITLES};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

const WIDTHS: [Constraint; 8] = [
    Constraint::Length(11),
    Constraint::Length(16),
    Constraint::Length(16),
    Constraint::Length(16),
    Constraint::Length(13),
    Constraint::Length(9),
    Constraint::Length(15),
    Constraint::Length(15),
];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_controls(f, chunks[0], app);
    draw_table(f, chunks[1], app.view());
    draw_chart(f, chunks[2], app.view());
    draw_status(f, chunks[3], app.status());
}

fn control(label: &str, enabled: bool) -> Span<'_> {
    let style = if enabled {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(label, style)
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let pager = app.pager();
    let (start, stop) = pager.range();
    let line = Line::from(vec![
        control("[< prev]", pager.prev_enabled()),
        Span::raw("  page size: "),
        Span::styled(
            format!("{}_", app.step_input()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        control("[next >]", pager.next_enabled()),
        Span::styled(
            format!("   results {}..{}", start, stop),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let controls = Paragraph::new(line).block(Block::default().title(" Navigation ").borders(Borders::ALL));
    f.render_widget(controls, area);
}

fn draw_table(f: &mut Frame, area: Rect, view: &PageView) {
    let header = Row::new(TITLES.iter().map(|t| Cell::from(*t)))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows = view.rows.iter().map(|row| {
        let style = if row.is_odd() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(row.cells.iter().map(|c| Cell::from(c.as_str())))
            .height(2)
            .style(style)
    });

    let table = Table::new(rows, WIDTHS)
        .header(header)
        .block(Block::default().title(" Results ").borders(Borders::ALL));
    f.render_widget(table, area);
}

fn draw_chart(f: &mut Frame, area: Rect, view: &PageView) {
    let series_count = view.series.len().max(1);

    // Points with unreadable values are left out of the plot only.
    let plotted: Vec<(String, Vec<(f64, f64)>)> = view
        .datasets()
        .into_iter()
        .map(|(name, points)| {
            let points = points
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();
            (name, points)
        })
        .collect();

    let datasets: Vec<Dataset> = plotted
        .iter()
        .enumerate()
        .map(|(i, (name, points))| {
            let marker = if i < series_count {
                symbols::Marker::Braille
            } else {
                symbols::Marker::Dot
            };
            Dataset::default()
                .name(name.as_str())
                .graph_type(GraphType::Line)
                .marker(marker)
                .style(Style::default().fg(PALETTE[(i % series_count) % PALETTE.len()]))
                .data(points)
        })
        .collect();

    let (x_min, x_max) = x_bounds(&plotted);
    let y_max = plotted
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, y)| *y))
        .fold(0.0f64, f64::max);
    let y_max = (y_max * 1.1).max(1.0);

    // ticks run last record first, so the oldest label comes first
    let x_labels: Vec<Span> = match (view.ticks.first(), view.ticks.last()) {
        (Some((_, oldest)), Some((_, newest))) => vec![
            Span::raw(oldest.replace('\n', " ")),
            Span::raw(newest.replace('\n', " ")),
        ],
        _ => Vec::new(),
    };

    let chart = Chart::new(datasets)
        .block(Block::default().title(" Download and Upload Rate ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Mbit/s")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.1}", y_max / 2.0)),
                    Span::raw(format!("{:.1}", y_max)),
                ]),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(chart, area);
}

fn x_bounds(plotted: &[(String, Vec<(f64, f64)>)]) -> (f64, f64) {
    let xs = plotted
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(x, _)| *x));
    let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    if !lo.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

fn draw_status(f: &mut Frame, area: Rect, status: &PageStatus) {
    let (text, color) = match status {
        PageStatus::Loading(w) => (format!("loading results {}..{}", w.start, w.stop), Color::Yellow),
        PageStatus::Ready => ("ready".to_string(), Color::Green),
        PageStatus::EndOfResults => ("no more results".to_string(), Color::Yellow),
        PageStatus::FetchFailed(e) => (format!("fetch failed: {e}"), Color::Red),
        PageStatus::Malformed(e) => (format!("bad response: {e}"), Color::Red),
        PageStatus::InvalidStep => ("page size must be a positive number".to_string(), Color::Red),
    };
    let help = "  ←/→ page  0-9 size  enter apply  r reload  q quit";
    let line = Line::from(vec![
        Span::styled(text, Style::default().fg(color)),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Tab-separated table plus a per-address summary, for `--print`.
pub fn plain_text(view: &PageView) -> String {
    let mut out = String::new();
    out.push_str(&TITLES.join("\t"));
    out.push('\n');
    for row in &view.rows {
        let cells: Vec<String> = row.cells.iter().map(|c| c.replace('\n', " ")).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }

    out.push('\n');
    for series in &view.series {
        out.push_str(&format!(
            "{}: {} samples, {} / {}\n",
            series.address,
            series.download.len(),
            series.download_label(),
            series.upload_label()
        ));
    }
    if view.returned_upper != view.window.stop {
        out.push_str(&format!("(end of results at {})\n", view.returned_upper));
    }
    out
}
