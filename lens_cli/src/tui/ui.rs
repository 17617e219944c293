//! Rendering of the viewer's view model.

use lens_core::carousel::PageControls;
use lens_core::scoring::{Rgb, Tint};
use lens_core::slide::{ArticleView, SlideView, SummaryView};
use lens_core::viewer::CarouselView;
use lens_core::ViewerView;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;

/// Assumed terminal background when blending tints.
const BACKGROUND: Rgb = Rgb::new(24, 24, 27);

const KEY_HINTS: &str =
    "←/→ page  Tab focus  ↑/↓ summary  Enter select  c compare  a relevance  j/k/e article  f fullscreen  q quit";

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    let view = match app.viewer.view() {
        ViewerView::Carousel(view) => view,
        ViewerView::Empty => {
            app.overlay_area = None;
            render_header(frame, header, None);
            let empty = Paragraph::new("No results to display. Pass a result file or --demo.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, body);
            render_footer(frame, footer, None, app.status.as_deref());
            return;
        }
    };

    render_header(frame, header, Some(&view));
    render_slides(frame, body, &view, app);
    render_footer(frame, footer, view.controls.as_ref(), app.status.as_deref());

    app.overlay_area = None;
    if let Some(target) = view.fullscreen.as_deref() {
        if let Some(slide) = view.slides.iter().find(|s| s.attribute == target) {
            let area = centered_rect(90, 90, body);
            frame.render_widget(Clear, area);
            render_slide(frame, area, slide, app, true);
            app.overlay_area = Some(area);
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, view: Option<&CarouselView>) {
    let mut spans = vec![Span::styled("factlens", Style::default().fg(Color::Cyan).bold())];
    if let Some(view) = view {
        spans.push(Span::raw(format!(
            "  page {}/{}",
            view.page.current_page + 1,
            view.page.total_pages
        )));
        if view.page.is_transitioning {
            spans.push(Span::styled("  …", Style::default().fg(Color::DarkGray)));
        }
        if let Some(source) = &view.comparison_source {
            spans.push(Span::styled(
                format!("  comparing from {}", source),
                Style::default().fg(Color::LightRed),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_slides(frame: &mut Frame, area: Rect, view: &CarouselView, app: &App) {
    let count = view.slides.len().max(1) as u32;
    let columns = Layout::horizontal(vec![Constraint::Ratio(1, count); count as usize]).split(area);
    for (index, (slide, column)) in view.slides.iter().zip(columns.iter()).enumerate() {
        let focused = index == app.focus && view.fullscreen.is_none();
        render_slide(frame, *column, slide, app, focused);
    }
}

fn render_slide(frame: &mut Frame, area: Rect, slide: &SlideView, app: &App, focused: bool) {
    let mut title = format!(" {} ", slide.attribute);
    if slide.is_comparison_source {
        title.push_str("[source] ");
    }
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .title_bottom(Line::from(format!(" f: {} ", slide.fullscreen_label())).right_aligned());

    let mut lines = Vec::new();
    if let Some(banner) = &slide.banner {
        lines.push(Line::styled(banner.clone(), Style::default().fg(Color::LightRed).italic()));
        lines.push(Line::default());
    }

    lines.push(Line::styled("Summaries", Style::default().bold().underlined()));
    for (index, summary) in slide.summaries.iter().enumerate() {
        let cursor = focused && index == app.summary_cursor;
        lines.extend(summary_lines(summary, cursor));
    }

    lines.push(Line::default());
    lines.push(Line::styled("Articles", Style::default().bold().underlined()));
    for (index, article) in slide.articles.iter().enumerate() {
        let cursor = focused && index == app.article_cursor;
        lines.extend(article_lines(article, cursor));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn summary_lines(summary: &SummaryView, cursor: bool) -> Vec<Line<'static>> {
    let marker = match (cursor, summary.selected) {
        (true, true) => "▶● ",
        (true, false) => "▶  ",
        (false, true) => " ● ",
        (false, false) => "   ",
    };
    let mut text_style = tint_style(summary.tint.as_ref());
    if summary.selected {
        text_style = text_style.bold();
    }

    let mut lines = vec![Line::from(vec![
        Span::raw(marker),
        Span::styled(summary.text.clone(), text_style),
    ])];

    let meta: Vec<&str> = [
        summary.relevance_label.as_deref(),
        summary.confidence_label.as_deref(),
        summary.sources_label.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !meta.is_empty() {
        lines.push(Line::styled(
            format!("   {}", meta.join("  ")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(actions) = summary.actions {
        let relevance = toggle_span("a Article relevance", actions.article_relevance_active, true);
        let compare = toggle_span(
            "c Cross-aspect comparison",
            actions.cross_comparison_active,
            actions.cross_comparison_enabled,
        );
        lines.push(Line::from(vec![Span::raw("   "), relevance, Span::raw("  "), compare]));
    }
    lines
}

fn article_lines(article: &ArticleView, cursor: bool) -> Vec<Line<'static>> {
    let marker = if cursor { "▶ " } else { "  " };
    let mut title = vec![
        Span::raw(marker),
        Span::styled(article.title.clone(), tint_style(article.tint.as_ref()).bold()),
    ];
    if let Some(label) = &article.relevance_label {
        title.push(Span::styled(format!("  {}", label), Style::default().fg(Color::DarkGray)));
    }

    let mut body = article.text.clone();
    if article.truncated {
        body.push_str("...");
    }
    let mut lines = vec![Line::from(title), Line::raw(format!("  {}", body))];

    let mut footer = Vec::new();
    if let Some(label) = article.expand_label() {
        footer.push(Span::styled(format!("  [e] {}", label), Style::default().fg(Color::Cyan)));
    }
    if let Some(url) = &article.url {
        footer.push(Span::styled(format!("  {}", url), Style::default().fg(Color::Blue).underlined()));
    }
    if !footer.is_empty() {
        lines.push(Line::from(footer));
    }
    lines
}

fn render_footer(frame: &mut Frame, area: Rect, controls: Option<&PageControls>, status: Option<&str>) {
    let mut nav = Vec::new();
    if let Some(controls) = controls {
        nav.push(enabled_span("◀ ", controls.previous_enabled));
        for dot in &controls.dots {
            let symbol = if dot.active { "● " } else { "○ " };
            nav.push(enabled_span(symbol, dot.enabled));
        }
        nav.push(enabled_span("▶", controls.next_enabled));
        nav.push(Span::raw("   "));
    }
    if let Some(status) = status {
        nav.push(Span::styled(status.to_string(), Style::default().fg(Color::Green)));
    }

    let lines = vec![
        Line::from(nav),
        Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn tint_style(tint: Option<&Tint>) -> Style {
    match tint {
        Some(tint) => {
            let blended = tint.color.over(BACKGROUND, tint.opacity);
            Style::default()
                .bg(Color::Rgb(blended.r, blended.g, blended.b))
                .fg(Color::White)
        }
        None => Style::default(),
    }
}

fn toggle_span(label: &'static str, active: bool, enabled: bool) -> Span<'static> {
    let style = match (enabled, active) {
        (false, _) => Style::default().fg(Color::DarkGray).crossed_out(),
        (true, true) => Style::default().fg(Color::Black).bg(Color::Cyan),
        (true, false) => Style::default().fg(Color::Cyan),
    };
    Span::styled(format!("[{}]", label), style)
}

fn enabled_span(symbol: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::raw(symbol)
    } else {
        Span::styled(symbol, Style::default().fg(Color::DarkGray))
    }
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
