use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Block, Cell, Chart, Clear, Dataset, GraphType, LegendPosition, Paragraph, Row,
        Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState,
    },
};

use crate::model::{ChartData, ColumnView, Modus, UIData};

pub const CMDLINE_HEIGH: usize = 2;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const SCROLLBAR_WIDTH: usize = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 1;

const HEADER_STYLE: Style = Style::new().fg(Color::Yellow);
const INDEX_STYLE: Style = Style::new().fg(Color::DarkGray);
const STATUS_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&self, uidata: &UIData, frame: &mut Frame) {
        let [main_area, status_area, cmd_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let show_chart = uidata.modus == Modus::CHART || uidata.chart != ChartData::default();
        if uidata.ncols == 0 {
            self.draw_empty(main_area, frame);
        } else if show_chart {
            self.draw_chart(&uidata.chart, main_area, frame);
        } else {
            self.draw_table(uidata, main_area, frame);
        }
        self.draw_status_line(uidata, status_area, frame);
        self.draw_cmd_line(uidata, cmd_area, frame);

        if uidata.show_popup {
            self.draw_popup(&uidata.popup_message, frame);
        }
    }

    fn draw_empty(&self, area: Rect, frame: &mut Frame) {
        let [center] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        let text = Line::from(vec![
            "No table loaded. Press ".into(),
            "o".blue().bold(),
            " to open a csv file.".into(),
        ]);
        frame.render_widget(Paragraph::new(text).centered(), center);
    }

    fn draw_table(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        let [index_area, _, table_area, scrollbar_area] = Layout::horizontal([
            Constraint::Length(uidata.layout.index_width as u16),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(SCROLLBAR_WIDTH as u16),
        ])
        .areas(area);

        frame.render_widget(Self::index_table(&uidata.index, uidata.selected_row), index_area);

        let header_style = HEADER_STYLE.add_modifier(Modifier::BOLD);
        let header = Row::new(
            uidata
                .table
                .iter()
                .map(|c| Cell::from(c.name.as_str()).style(header_style)),
        );
        let nrows = uidata.table.first().map(|c| c.data.len()).unwrap_or(0);
        let rows = (0..nrows).map(|ridx| {
            Row::new(
                uidata
                    .table
                    .iter()
                    .map(|c| Cell::from(c.data[ridx].as_str())),
            )
        });
        let widths = uidata
            .table
            .iter()
            .map(|c| Constraint::Length(c.width as u16));

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::new().bg(Color::Rgb(40, 40, 40)))
            .cell_highlight_style(Style::new().add_modifier(Modifier::REVERSED));
        let mut state = TableState::default()
            .with_selected(Some(uidata.selected_row))
            .with_selected_column(Some(uidata.selected_column));
        frame.render_stateful_widget(table, table_area, &mut state);

        let mut scrollbar_state =
            ScrollbarState::new(uidata.nrows).position(uidata.abs_selected_row);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }

    fn index_table(index: &ColumnView, selected_row: usize) -> Table<'_> {
        let rows = index.data.iter().enumerate().map(|(ridx, i)| {
            let style = if ridx == selected_row {
                INDEX_STYLE.fg(Color::White)
            } else {
                INDEX_STYLE
            };
            Row::new([Cell::from(Text::from(i.as_str()).right_aligned())]).style(style)
        });
        Table::new(rows, [Constraint::Fill(1)])
            .header(Row::new([Cell::from(index.name.as_str())]).style(INDEX_STYLE))
    }

    fn draw_chart(&self, chart: &ChartData, area: Rect, frame: &mut Frame) {
        let title = Line::from(format!(" {} over {} ", chart.y_name, chart.x_name).bold());
        let block = Block::bordered()
            .title(title.centered())
            .border_set(symbols::border::ROUNDED);

        if let Some(notice) = &chart.notice {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let [center] = Layout::vertical([Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(inner);
            frame.render_widget(Paragraph::new(notice.as_str()).centered().yellow(), center);
            return;
        }

        let x_max = chart.points.len().saturating_sub(1).max(1) as f64;
        let (y_min, y_max) = Self::y_bounds(&chart.points);
        let y_labels = [y_min, (y_min + y_max) / 2.0, y_max].map(Self::format_number);

        let dataset = Dataset::default()
            .name(chart.y_name.as_str())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::new().fg(Color::Cyan))
            .data(&chart.points);

        let x_axis = Axis::default()
            .title(chart.x_name.as_str().gray())
            .style(Style::new().fg(Color::Gray))
            .bounds([0.0, x_max])
            .labels(chart.x_labels.iter().map(String::as_str));
        let y_axis = Axis::default()
            .title(chart.y_name.as_str().gray())
            .style(Style::new().fg(Color::Gray))
            .bounds([y_min, y_max])
            .labels(y_labels);

        let widget = Chart::new(vec![dataset])
            .block(block)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(Some(LegendPosition::TopRight))
            .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));
        frame.render_widget(widget, area);
    }

    /// Bounds with a little head room. A flat series still gets a non empty range.
    fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
        let (min, max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            });
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }

    fn format_number(value: f64) -> String {
        if value.abs() >= 1e6 || (value != 0.0 && value.abs() < 1e-3) {
            format!("{value:.2e}")
        } else {
            format!("{value:.2}")
        }
    }

    fn draw_status_line(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

        let dirty = if uidata.dirty { " [+]" } else { "" };
        let position = if uidata.ncols == 0 {
            String::new()
        } else {
            format!(
                "  {}/{} : {}/{}",
                (uidata.abs_selected_row + 1).min(uidata.nrows),
                uidata.nrows,
                uidata.abs_selected_column + 1,
                uidata.ncols
            )
        };
        let status = Line::from(vec![
            Span::from(format!(" {}{}", uidata.name, dirty)).bold(),
            Span::from(position),
        ]);
        frame.render_widget(Paragraph::new(status).style(STATUS_STYLE), left);
        frame.render_widget(
            Paragraph::new(format!("{} ", uidata.status_message))
                .right_aligned()
                .style(STATUS_STYLE),
            right,
        );
    }

    fn draw_cmd_line(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        match uidata.cmd_mode.filter(|_| uidata.active_cmdinput) {
            Some(mode) => {
                let prompt = mode.prompt();
                let line = Line::from(vec![
                    prompt.blue().bold(),
                    Span::from(uidata.cmdinput.input.as_str()),
                ]);
                frame.render_widget(Paragraph::new(line), area);

                let before_curser = uidata
                    .cmdinput
                    .input
                    .chars()
                    .take(uidata.cmdinput.curser_pos)
                    .count();
                let x = area.x + (prompt.len() + before_curser) as u16;
                frame.set_cursor_position(Position::new(x.min(area.right()), area.y));
            }
            None => {
                let hint = match uidata.modus {
                    Modus::CHART => " x/X x axis  y/Y y axis  Esc table  ? help",
                    _ => " e edit  a add  d delete  p chart  w write  ? help",
                };
                frame.render_widget(Paragraph::new(hint.dark_gray()), area);
            }
        }
    }

    fn draw_popup(&self, message: &str, frame: &mut Frame) {
        let width = message.lines().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
        let height = message.lines().count() + 2;
        let area = Self::centered_rect(width as u16, height as u16, frame.area());

        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(" Esc to close ").centered())
            .border_set(symbols::border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(message).block(block), area);
    }

    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppConfig, Message};
    use crate::model::Model;
    use ratatui::{Terminal, backend::TestBackend};
    use std::fs;
    use tempfile::TempDir;

    fn render(uidata: &UIData) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| TableUI::new().draw(uidata, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_model() -> (Model, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "name,score\nalice,1\nbob,2\n").unwrap();
        let mut model = Model::init(&AppConfig::default(), 80, 24).unwrap();
        model.load_data_file(path).unwrap();
        (model, dir)
    }

    #[test]
    fn draws_empty_screen() {
        let model = Model::init(&AppConfig::default(), 80, 24).unwrap();
        let screen = render(model.get_uidata());
        assert!(screen.contains("No table loaded"));
    }

    #[test]
    fn draws_table() {
        let (model, _dir) = loaded_model();
        let screen = render(model.get_uidata());
        assert!(screen.contains("name"));
        assert!(screen.contains("alice"));
        assert!(screen.contains("scores.csv"));
    }

    #[test]
    fn draws_chart_and_help() {
        let (mut model, _dir) = loaded_model();
        model.update(Some(Message::ToggleChart)).unwrap();
        let screen = render(model.get_uidata());
        assert!(screen.contains("score over name"));

        model.update(Some(Message::Help)).unwrap();
        let screen = render(model.get_uidata());
        assert!(screen.contains("Help"));
    }

    #[test]
    fn y_bounds_for_flat_series() {
        assert_eq!(TableUI::y_bounds(&[(0.0, 2.0), (1.0, 2.0)]), (1.0, 3.0));
        assert_eq!(TableUI::y_bounds(&[]), (0.0, 1.0));
    }
}
