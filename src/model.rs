use arboard::Clipboard;
use ratatui::crossterm::event::KeyEvent;
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

use crate::cli::expand_path;
use crate::codec::{self, FileInfo};
use crate::domain::{AppConfig, AppError, CMDMode, HELP_TEXT, Message};
use crate::inputter::{InputResult, Inputter};
use crate::table::TableModel;
use crate::ui::{CMDLINE_HEIGH, COLUMN_WIDTH_MARGIN, SCROLLBAR_WIDTH, TABLE_HEADER_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    EMPTY,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    CHART,
    POPUP,
    CMDINPUT,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

/// Viewport over the table. Selection is absolute, the curser is relative to the offsets.
#[derive(Debug, Default)]
struct TableView {
    selected_row: usize,
    selected_column: usize,
    curser_row: usize,
    curser_column: usize,
    offset_row: usize,
    offset_column: usize,
    visible_columns: Vec<usize>, // Idx of visible columns that are send to the UI for rendering.
    data: Vec<ColumnView>,
    index: ColumnView,
    height: usize,
    width: usize,
}

impl TableView {
    fn build_index(&mut self, nrows: usize, index_width: usize) {
        let rbegin = self.offset_row;
        let rend = std::cmp::min(rbegin + self.height, nrows);

        let data = (rbegin..rend)
            .map(|idx| (idx + 1).to_string())
            .collect::<Vec<String>>();
        self.index = ColumnView {
            name: "#".to_string(),
            width: index_width,
            data,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
    pub x_name: String,
    pub y_name: String,
    pub points: Vec<(f64, f64)>, // (row ordinal, y value)
    pub x_labels: Vec<String>,
    pub notice: Option<String>,
}

pub struct UIData {
    pub name: String,
    pub modus: Modus,
    pub table: Vec<ColumnView>,
    pub index: ColumnView,
    pub nrows: usize,
    pub ncols: usize,
    pub selected_row: usize,
    pub selected_column: usize,
    pub abs_selected_row: usize,
    pub abs_selected_column: usize,
    pub chart: ChartData,
    pub dirty: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: UILayout,
    pub cmdinput: InputResult,
    pub cmd_mode: Option<CMDMode>,
    pub active_cmdinput: bool,
    pub status_message: String,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            modus: Modus::TABLE,
            table: Vec::new(),
            index: ColumnView::default(),
            nrows: 0,
            ncols: 0,
            selected_row: 0,
            selected_column: 0,
            abs_selected_row: 0,
            abs_selected_column: 0,
            chart: ChartData::default(),
            dirty: false,
            show_popup: false,
            popup_message: String::new(),
            layout: UILayout::default(),
            cmdinput: InputResult::default(),
            cmd_mode: None,
            active_cmdinput: false,
            status_message: String::new(),
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub table_width: usize,
    pub table_height: usize,
    pub index_width: usize,
}

impl UILayout {
    pub fn from_values(index_width: usize, ui_width: usize, ui_height: usize) -> Self {
        let table_width = ui_width.saturating_sub(SCROLLBAR_WIDTH + index_width + 1);
        let table_height = ui_height.saturating_sub(CMDLINE_HEIGH + TABLE_HEADER_HEIGHT);

        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            table_width,
            table_height,
            index_width,
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

pub struct Model {
    file_info: Option<FileInfo>,
    config: AppConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    table: TableModel,
    view: TableView,
    dirty: bool,
    // Message that has to be repeated before unsaved changes are dropped
    armed: Option<Message>,
    uilayout: UILayout,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
}

impl Model {
    pub fn init(config: &AppConfig, ui_width: usize, ui_height: usize) -> Result<Self, AppError> {
        let mut model = Self {
            file_info: None,
            config: config.clone(),
            status: Status::EMPTY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            table: TableModel::new(),
            view: TableView::default(),
            dirty: false,
            armed: None,
            uilayout: UILayout::from_values(0, ui_width, ui_height),
            uidata: UIData::empty(),
            clipboard: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
        };
        model.set_status_message("Press o to open a csv file, ? for help");
        model.update_table_data();
        model.update_uidata();
        Ok(model)
    }

    /// Read a csv file and replace the current table with it.
    pub fn load_data_file(&mut self, path: PathBuf) -> Result<(), AppError> {
        let file_info = codec::get_file_info(path)?;
        debug!("Loading {:?}", file_info);
        let delimiter = file_info.file_type.delimiter(self.config.delimiter);
        let (header, rows) = codec::decode(&file_info.path, delimiter)?;
        let ragged = codec::count_ragged_lines(&file_info.path, delimiter)?;
        self.table.load(header, rows)?;

        let mut message = format!(
            "Loaded {} rows with {} columns ({} bytes)",
            self.table.nrows(),
            self.table.ncols(),
            file_info.file_size
        );
        if ragged > 0 {
            warn!(
                "{} lines in {:?} did not have {} fields and were padded or truncated",
                ragged,
                file_info.path,
                self.table.ncols()
            );
            message.push_str(&format!(
                ", {ragged} ragged lines fitted to {} columns!",
                self.table.ncols()
            ));
        }
        self.set_status_message(message);
        self.file_info = Some(file_info);
        self.status = if self.table.is_empty() {
            Status::EMPTY
        } else {
            Status::READY
        };
        self.dirty = false;
        self.view = TableView::default();
        self.update_table_data();
        self.update_uidata();
        Ok(())
    }

    /// Like `load_data_file` but never fails. A file that cannot be decoded leaves an empty table.
    pub fn open(&mut self, path: PathBuf) {
        let name = path.display().to_string();
        match self.load_data_file(path) {
            Ok(()) => info!("Opened {name}"),
            Err(
                e @ (AppError::FileNotFound
                | AppError::PermissionDenied
                | AppError::UnknownFileType
                | AppError::LoadingFailed(_)),
            ) => {
                warn!("Cannot open {name}: {e}");
                self.set_status_message(format!("Cannot open {name}: {e}"));
            }
            Err(e) => {
                error!("Failed to read {name}: {e}");
                self.table.clear();
                self.file_info = None;
                self.status = Status::EMPTY;
                self.dirty = false;
                self.view = TableView::default();
                self.update_table_data();
                self.set_status_message(format!("Failed to read {name}: {e}"));
            }
        }
        self.update_uidata();
    }

    /// Write the current table to `path`.
    pub fn save(&mut self, path: PathBuf) {
        if self.table.is_empty() {
            self.set_status_message("Nothing to write!");
            return;
        }
        let (header, rows) = self.table.snapshot();
        match codec::encode(&path, &header, &rows, self.config.delimiter) {
            Ok(()) => {
                self.dirty = false;
                self.set_status_message(format!("Wrote {} rows to {}", rows.len(), path.display()));
            }
            Err(e) => {
                error!("Writing {:?} failed: {e}", path);
                self.set_status_message(format!("Writing {} failed: {e}", path.display()));
            }
        }
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn table(&self) -> &TableModel {
        &self.table
    }

    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
    }

    pub fn quit(&mut self) {
        if self.confirm_discard(Message::Quit, "q", "quit") {
            self.status = Status::QUITTING;
        }
    }

    /// With unsaved changes the first `msg` only warns, repeating it goes ahead.
    fn confirm_discard(&mut self, msg: Message, key: &str, action: &str) -> bool {
        if !self.dirty || self.armed.as_ref() == Some(&msg) {
            self.armed = None;
            return true;
        }
        self.armed = Some(msg);
        self.set_status_message(format!(
            "Unsaved changes! Press {key} again to {action}, w to write."
        ));
        false
    }

    fn open_prompt(&mut self) {
        if self.confirm_discard(Message::Open, "o", "open another file") {
            self.enter_cmd_mode(CMDMode::OpenFile);
        }
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(self.uilayout.index_width, width, height);
        self.update_table_data();
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), AppError> {
        if let Some(msg) = message {
            if self.armed.as_ref() != Some(&msg) {
                self.armed = None;
            }
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Quit => self.quit(),
                    Message::MoveDown => self.move_table_selection_down(1),
                    Message::MoveUp => self.move_table_selection_up(1),
                    Message::MoveLeft => self.move_table_selection_left(),
                    Message::MoveRight => self.move_table_selection_right(),
                    Message::MovePageUp => self.move_table_selection_up(self.view.height.max(1)),
                    Message::MovePageDown => {
                        self.move_table_selection_down(self.view.height.max(1))
                    }
                    Message::MoveBeginning => self.select_cell(0, self.view.selected_column),
                    Message::MoveEnd => {
                        self.select_cell(self.table.nrows(), self.view.selected_column)
                    }
                    Message::MoveToFirstColumn => self.select_cell(self.view.selected_row, 0),
                    Message::MoveToLastColumn => {
                        self.select_cell(self.view.selected_row, self.table.ncols())
                    }
                    Message::Enter | Message::EditCell => self.enter_cmd_mode(CMDMode::EditCell),
                    Message::AddRow => self.add_row(),
                    Message::DeleteRow => self.delete_row(),
                    Message::CopyCell => self.copy_table_cell(),
                    Message::CopyRow => self.copy_table_row(),
                    Message::Save => self.save(self.config.output_path.clone()),
                    Message::SaveAs => self.enter_cmd_mode(CMDMode::SaveAs),
                    Message::Open => self.open_prompt(),
                    Message::ToggleChart => self.show_chart(),
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::CHART => match msg {
                    Message::Quit => self.quit(),
                    Message::NextXAxis => self.cycle_axis(true, 1),
                    Message::PrevXAxis => self.cycle_axis(true, -1),
                    Message::NextYAxis => self.cycle_axis(false, 1),
                    Message::PrevYAxis => self.cycle_axis(false, -1),
                    Message::Save => self.save(self.config.output_path.clone()),
                    Message::SaveAs => self.enter_cmd_mode(CMDMode::SaveAs),
                    Message::Open => self.open_prompt(),
                    Message::Help => self.show_help(),
                    Message::Exit | Message::ToggleChart => self.exit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::Exit | Message::Enter | Message::Help => self.exit(),
                    _ => (),
                },
                Modus::CMDINPUT => match msg {
                    Message::RawKey(key) => self.raw_input(key),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    _ => (),
                },
            }
        }

        self.update_uidata();
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        match self.modus {
            Modus::TABLE => {}
            Modus::CHART => {
                self.previous_modus = Modus::CHART;
                self.modus = Modus::TABLE;
                self.update_table_data();
            }
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::CMDINPUT => {}
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn show_chart(&mut self) {
        if self.table.is_empty() {
            self.set_status_message("Open a file first!");
            return;
        }
        self.previous_modus = self.modus;
        self.modus = Modus::CHART;
    }

    fn cycle_axis(&mut self, x_axis: bool, step: isize) {
        let result = if x_axis {
            self.table.cycle_axis_x(step)
        } else {
            self.table.cycle_axis_y(step)
        };
        match result {
            Ok(()) => {
                if let Some(axis) = self.table.axis() {
                    let message = format!("Plotting {} over {}", axis.y, axis.x);
                    self.set_status_message(message);
                }
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn add_row(&mut self) {
        match self.table.add_row() {
            Ok(()) => {
                self.dirty = true;
                self.select_cell(self.table.nrows() - 1, self.view.selected_column);
                self.set_status_message(format!("Added row {}", self.table.nrows()));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn delete_row(&mut self) {
        let row = self.view.selected_row;
        match self.table.delete_row(row) {
            Ok(()) => {
                self.dirty = true;
                self.update_table_data();
                self.set_status_message(format!("Deleted row {}", row + 1));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn edit_selected_cell(&mut self, value: String) {
        let (row, column) = (self.view.selected_row, self.view.selected_column);
        match self.table.edit_cell(row, column, value) {
            Ok(()) => {
                self.dirty = true;
                self.update_table_data();
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if self.active_cmdinput {
            self.last_input = self.input.read(key);
            if self.last_input.finished {
                self.handle_cmd_input();
            }
        }
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode) {
        if mode == CMDMode::EditCell && self.table.nrows() == 0 {
            self.set_status_message("Nothing to edit, press a to add a row.");
            return;
        }
        trace!("Entering command mode {:?} ...", mode);
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;

        self.input.clear();
        match mode {
            CMDMode::EditCell => {
                let value = self
                    .table
                    .cell(self.view.selected_row, self.view.selected_column)
                    .unwrap_or_default()
                    .to_string();
                self.input.set(&value);
            }
            CMDMode::SaveAs => self
                .input
                .set(&self.config.output_path.display().to_string()),
            CMDMode::OpenFile => {}
        }
        self.last_input = self.input.get();
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {:?}", self.last_input);

        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;

        let cmd_input = self.last_input.input.clone();
        if self.last_input.canceled {
            self.set_status_message("Canceled");
        } else {
            match self.cmd_mode {
                Some(CMDMode::EditCell) => self.edit_selected_cell(cmd_input),
                Some(CMDMode::OpenFile) if cmd_input.trim().is_empty() => {
                    self.set_status_message("No file given")
                }
                Some(CMDMode::OpenFile) => self.open(expand_path(cmd_input.trim())),
                Some(CMDMode::SaveAs) if cmd_input.trim().is_empty() => {
                    self.set_status_message("No file given")
                }
                Some(CMDMode::SaveAs) => self.save(expand_path(cmd_input.trim())),
                None => info!("Cmd mode is none!"),
            }
        }

        self.cmd_mode = None;
        self.input.clear();
        self.last_input = self.input.get();
    }

    fn copy_to_clipboard(&mut self, content: String) {
        if self.clipboard.is_none() {
            self.clipboard = Clipboard::new()
                .map_err(|e| warn!("No clipboard available: {:?}", e))
                .ok();
        }
        match self.clipboard.as_mut().map(|c| c.set_text(content)) {
            Some(Ok(_)) => self.set_status_message("Copied to clipboard"),
            Some(Err(e)) => {
                trace!("Error copying to clipboard: {:?}", e);
                self.set_status_message("Copying to clipboard failed!");
            }
            None => self.set_status_message("No clipboard available!"),
        }
    }

    fn copy_table_cell(&mut self) {
        if let Some(cell) = self
            .table
            .cell(self.view.selected_row, self.view.selected_column)
        {
            trace!("Cell content: {}", cell);
            self.copy_to_clipboard(cell.to_string());
        }
    }

    fn copy_table_row(&mut self) {
        if let Some(row) = self.table.rows().get(self.view.selected_row) {
            let content = codec::format_record(row, self.config.delimiter);
            self.copy_to_clipboard(content);
        }
    }

    fn select_cell(&mut self, row: usize, column: usize) {
        trace!("Select cell {}:{}", row, column);
        self.view.selected_row = row;
        self.view.selected_column = column;
        self.update_table_data();
    }

    fn move_table_selection_up(&mut self, size: usize) {
        let row = self.view.selected_row.saturating_sub(size);
        self.select_cell(row, self.view.selected_column);
    }

    fn move_table_selection_down(&mut self, size: usize) {
        let row = self.view.selected_row + size;
        self.select_cell(row, self.view.selected_column);
    }

    fn move_table_selection_left(&mut self) {
        let column = self.view.selected_column.saturating_sub(1);
        self.select_cell(self.view.selected_row, column);
    }

    fn move_table_selection_right(&mut self) {
        let column = self.view.selected_column + 1;
        self.select_cell(self.view.selected_row, column);
    }

    // -------------------- View building ---------------------- //

    fn get_visible_name(name: &str, width: usize) -> String {
        let name = name.replace("\r\n", " ↵ ").replace('\n', " ↵ ");
        if name.chars().count() <= width {
            return name;
        }
        if width < 3 {
            return name.chars().take(width).collect();
        }
        let mut reduced_name: String = name.chars().take(width - 3).collect();
        reduced_name.push_str("...");
        reduced_name
    }

    fn calculate_column_width(table: &TableModel, cidx: usize, max_column_width: usize) -> usize {
        let name_width = table.header()[cidx].chars().count();
        let max_width = table
            .rows()
            .iter()
            .map(|r| r[cidx].chars().count())
            .max()
            .unwrap_or(0);
        let width = std::cmp::max(name_width, max_width) + COLUMN_WIDTH_MARGIN;
        width.clamp(1 + COLUMN_WIDTH_MARGIN, max_column_width.max(2))
    }

    /// Clamp the selection, move the offsets so it stays visible and rebuild the visible columns.
    fn update_table_data(&mut self) {
        let nrows = self.table.nrows();
        let ncols = self.table.ncols();
        let index_width = std::cmp::max(nrows.to_string().len(), 3);
        self.uilayout = UILayout::from_values(index_width, self.uilayout.width, self.uilayout.height);

        let widths: Vec<usize> = (0..ncols)
            .map(|cidx| Self::calculate_column_width(&self.table, cidx, self.config.max_column_width))
            .collect();

        let view = &mut self.view;
        view.width = self.uilayout.table_width;
        view.height = self.uilayout.table_height;
        view.selected_row = std::cmp::min(view.selected_row, nrows.saturating_sub(1));
        view.selected_column = std::cmp::min(view.selected_column, ncols.saturating_sub(1));

        if ncols == 0 {
            *view = TableView {
                width: view.width,
                height: view.height,
                ..TableView::default()
            };
            return;
        }

        // Rows: scroll the minimal amount needed to show the selection
        let height = std::cmp::max(view.height, 1);
        if view.selected_row < view.offset_row {
            view.offset_row = view.selected_row;
        } else if view.selected_row >= view.offset_row + height {
            view.offset_row = view.selected_row + 1 - height;
        }

        // Columns: same for the horizontal direction, using the rendered widths
        if view.selected_column < view.offset_column {
            view.offset_column = view.selected_column;
        }
        while view.offset_column < view.selected_column
            && widths[view.offset_column..=view.selected_column]
                .iter()
                .map(|w| w + 1)
                .sum::<usize>()
                > view.width
        {
            view.offset_column += 1;
        }

        // Create a list of columns that fit in the table
        view.visible_columns.clear();
        let mut render_widths = Vec::new();
        let mut visible_width = 0;
        for (cidx, &width) in widths.iter().enumerate().skip(view.offset_column) {
            if visible_width + width + 1 <= view.width {
                view.visible_columns.push(cidx);
                render_widths.push(width);
                visible_width += width + 1;
            } else {
                // Add the last partial visible column
                if visible_width < view.width {
                    let remaining_width = view.width - visible_width;
                    view.visible_columns.push(cidx);
                    render_widths.push(remaining_width);
                    visible_width += remaining_width;
                }
                break;
            }
        }
        view.curser_row = view.selected_row - view.offset_row;
        view.curser_column = view.selected_column - view.offset_column;

        let rbegin = std::cmp::min(view.offset_row, nrows);
        let rend = std::cmp::min(rbegin + height, nrows);
        let header = self.table.header();
        let rows = &self.table.rows()[rbegin..rend];
        view.data = view
            .visible_columns
            .iter()
            .zip(render_widths)
            .map(|(&cidx, width)| ColumnView {
                name: Self::get_visible_name(&header[cidx], width),
                width,
                data: rows
                    .iter()
                    .map(|r| Self::get_visible_name(&r[cidx], width))
                    .collect(),
            })
            .collect();

        view.build_index(nrows, index_width);
        trace!(
            "Table: Sr {}, Sc {}, Or {}, Oc {}, Rb {}, Re {}, tw: {}, th: {}",
            view.selected_row,
            view.selected_column,
            view.offset_row,
            view.offset_column,
            rbegin,
            rend,
            view.width,
            view.height
        );
    }

    fn chart_visible(&self) -> bool {
        self.modus == Modus::CHART
            || (self.previous_modus == Modus::CHART
                && matches!(self.modus, Modus::POPUP | Modus::CMDINPUT))
    }

    fn build_chart_data(&self) -> ChartData {
        let Some(axis) = self.table.axis() else {
            return ChartData {
                notice: Some("Need at least two columns to draw a chart".to_string()),
                ..ChartData::default()
            };
        };
        let mut chart = ChartData {
            x_name: axis.x.clone(),
            y_name: axis.y.clone(),
            ..ChartData::default()
        };
        match self.table.chart_series() {
            None => {
                chart.notice = Some(format!(
                    "Column \"{}\" is not numeric, press y to pick another one",
                    axis.y
                ))
            }
            Some(points) if points.is_empty() => {
                chart.notice = Some("No rows to plot".to_string())
            }
            Some(points) => {
                let last = points.len() - 1;
                let mut label_idx = vec![0, last / 2, last];
                label_idx.dedup();
                chart.x_labels = label_idx.into_iter().map(|i| points[i].x.clone()).collect();
                chart.points = points
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.y.is_finite())
                    .map(|(i, p)| (i as f64, p.y))
                    .collect();
            }
        }
        chart
    }

    fn update_uidata(&mut self) {
        let chart = if self.chart_visible() {
            self.build_chart_data()
        } else {
            ChartData::default()
        };
        let name = self
            .file_info
            .as_ref()
            .and_then(|f| f.path.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("[no file]")
            .to_string();

        let view = &self.view;
        self.uidata = UIData {
            name,
            modus: self.modus,
            table: view.data.clone(),
            index: view.index.clone(),
            nrows: self.table.nrows(),
            ncols: self.table.ncols(),
            selected_row: view.curser_row,
            selected_column: view.curser_column,
            abs_selected_row: view.selected_row,
            abs_selected_column: view.selected_column,
            chart,
            dirty: self.dirty,
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            layout: self.uilayout.clone(),
            cmdinput: self.last_input.clone(),
            cmd_mode: self.cmd_mode,
            active_cmdinput: self.active_cmdinput,
            status_message: self.status_message.clone(),
        };
    }
}
