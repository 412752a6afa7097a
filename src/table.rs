use indexmap::IndexSet;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("row {row} has {found} cells, header has {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell {row}:{col} is out of bounds")]
    Index { row: usize, col: usize },
    #[error("no header loaded")]
    NoHeader,
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),
    #[error("column \"{0}\" is not numeric")]
    NonNumericColumn(String),
}

/// Columns driving the chart. `y` has to be numeric to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// Parse a cell the way numeric columns are detected.
/// Surrounding whitespace is ignored, `inf` and `NaN` are not numbers.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// In memory csv table. Header plus rows of strings, every row as wide as the header.
///
/// All mutations are checked up front, a failing call leaves the table untouched.
#[derive(Debug, Default, Clone)]
pub struct TableModel {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    axis: Option<AxisSelection>,
}

impl TableModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table. Resets the axis selection to the first two columns.
    pub fn load(&mut self, header: Vec<String>, rows: Vec<Vec<String>>) -> Result<(), TableError> {
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != header.len())
        {
            return Err(TableError::Shape {
                row,
                expected: header.len(),
                found: r.len(),
            });
        }

        self.axis = match header.as_slice() {
            [x, y, ..] => Some(AxisSelection {
                x: x.clone(),
                y: y.clone(),
            }),
            _ => None,
        };
        self.header = header;
        self.rows = rows;
        debug!(
            "Loaded table with {} columns and {} rows",
            self.ncols(),
            self.nrows()
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
        self.axis = None;
    }

    pub fn edit_cell(&mut self, row: usize, col: usize, value: String) -> Result<(), TableError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(TableError::Index { row, col })?;
        trace!("Edit {}:{} \"{}\" -> \"{}\"", row, col, cell, value);
        *cell = value;
        Ok(())
    }

    pub fn add_row(&mut self) -> Result<(), TableError> {
        if self.header.is_empty() {
            return Err(TableError::NoHeader);
        }
        self.rows.push(vec![String::new(); self.header.len()]);
        Ok(())
    }

    pub fn delete_row(&mut self, row: usize) -> Result<(), TableError> {
        if row >= self.rows.len() {
            return Err(TableError::Index { row, col: 0 });
        }
        let removed = self.rows.remove(row);
        trace!("Deleted row {}: {:?}", row, removed);
        Ok(())
    }

    /// Names of all columns where every cell is a finite number.
    /// Without rows every column qualifies.
    ///
    /// A duplicated name is judged by its first column, the one lookups by name resolve to.
    pub fn numeric_columns(&self) -> IndexSet<String> {
        self.header
            .iter()
            .enumerate()
            .filter(|(cidx, name)| {
                self.column_index(name) == Some(*cidx) && self.is_numeric_column(*cidx)
            })
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn is_numeric_column(&self, cidx: usize) -> bool {
        self.rows
            .iter()
            .all(|r| parse_number(&r[cidx]).is_some())
    }

    pub fn derive_chart_data(&self, x: &str, y: &str) -> Result<Vec<ChartPoint>, TableError> {
        let xidx = self
            .column_index(x)
            .ok_or_else(|| TableError::UnknownColumn(x.to_string()))?;
        let yidx = self
            .column_index(y)
            .ok_or_else(|| TableError::UnknownColumn(y.to_string()))?;

        Ok(self
            .rows
            .iter()
            .map(|r| ChartPoint {
                x: r[xidx].clone(),
                y: parse_number(&r[yidx]).unwrap_or(f64::NAN),
            })
            .collect())
    }

    /// Points for the current axis selection, `None` if there is nothing renderable.
    pub fn chart_series(&self) -> Option<Vec<ChartPoint>> {
        let axis = self.axis.as_ref()?;
        if !self.numeric_columns().contains(&axis.y) {
            return None;
        }
        self.derive_chart_data(&axis.x, &axis.y).ok()
    }

    pub fn snapshot(&self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.header.clone(), self.rows.clone())
    }

    pub fn axis(&self) -> Option<&AxisSelection> {
        self.axis.as_ref()
    }

    pub fn set_axis_x(&mut self, name: &str) -> Result<(), TableError> {
        if self.column_index(name).is_none() {
            return Err(TableError::UnknownColumn(name.to_string()));
        }
        let y = self.axis.as_ref().map(|a| a.y.clone()).unwrap_or_default();
        self.axis = Some(AxisSelection {
            x: name.to_string(),
            y,
        });
        Ok(())
    }

    pub fn set_axis_y(&mut self, name: &str) -> Result<(), TableError> {
        if self.column_index(name).is_none() {
            return Err(TableError::UnknownColumn(name.to_string()));
        }
        if !self.numeric_columns().contains(name) {
            return Err(TableError::NonNumericColumn(name.to_string()));
        }
        let x = self
            .axis
            .as_ref()
            .map(|a| a.x.clone())
            .unwrap_or_else(|| self.header[0].clone());
        self.axis = Some(AxisSelection {
            x,
            y: name.to_string(),
        });
        Ok(())
    }

    /// Move the x axis `step` columns through the header, wrapping around.
    pub fn cycle_axis_x(&mut self, step: isize) -> Result<(), TableError> {
        let candidates: Vec<String> = self
            .header
            .iter()
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect();
        let current = self.axis.as_ref().map(|a| a.x.as_str());
        let next = Self::cycle(&candidates, current, step).ok_or(TableError::NoHeader)?;
        self.set_axis_x(&next)
    }

    /// Move the y axis `step` columns through the numeric columns, wrapping around.
    pub fn cycle_axis_y(&mut self, step: isize) -> Result<(), TableError> {
        if self.header.is_empty() {
            return Err(TableError::NoHeader);
        }
        let candidates: Vec<String> = self.numeric_columns().into_iter().collect();
        let current = self.axis.as_ref().map(|a| a.y.as_str());
        match Self::cycle(&candidates, current, step) {
            Some(next) => self.set_axis_y(&next),
            None => Err(TableError::NonNumericColumn(
                current.unwrap_or_default().to_string(),
            )),
        }
    }

    fn cycle(candidates: &[String], current: Option<&str>, step: isize) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }
        let len = candidates.len() as isize;
        let next = match current.and_then(|c| candidates.iter().position(|n| n == c)) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None => 0,
        };
        Some(candidates[next as usize].clone())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}
