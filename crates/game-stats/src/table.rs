//! Tabular output for presentation and export.
//!
//! Column order is fixed per table kind. Undefined metrics are carried as
//! [`Cell::Undefined`], never as a blank or a zero.

use std::fmt;

use serde::Serialize;

use crate::aggregate::{GroupRecord, OpeningAggregate};
use crate::metrics::{EloBucket, PlySeries, Record};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    /// Serialized as `null`.
    Undefined,
}

impl Cell {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Cell::Undefined)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Cell::Int(v) => Some(v as f64),
            Cell::Float(v) => Some(v),
            Cell::Text(_) | Cell::Undefined => None,
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Undefined, Cell::Float)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(v) => f.write_str(v),
            Cell::Undefined => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

const RECORD_COLUMNS: [&str; 6] = ["games", "wins", "draws", "losses", "win_rate", "score"];

fn record_cells(record: &Record) -> [Cell; 6] {
    [
        record.total().into(),
        record.wins.into(),
        record.draws.into(),
        record.losses.into(),
        record.win_rate().into(),
        record.score().into(),
    ]
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have one cell per column.
    pub fn push(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Every cell of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let i = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[i]).collect())
    }

    /// `ply | <value_column> | games`, one row per ply.
    pub fn from_series(value_column: &str, series: &PlySeries) -> Self {
        let mut table = Self::new(["ply", value_column, "games"]);
        for point in series.points() {
            table.push(vec![point.ply.into(), point.value.into(), point.samples.into()]);
        }
        table
    }

    /// One row per opening, in the given order.
    pub fn from_openings(aggregates: &[OpeningAggregate<'_>]) -> Self {
        let mut table = Self::new(
            std::iter::once("opening")
                .chain(RECORD_COLUMNS)
                .chain(["avg_error", "avg_time_per_move", "avg_exit_ply"]),
        );
        for agg in aggregates {
            let mut row = vec![Cell::from(agg.name.as_str())];
            row.extend(record_cells(&agg.record));
            row.push(agg.avg_game_error.into());
            row.push(agg.avg_time_series.overall_mean().into());
            row.push(agg.avg_exit_ply.into());
            table.push(row);
        }
        table
    }

    /// `<label_column> | games | wins | draws | losses | win_rate | score`.
    pub fn from_groups(label_column: &str, groups: &[GroupRecord<'_>]) -> Self {
        Self::from_records(
            label_column,
            groups.iter().map(|g| (g.label.clone(), g.record)),
        )
    }

    /// Elo buckets labelled `lower-upper`, in ascending rating order.
    pub fn from_elo_buckets(buckets: &[EloBucket]) -> Self {
        Self::from_records("elo", buckets.iter().map(|b| (b.label(), b.record)))
    }

    pub fn from_records<I>(label_column: &str, records: I) -> Self
    where
        I: IntoIterator<Item = (String, Record)>,
    {
        let mut table = Self::new(std::iter::once(label_column).chain(RECORD_COLUMNS));
        for (label, record) in records {
            let mut row = vec![Cell::Text(label)];
            row.extend(record_cells(&record));
            table.push(row);
        }
        table
    }
}
