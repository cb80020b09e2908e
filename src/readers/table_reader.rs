use crate::error::{AnalyticsError, Result};
use crate::models::{
    DailyRecord, Metric, MetricValues, Month, MonthlyRecord, SeasonalRecord, YearlyRecord,
};
use crate::utils::constants::{
    CITY_COLUMN, DATETIME_FORMATS, DATE_FORMATS, MISSING_VALUE_TOKENS, MONTH_COLUMN,
    SEASON_COLUMN, TIME_COLUMN, YEAR_COLUMN,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Reads the four weather tables from CSV files with a header row.
///
/// Key columns and every metric column are required. Within a row, an empty
/// or missing-value token reads as absent.
pub struct TableReader {
    delimiter: u8,
}

impl TableReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_yearly(&self, path: &Path) -> Result<Vec<YearlyRecord>> {
        self.read_rows(path, &[CITY_COLUMN, YEAR_COLUMN], |row| {
            Ok(YearlyRecord::new(
                row.text(CITY_COLUMN)?,
                row.year(YEAR_COLUMN)?,
                row.metrics()?,
            ))
        })
    }

    pub fn read_monthly(&self, path: &Path) -> Result<Vec<MonthlyRecord>> {
        self.read_rows(path, &[CITY_COLUMN, MONTH_COLUMN], |row| {
            Ok(MonthlyRecord::new(
                row.text(CITY_COLUMN)?,
                row.month(MONTH_COLUMN)?,
                row.metrics()?,
            ))
        })
    }

    pub fn read_seasonal(&self, path: &Path) -> Result<Vec<SeasonalRecord>> {
        self.read_rows(path, &[CITY_COLUMN, SEASON_COLUMN], |row| {
            let label = row.field(SEASON_COLUMN)?;
            let season = label.parse().map_err(|_| row.invalid(SEASON_COLUMN, label))?;
            Ok(SeasonalRecord::new(
                row.text(CITY_COLUMN)?,
                season,
                row.metrics()?,
            ))
        })
    }

    /// Read the full time series; year and month are derived from the time column.
    pub fn read_all_cities(&self, path: &Path) -> Result<Vec<DailyRecord>> {
        self.read_rows(path, &[CITY_COLUMN, TIME_COLUMN], |row| {
            Ok(DailyRecord::new(
                row.text(CITY_COLUMN)?,
                row.timestamp(TIME_COLUMN)?,
                row.metrics()?,
            ))
        })
    }

    fn read_rows<R, F>(&self, path: &Path, key_columns: &[&'static str], parse: F) -> Result<Vec<R>>
    where
        R: Validate,
        F: Fn(&Row<'_>) -> Result<R>,
    {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_path(path)?;

        let layout = ColumnLayout::from_headers(path, reader.headers()?, key_columns)?;
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let row = Row {
                path,
                line: record.position().map_or(0, |p| p.line()),
                record: &record,
                layout: &layout,
            };

            let parsed = parse(&row)?;
            parsed.validate()?;
            rows.push(parsed);
        }

        debug!(path = %path.display(), rows = rows.len(), "read table");
        Ok(rows)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Column positions resolved once from the header row.
struct ColumnLayout {
    keys: Vec<(&'static str, usize)>,
    metrics: [usize; Metric::COUNT],
}

impl ColumnLayout {
    fn from_headers(
        path: &Path,
        headers: &StringRecord,
        key_columns: &[&'static str],
    ) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let required = |column: &str| {
            position(column).ok_or_else(|| AnalyticsError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
        };

        let mut keys = Vec::with_capacity(key_columns.len());
        for &column in key_columns {
            keys.push((column, required(column)?));
        }

        let mut metrics = [0; Metric::COUNT];
        for metric in Metric::ALL {
            metrics[metric.index()] = required(metric.column_name())?;
        }

        Ok(Self { keys, metrics })
    }

    fn key(&self, column: &str) -> Option<usize> {
        self.keys
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, index)| *index)
    }
}

/// One data row with enough context to report where a bad value came from.
struct Row<'a> {
    path: &'a Path,
    line: u64,
    record: &'a StringRecord,
    layout: &'a ColumnLayout,
}

impl<'a> Row<'a> {
    fn invalid(&self, column: &str, value: &str) -> AnalyticsError {
        AnalyticsError::InvalidField {
            path: self.path.to_path_buf(),
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    fn field(&self, column: &str) -> Result<&'a str> {
        let index = self
            .layout
            .key(column)
            .ok_or_else(|| AnalyticsError::MissingColumn {
                path: self.path.to_path_buf(),
                column: column.to_string(),
            })?;
        self.record
            .get(index)
            .ok_or_else(|| self.invalid(column, ""))
    }

    fn text(&self, column: &str) -> Result<String> {
        Ok(self.field(column)?.to_string())
    }

    /// Integers may be written as floats by upstream tools ("2015.0").
    fn integer(&self, column: &str) -> Result<i64> {
        let raw = self.field(column)?;
        if let Ok(value) = raw.parse::<i64>() {
            return Ok(value);
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
            _ => Err(self.invalid(column, raw)),
        }
    }

    fn year(&self, column: &str) -> Result<i32> {
        let value = self.integer(column)?;
        i32::try_from(value).map_err(|_| self.invalid(column, &value.to_string()))
    }

    fn month(&self, column: &str) -> Result<Month> {
        let value = self.integer(column)?;
        u32::try_from(value)
            .ok()
            .and_then(|number| Month::new(number).ok())
            .ok_or_else(|| self.invalid(column, &value.to_string()))
    }

    fn timestamp(&self, column: &str) -> Result<NaiveDateTime> {
        let raw = self.field(column)?;
        parse_timestamp(raw).ok_or_else(|| AnalyticsError::InvalidTimestamp {
            path: self.path.to_path_buf(),
            line: self.line,
            value: raw.to_string(),
        })
    }

    fn metrics(&self) -> Result<MetricValues> {
        let mut values = MetricValues::new();
        for metric in Metric::ALL {
            let index = self.layout.metrics[metric.index()];
            let raw = self.record.get(index).unwrap_or("");
            values.set(metric, self.measurement(metric.column_name(), raw)?);
        }
        Ok(values)
    }

    fn measurement(&self, column: &str, raw: &str) -> Result<Option<f64>> {
        if MISSING_VALUE_TOKENS.contains(&raw) {
            return Ok(None);
        }
        let value = raw
            .parse::<f64>()
            .map_err(|_| self.invalid(column, raw))?;
        Ok(value.is_finite().then_some(value))
    }
}

/// Parse the time column. Date-only values are taken at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|time| time.naive_local())
}
