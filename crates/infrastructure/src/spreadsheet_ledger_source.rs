//! Ledger adapter for workbook and CSV exports.

mod cells;
mod columns;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{Reader, open_workbook_auto};
use cartera_application::LedgerSource;
use cartera_core::{AppError, AppResult};
use cartera_domain::{Ledger, LedgerRow, LedgerRowInput};
use chrono::{Local, NaiveDate};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, info, warn};

use cells::CellValue;
use columns::{ColumnLayout, LedgerField, canonical_column_name};

/// Column holding the salesperson identity unless configured otherwise.
pub const DEFAULT_SALESPERSON_COLUMN: &str = "vendedor";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Settings for reading the receivables export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetLedgerConfig {
    /// Workbook or CSV file path.
    pub path: PathBuf,
    /// Worksheet name. The first sheet is used when absent.
    pub sheet: Option<String>,
    /// Header of the salesperson column, compared in canonical form.
    pub salesperson_column: String,
    /// Reference date for days overdue derived from due dates. Today when absent.
    pub as_of: Option<NaiveDate>,
    /// Keeps lines with a zero or negative balance.
    pub include_settled: bool,
}

impl SpreadsheetLedgerConfig {
    /// Creates a configuration with default column and settlement handling.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            salesperson_column: DEFAULT_SALESPERSON_COLUMN.to_owned(),
            as_of: None,
            include_settled: false,
        }
    }
}

/// Ledger source re-reading the export file on every load.
#[derive(Debug, Clone)]
pub struct SpreadsheetLedgerSource {
    config: SpreadsheetLedgerConfig,
}

impl SpreadsheetLedgerSource {
    /// Creates a ledger source.
    #[must_use]
    pub fn new(config: SpreadsheetLedgerConfig) -> Self {
        Self { config }
    }

    /// Returns the source configuration.
    #[must_use]
    pub fn config(&self) -> &SpreadsheetLedgerConfig {
        &self.config
    }
}

#[async_trait]
impl LedgerSource for SpreadsheetLedgerSource {
    async fn load_ledger(&self) -> AppResult<Ledger> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || read_ledger_file(&config))
            .await
            .map_err(|error| AppError::Internal(format!("ledger loading task failed: {error}")))?
    }
}

/// Header row plus data rows, before column resolution.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

fn read_ledger_file(config: &SpreadsheetLedgerConfig) -> AppResult<Ledger> {
    let path = config.path.as_path();
    if !path.is_file() {
        return Err(AppError::DataSource(format!(
            "ledger file '{}' was not found",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some("csv") => read_csv_file(path)?,
        Some(extension) if WORKBOOK_EXTENSIONS.contains(&extension) => {
            read_workbook(path, config.sheet.as_deref())?
        }
        _ => {
            return Err(AppError::DataSource(format!(
                "ledger file '{}' has an unsupported format; expected .csv, .{}",
                path.display(),
                WORKBOOK_EXTENSIONS.join(", .")
            )));
        }
    };

    let as_of = config.as_of.unwrap_or_else(|| Local::now().date_naive());
    let ledger = build_ledger(
        table,
        &path.display().to_string(),
        &config.salesperson_column,
        as_of,
        config.include_settled,
    )?;

    info!(
        path = %path.display(),
        rows = ledger.len(),
        salespeople = ledger.salesperson_roster().len(),
        "ledger loaded"
    );

    Ok(ledger)
}

fn read_csv_file(path: &Path) -> AppResult<RawTable> {
    let bytes = std::fs::read(path).map_err(|error| {
        AppError::DataSource(format!(
            "failed to read ledger file '{}': {error}",
            path.display()
        ))
    })?;

    let content = decode_csv_bytes(&bytes);
    if content.encoding != UTF_8 {
        debug!(
            path = %path.display(),
            encoding = content.encoding.name(),
            "ledger CSV is not UTF-8, decoded with legacy encoding"
        );
    }

    parse_csv_table(&content.text).map_err(|error| match error {
        AppError::DataSource(message) => {
            AppError::DataSource(format!("ledger file '{}': {message}", path.display()))
        }
        other => other,
    })
}

/// CSV text plus the encoding it was decoded from.
struct DecodedCsv<'a> {
    text: Cow<'a, str>,
    encoding: &'static Encoding,
}

/// Decodes CSV bytes as UTF-8, falling back to Windows-1252 for legacy
/// spreadsheet exports. A UTF-8 byte order mark wins over the fallback.
fn decode_csv_bytes(bytes: &[u8]) -> DecodedCsv<'_> {
    match std::str::from_utf8(bytes) {
        Ok(text) => DecodedCsv {
            text: Cow::Borrowed(text),
            encoding: UTF_8,
        },
        Err(_) => {
            let (text, encoding, _) = WINDOWS_1252.decode(bytes);
            DecodedCsv { text, encoding }
        }
    }
}

/// Parses CSV content. The delimiter is `;` when the header line has more
/// semicolons than commas.
fn parse_csv_table(content: &str) -> AppResult<RawTable> {
    let content = content.trim_start_matches('\u{feff}');
    let header_line = content.lines().next().unwrap_or_default();
    let delimiter = if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table = RawTable::default();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|error| {
            AppError::DataSource(format!("unreadable CSV content: {error}"))
        })?;

        if index == 0 {
            table.headers = record.iter().map(canonical_column_name).collect();
        } else {
            table
                .rows
                .push(record.iter().map(CellValue::from_text).collect());
        }
    }

    Ok(table)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> AppResult<RawTable> {
    let unreadable = |error: calamine::Error| {
        AppError::DataSource(format!(
            "failed to read ledger workbook '{}': {error}",
            path.display()
        ))
    };

    let mut workbook = open_workbook_auto(path).map_err(unreadable)?;
    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(requested) if sheet_names.iter().any(|name| name == requested) => {
            requested.to_owned()
        }
        Some(requested) => {
            return Err(AppError::DataSource(format!(
                "ledger workbook '{}' has no sheet named '{requested}'; available sheets: {}",
                path.display(),
                sheet_names.join(", ")
            )));
        }
        None => sheet_names.first().cloned().ok_or_else(|| {
            AppError::DataSource(format!(
                "ledger workbook '{}' has no sheets",
                path.display()
            ))
        })?,
    };

    let range = workbook.worksheet_range(&sheet_name).map_err(unreadable)?;
    debug!(sheet = sheet_name.as_str(), "reading ledger worksheet");

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header_row| {
            header_row
                .iter()
                .map(|cell| {
                    CellValue::from_workbook(cell)
                        .as_text()
                        .map(|text| canonical_column_name(&text))
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(RawTable {
        headers,
        rows: rows
            .map(|row| row.iter().map(CellValue::from_workbook).collect())
            .collect(),
    })
}

fn build_ledger(
    table: RawTable,
    source: &str,
    salesperson_column: &str,
    as_of: NaiveDate,
    include_settled: bool,
) -> AppResult<Ledger> {
    let layout = ColumnLayout::resolve(&table.headers, salesperson_column).ok_or_else(|| {
        AppError::DataSource(format!(
            "ledger '{source}' is missing required column '{}'; found columns: {}",
            canonical_column_name(salesperson_column),
            table
                .headers
                .iter()
                .filter(|header| !header.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    // Without a balance column every line would read as settled.
    let drops_settled = !include_settled && layout.position_of(LedgerField::Balance).is_some();
    if !include_settled && !drops_settled {
        warn!(source, "ledger has no balance column, settled lines cannot be told apart and are kept");
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    let mut settled_salespeople = Vec::new();
    let mut blank_rows = 0_usize;

    for (index, cells) in table.rows.iter().enumerate() {
        if cells.iter().all(CellValue::is_empty) {
            blank_rows += 1;
            continue;
        }

        // Header is line 1.
        let line = index + 2;
        let row = LedgerRow::new(row_input(cells, &layout, as_of, line));

        if drops_settled && row.balance() <= 0.0 {
            if let Some(salesperson) = row.salesperson() {
                settled_salespeople.push(salesperson.to_owned());
            }
            continue;
        }

        rows.push(row);
    }

    debug!(
        source,
        kept = rows.len(),
        settled = settled_salespeople.len(),
        blank = blank_rows,
        "ledger rows classified"
    );

    Ok(Ledger::with_roster(rows, settled_salespeople))
}

fn row_input(
    cells: &[CellValue],
    layout: &ColumnLayout,
    as_of: NaiveDate,
    line: usize,
) -> LedgerRowInput {
    let field = |field: LedgerField| layout.position_of(field).map(|position| cell_at(cells, position));
    let text = |field_name: LedgerField| field(field_name).and_then(CellValue::as_text);

    let balance = match field(LedgerField::Balance) {
        Some(cell) if !cell.is_empty() => cell.as_amount().unwrap_or_else(|| {
            debug!(line, value = ?cell, "unparseable balance read as zero");
            0.0
        }),
        _ => 0.0,
    };
    let due_date = field(LedgerField::DueDate).and_then(CellValue::as_date);
    let days_overdue = field(LedgerField::DaysOverdue)
        .and_then(CellValue::as_days)
        .or_else(|| due_date.map(|due_date| (as_of - due_date).num_days()));

    LedgerRowInput {
        salesperson: cell_at(cells, layout.salesperson).as_text(),
        client_id: text(LedgerField::ClientId),
        client_name: text(LedgerField::ClientName),
        document: text(LedgerField::Document),
        balance,
        due_date,
        days_overdue,
        phone: text(LedgerField::Phone),
        extra: layout
            .extra
            .iter()
            .filter_map(|(name, position)| {
                cell_at(cells, *position)
                    .as_text()
                    .map(|value| (name.clone(), value))
            })
            .collect(),
    }
}

fn cell_at(cells: &[CellValue], position: usize) -> &CellValue {
    cells.get(position).unwrap_or(&EMPTY_CELL)
}
