//! CSV exports of company records.
//!
//! An [Export] describes which records to export and how to turn each one
//! into a row of [Cell]s. [write_csv] does the rest: headings, skipping
//! incomplete rows, formatting and guarding against formula injection.

mod endpoint;
mod items;
mod transactions;

use std::io;

use rusqlite::Connection;
use time::{Date, macros::format_description};

use crate::Error;

pub use endpoint::{ExportState, export_items_endpoint, export_transactions_endpoint};
pub use items::ItemsExport;
pub use transactions::TransactionsExport;

/// Characters that make a spreadsheet treat a cell as a formula.
const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// A single value in an exported row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text, guarded against formula injection.
    Text(String),
    /// A whole number.
    Integer(i64),
    /// A number with a fractional part, e.g. an amount.
    Decimal(f64),
    /// Written as `1` or `0`.
    Bool(bool),
    /// Written as `YYYY-MM-DD`.
    Date(Date),
    /// No value.
    Empty,
}

impl Cell {
    /// Whether the cell counts as missing for a required field.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    fn render(&self) -> Result<String, Error> {
        let text = match self {
            Cell::Text(text) if text.starts_with(FORMULA_PREFIXES) => format!("'{text}"),
            Cell::Text(text) => text.clone(),
            Cell::Integer(number) => number.to_string(),
            Cell::Decimal(number) => number.to_string(),
            Cell::Bool(true) => "1".to_owned(),
            Cell::Bool(false) => "0".to_owned(),
            Cell::Date(date) => date
                .format(format_description!("[year]-[month]-[day]"))
                .map_err(|error| Error::ExportError(error.to_string()))?,
            Cell::Empty => String::new(),
        };

        Ok(text)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Cell::Empty, Cell::Text)
    }
}

/// A set of records that can be written as a table.
pub trait Export {
    /// One exported row before mapping.
    type Record;

    /// The name of the export, used as the file name.
    fn title(&self) -> &'static str;

    /// The column headings, in order.
    fn fields(&self) -> &'static [&'static str];

    /// Fields that must have a value for a row to be exported.
    fn required_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Load the records to export.
    fn collection(&self, connection: &Connection) -> Result<Vec<Self::Record>, Error>;

    /// Turn a record into one cell per field.
    fn map(&self, record: &Self::Record) -> Vec<Cell>;
}

/// Write `export` to `writer` as CSV and return the number of rows written,
/// not counting the headings.
///
/// Rows with an empty required field are skipped.
pub fn write_csv<E, W>(export: &E, connection: &Connection, writer: W) -> Result<usize, Error>
where
    E: Export,
    W: io::Write,
{
    let fields = export.fields();
    let required: Vec<usize> = export
        .required_fields()
        .iter()
        .filter_map(|required| fields.iter().position(|field| field == required))
        .collect();

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(fields)?;

    let mut rows_written = 0;

    for record in export.collection(connection)? {
        let cells = export.map(&record);

        if let Some(&missing) = required.iter().find(|&&index| {
            cells.get(index).is_none_or(Cell::is_empty)
        }) {
            tracing::debug!(
                "skipping {} row with missing {}",
                export.title(),
                fields[missing]
            );
            continue;
        }

        let row = cells
            .iter()
            .map(Cell::render)
            .collect::<Result<Vec<String>, Error>>()?;
        csv_writer.write_record(&row)?;
        rows_written += 1;
    }

    csv_writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    Ok(rows_written)
}

#[cfg(test)]
mod write_csv_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::Error;

    use super::{Cell, Export, write_csv};

    struct PeopleExport {
        people: Vec<(Option<String>, i64)>,
    }

    impl Export for PeopleExport {
        type Record = (Option<String>, i64);

        fn title(&self) -> &'static str {
            "people"
        }

        fn fields(&self) -> &'static [&'static str] {
            &["name", "age"]
        }

        fn required_fields(&self) -> &'static [&'static str] {
            &["name"]
        }

        fn collection(&self, _connection: &Connection) -> Result<Vec<Self::Record>, Error> {
            Ok(self.people.clone())
        }

        fn map(&self, record: &Self::Record) -> Vec<Cell> {
            vec![Cell::from(record.0.clone()), Cell::Integer(record.1)]
        }
    }

    fn export_to_string(export: &PeopleExport) -> (usize, String) {
        let connection = Connection::open_in_memory().unwrap();
        let mut buffer = Vec::new();

        let rows = write_csv(export, &connection, &mut buffer).unwrap();

        (rows, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn writes_headings_and_rows() {
        let export = PeopleExport {
            people: vec![(Some("Ada".to_owned()), 36), (Some("Alan".to_owned()), 41)],
        };

        let (rows, text) = export_to_string(&export);

        assert_eq!(rows, 2);
        assert_eq!(text, "name,age\nAda,36\nAlan,41\n");
    }

    #[test]
    fn skips_rows_missing_required_fields() {
        let export = PeopleExport {
            people: vec![
                (None, 1),
                (Some("  ".to_owned()), 2),
                (Some("Grace".to_owned()), 85),
            ],
        };

        let (rows, text) = export_to_string(&export);

        assert_eq!(rows, 1);
        assert_eq!(text, "name,age\nGrace,85\n");
    }

    #[test]
    fn empty_collection_writes_only_headings() {
        let export = PeopleExport { people: vec![] };

        let (rows, text) = export_to_string(&export);

        assert_eq!(rows, 0);
        assert_eq!(text, "name,age\n");
    }

    #[test]
    fn guards_against_formula_injection() {
        for (text, want) in [
            ("=SUM(A1:A2)", "'=SUM(A1:A2)"),
            ("+1", "'+1"),
            ("-1", "'-1"),
            ("@cmd", "'@cmd"),
            ("plain", "plain"),
        ] {
            assert_eq!(Cell::Text(text.to_owned()).render(), Ok(want.to_owned()));
        }
    }

    #[test]
    fn numbers_are_not_guarded() {
        assert_eq!(Cell::Decimal(-12.5).render(), Ok("-12.5".to_owned()));
        assert_eq!(Cell::Integer(-3).render(), Ok("-3".to_owned()));
    }

    #[test]
    fn renders_dates_and_bools() {
        assert_eq!(
            Cell::Date(date!(2024 - 03 - 09)).render(),
            Ok("2024-03-09".to_owned())
        );
        assert_eq!(Cell::Bool(true).render(), Ok("1".to_owned()));
        assert_eq!(Cell::Bool(false).render(), Ok("0".to_owned()));
        assert_eq!(Cell::Empty.render(), Ok(String::new()));
    }
}
