//! CSV serialization of cleaned table rows.

use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{Result, TableError};
use crate::table::TableRow;

fn has_content(row: &TableRow) -> bool {
    row.iter().any(|cell| !cell.is_empty())
}

/// Write rows as CSV: comma-delimited, every field quoted, embedded quotes
/// doubled, CRLF record terminators.
///
/// Rows without any non-empty field are skipped. Rows may differ in length
/// since each page has its own column anchors.
pub fn write_csv<W: Write>(rows: &[TableRow], out: W) -> Result<()> {
    if rows.is_empty() {
        return Err(TableError::EmptyInput);
    }
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(out);
    for row in rows.iter().filter(|row| has_content(row)) {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Encode rows as a CSV string. Fails with `EmptyInput` for zero rows.
pub fn serialize(rows: &[TableRow]) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| TableError::Serialization {
        source: Box::new(e),
    })
}

/// Download name for a converted document: `<name-without-extension>.csv`.
pub fn csv_file_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "table".to_string());
    format!("{stem}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(serialize(&[]), Err(TableError::EmptyInput)));
    }

    #[test]
    fn every_field_is_quoted() {
        let out = serialize(&[row(&["a,b", "c"])]).unwrap();
        assert_eq!(out, "\"a,b\",\"c\"\r\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let out = serialize(&[row(&["say \"hi\"", ""])]).unwrap();
        assert_eq!(out, "\"say \"\"hi\"\"\",\"\"\r\n");
    }

    #[test]
    fn empty_rows_are_skipped_and_lengths_may_differ() {
        let rows = vec![row(&["a", "b"]), row(&["", ""]), row(&[]), row(&["c"])];
        let out = serialize(&rows).unwrap();
        assert_eq!(out, "\"a\",\"b\"\r\n\"c\"\r\n");
    }

    #[test]
    fn file_name_replaces_extension() {
        assert_eq!(csv_file_name("report.pdf"), "report.csv");
        assert_eq!(csv_file_name("Q3.final.PDF"), "Q3.final.csv");
        assert_eq!(csv_file_name("statement"), "statement.csv");
        assert_eq!(csv_file_name(""), "table.csv");
    }
}
