// Primitives for writing and reading CSV text.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::{ensure, OptionExt};

use crate::config::*;

// A cell is a double- or single-quoted span, or a run of characters
// without commas and whitespace, followed by a comma or the end of line.
static HEURISTIC_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s*("[^"]*"|'[^']*'|[^,\s]*)\s*(?:,|$)"#).unwrap());

/// Encodes records as CSV text.
///
/// The columns are the fields of the first record, in order. Other records
/// are read against these columns: a missing field is written as an empty
/// value. Every value is quoted, and every line (the last one included)
/// ends with a newline.
pub fn encode(records: &[Record]) -> Result<String, CodecError> {
    let first = records.first().context(EmptyInputSnafu {})?;
    let columns: Vec<String> = first.keys().map(|k| k.to_string()).collect();
    Ok(write_lines(&columns, records))
}

/// Encodes a table, using its own columns as the header.
pub fn encode_table(table: &Table) -> Result<String, CodecError> {
    ensure!(!table.columns.is_empty(), EmptyInputSnafu {});
    Ok(write_lines(&table.columns, &table.rows))
}

fn write_lines(columns: &[String], records: &[Record]) -> String {
    let header: Vec<String> = columns.iter().map(|c| quote_cell(c)).collect();
    let mut res = header.join(",");
    res.push('\n');
    for record in records.iter() {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| quote_cell(record.get_or_empty(c)))
            .collect();
        res.push_str(&cells.join(","));
        res.push('\n');
    }
    res
}

fn quote_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Decodes CSV text into a table.
///
/// The first line is the header. Quoted fields follow the usual CSV rules:
/// they may contain commas, line breaks and doubled quotes. Blank lines are
/// skipped. Each record takes its values from the columns by position; a
/// missing value is empty and surplus values are dropped.
pub fn decode(text: &str) -> Result<Table, CodecError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Nothing is returned unless every line could be read. Each record is
    // kept with the byte offset where it starts in `text`.
    let mut lines: Vec<(usize, csv::StringRecord)> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let line = line_r.map_err(|e| CodecError::ParseFailure {
            message: format!("line {}: {}", idx + 1, e),
        })?;
        let start = line.position().map(|p| p.byte() as usize).unwrap_or(0);
        lines.push((start, line));
    }

    let (_, header) = lines.first().context(ParseFailureSnafu {
        message: "missing header line",
    })?;
    // The reader already removed the quotes.
    let columns: Vec<String> = header.iter().map(|c| c.trim().to_string()).collect();
    ensure!(
        columns.iter().any(|c| !c.is_empty()),
        ParseFailureSnafu {
            message: "empty header line"
        }
    );
    debug!("decode: columns: {:?}", columns);

    let mut rows: Vec<Record> = Vec::new();
    for (idx, (start, line)) in lines.iter().enumerate().skip(1) {
        // Blank is decided on the raw text: `""` is an empty value, not a
        // blank line.
        let end = lines.get(idx + 1).map(|(s, _)| *s).unwrap_or(text.len());
        let raw = text.get(*start..end).unwrap_or("");
        if line.len() == 1 && raw.trim().is_empty() {
            continue;
        }
        debug!("decode: row: {:?}", line);
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        rows.push(zip_record(&columns, cells));
    }
    Ok(Table { columns, rows })
}

/// Decodes CSV text with the line-oriented heuristic used by older exports.
///
/// The text is split on newlines before any quote handling, so quoted
/// values cannot span lines. Cells are found with a pattern that accepts a
/// double- or single-quoted span or a run of characters without commas and
/// whitespace; one layer of surrounding quotes is then removed. Doubled
/// quotes are not unescaped. Prefer [`decode`] unless the exact behavior of
/// the older reader is required.
pub fn decode_heuristic(text: &str) -> Result<Table, CodecError> {
    let mut lines = text.split('\n');
    let header = lines.next().unwrap_or("");
    let columns: Vec<String> = header.split(',').map(clean_header_cell).collect();
    ensure!(
        columns.iter().any(|c| !c.is_empty()),
        ParseFailureSnafu {
            message: "missing header line"
        }
    );
    debug!("decode_heuristic: columns: {:?}", columns);

    let mut rows: Vec<Record> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = HEURISTIC_CELL
            .captures_iter(line)
            .map(|cap| {
                let cell = cap.get(1).map(|m| m.as_str()).unwrap_or("");
                strip_one_quote_layer(cell.trim()).to_string()
            })
            .collect();
        debug!("decode_heuristic: line: {:?} cells: {:?}", line, cells);
        rows.push(zip_record(&columns, cells));
    }
    Ok(Table { columns, rows })
}

fn clean_header_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

fn strip_one_quote_layer(cell: &str) -> &str {
    let cell = cell
        .strip_prefix('"')
        .or_else(|| cell.strip_prefix('\''))
        .unwrap_or(cell);
    cell.strip_suffix('"')
        .or_else(|| cell.strip_suffix('\''))
        .unwrap_or(cell)
}

fn zip_record(columns: &[String], cells: Vec<String>) -> Record {
    let mut cells = cells.into_iter();
    let mut record = Record::new();
    for col in columns.iter() {
        record.insert(col.clone(), cells.next().unwrap_or_default());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[(&str, &str)]) -> Record {
        fields.iter().cloned().collect()
    }

    #[test]
    fn encode_quotes_every_value() {
        let rows = vec![
            rec(&[("A", "1"), ("B", "2")]),
            rec(&[("A", "3"), ("B", "4")]),
        ];
        assert_eq!(
            encode(&rows).unwrap(),
            "\"A\",\"B\"\n\"1\",\"2\"\n\"3\",\"4\"\n"
        );
    }

    #[test]
    fn encode_escapes_quotes() {
        let rows = vec![rec(&[("Pregunta", "¿\"Sí\" o no?")])];
        assert_eq!(
            encode(&rows).unwrap(),
            "\"Pregunta\"\n\"¿\"\"Sí\"\" o no?\"\n"
        );
    }

    #[test]
    fn encode_reads_columns_from_first_record() {
        let rows = vec![
            rec(&[("A", "1"), ("B", "2")]),
            rec(&[("B", "4"), ("C", "5")]),
        ];
        assert_eq!(
            encode(&rows).unwrap(),
            "\"A\",\"B\"\n\"1\",\"2\"\n\"\",\"4\"\n"
        );
    }

    #[test]
    fn encode_empty_input() {
        assert_eq!(encode(&[]), Err(CodecError::EmptyInput {}));
        assert_eq!(
            encode_table(&Table::default()),
            Err(CodecError::EmptyInput {})
        );
    }

    #[test]
    fn encode_table_without_rows() {
        let table = Table {
            columns: vec!["A".to_string(), "B".to_string()],
            rows: vec![],
        };
        assert_eq!(encode_table(&table).unwrap(), "\"A\",\"B\"\n");
    }

    #[test]
    fn decode_quoted_header() {
        let table = decode("\"Opción\",\"Votos\"\n\"Opción 1\",\"5\"\n").unwrap();
        assert_eq!(table.columns, vec!["Opción", "Votos"]);
        assert_eq!(
            table.rows,
            vec![rec(&[("Opción", "Opción 1"), ("Votos", "5")])]
        );
    }

    #[test]
    fn decode_skips_blank_lines() {
        let text = "A,B\n\"1\",\"2\"\n\n   \n\"3\",\"4\"\n\n";
        for table in [decode(text).unwrap(), decode_heuristic(text).unwrap()] {
            assert_eq!(
                table.rows,
                vec![
                    rec(&[("A", "1"), ("B", "2")]),
                    rec(&[("A", "3"), ("B", "4")]),
                ]
            );
        }
    }

    #[test]
    fn decode_fills_missing_cells() {
        let text = "A,B,C\n1,2\n4,5,6,7\n";
        for table in [decode(text).unwrap(), decode_heuristic(text).unwrap()] {
            assert_eq!(
                table.rows,
                vec![
                    rec(&[("A", "1"), ("B", "2"), ("C", "")]),
                    rec(&[("A", "4"), ("B", "5"), ("C", "6")]),
                ]
            );
        }
    }

    #[test]
    fn decode_crlf() {
        let text = "A,B\r\n\"1\",\"2\"\r\n";
        for table in [decode(text).unwrap(), decode_heuristic(text).unwrap()] {
            assert_eq!(table.columns, vec!["A", "B"]);
            assert_eq!(table.rows, vec![rec(&[("A", "1"), ("B", "2")])]);
        }
    }

    #[test]
    fn decode_without_header() {
        assert!(matches!(
            decode(""),
            Err(CodecError::ParseFailure { .. })
        ));
        assert!(matches!(
            decode_heuristic(""),
            Err(CodecError::ParseFailure { .. })
        ));
        assert!(matches!(
            decode_heuristic("  \n\"1\""),
            Err(CodecError::ParseFailure { .. })
        ));
    }

    #[test]
    fn round_trip() {
        let rows = vec![
            rec(&[("ID", "1"), ("RUT", "12.345.678-5"), ("Opción", "Sí, claro")]),
            rec(&[("ID", "2"), ("RUT", "7.654.321-6"), ("Opción", "")]),
            rec(&[("ID", "3"), ("RUT", " spaced "), ("Opción", "dice \"no\"\ny más")]),
        ];
        let table = decode(&encode(&rows).unwrap()).unwrap();
        assert_eq!(table.columns, vec!["ID", "RUT", "Opción"]);
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn round_trip_single_column_with_empty_values() {
        let rows = vec![
            rec(&[("A", "x")]),
            rec(&[("A", "")]),
            rec(&[("A", "  ")]),
            rec(&[("A", "y")]),
        ];
        let text = encode(&rows).unwrap();
        assert_eq!(text, "\"A\"\n\"x\"\n\"\"\n\"  \"\n\"y\"\n");
        let table = decode(&text).unwrap();
        assert_eq!(table.rows, rows);

        // Blank lines around them are still skipped.
        let table = decode("\"A\"\n\n\"\"\n   \n\"  \"\n\n").unwrap();
        assert_eq!(table.rows, vec![rec(&[("A", "")]), rec(&[("A", "  ")])]);
    }

    #[test]
    fn round_trip_special_column_names() {
        let rows = vec![rec(&[
            ("Opción, texto", "Sí"),
            ("Dice \"hola\"", "1"),
            ("Votos", "2"),
        ])];
        let text = encode(&rows).unwrap();
        assert!(text.starts_with("\"Opción, texto\",\"Dice \"\"hola\"\"\",\"Votos\"\n"));
        let table = decode(&text).unwrap();
        assert_eq!(table.columns, vec!["Opción, texto", "Dice \"hola\"", "Votos"]);
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn heuristic_round_trip_without_quotes_or_newlines() {
        let rows = vec![
            rec(&[("Opción", "Opción 1"), ("Votos", "3"), ("Porcentaje", "75%")]),
            rec(&[("Opción", "Sí, claro"), ("Votos", "1"), ("Porcentaje", "25%")]),
        ];
        let table = decode_heuristic(&encode(&rows).unwrap()).unwrap();
        assert_eq!(table.rows, rows);
    }

    #[test]
    fn heuristic_single_quotes() {
        let table = decode_heuristic("A,B\n'a b', c \n").unwrap();
        assert_eq!(table.rows, vec![rec(&[("A", "a b"), ("B", "c")])]);
    }

    #[test]
    fn heuristic_splits_lines_before_quotes() {
        let text = encode(&[rec(&[("A", "x\ny"), ("B", "z")])]).unwrap();
        let strict = decode(&text).unwrap();
        assert_eq!(strict.rows, vec![rec(&[("A", "x\ny"), ("B", "z")])]);
        let lossy = decode_heuristic(&text).unwrap();
        assert_eq!(lossy.rows.len(), 2);
        assert_ne!(lossy.rows[0].get("A"), Some("x\ny"));
    }
}
