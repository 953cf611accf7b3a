use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::ConvertError;

/// One data line of the input, split into fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the input.
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Document {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// First data row, used as the type sample.
    pub fn sample(&self) -> Option<&Row> {
        self.rows.first()
    }
}

pub fn read_document(path: &Path, delimiter: u8) -> Result<Document, ConvertError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, delimiter)
}

/// Splits `text` into a header and data rows. Quotes carry no meaning and
/// blank lines are skipped. Every row must have as many fields as the header;
/// all offending lines are reported at once.
pub fn parse_document(text: &str, delimiter: u8) -> Result<Document, ConvertError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => fields(&record?),
        None => return Err(ConvertError::MissingHeader),
    };

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for record in records {
        let record = record?;
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();

        if record.len() != header.len() {
            errors.push(ConvertError::RowWidth {
                line,
                expected: header.len(),
                found: record.len(),
            });
            continue;
        }

        rows.push(Row {
            line,
            fields: fields(&record),
        });
    }

    if let Some(err) = ConvertError::from_many(errors) {
        return Err(err);
    }

    if rows.is_empty() {
        return Err(ConvertError::NoDataRows);
    }

    Ok(Document { header, rows })
}

fn fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_and_rows() {
        let doc = parse_document("one\ttwo\tthree\n12\tyellow\t34\n56\tred\t78\n", b'\t').unwrap();
        assert_eq!(doc.header, vec!["one", "two", "three"]);
        assert_eq!(doc.width(), 3);
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.sample().unwrap().fields, vec!["12", "yellow", "34"]);
        assert_eq!(doc.rows[1].line, 3);
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let doc = parse_document("a\tb\r\n1\t2\r\n\r\n3\t4\r\n", b'\t').unwrap();
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[1].fields, vec!["3", "4"]);
        assert_eq!(doc.rows[1].line, 4);
    }

    #[test]
    fn commas_split_csv_input() {
        let doc = parse_document("one,two\n1,x\n", b',').unwrap();
        assert_eq!(doc.header, vec!["one", "two"]);
        assert_eq!(doc.sample().unwrap().fields, vec!["1", "x"]);
    }

    #[test]
    fn quotes_are_plain_characters() {
        let doc = parse_document("a\tb\n\"x\ty\"\n", b'\t').unwrap();
        assert_eq!(doc.sample().unwrap().fields, vec!["\"x", "y\""]);
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let doc = parse_document("\na\tb\n1\t2\n", b'\t').unwrap();
        assert_eq!(doc.header, vec!["a", "b"]);
        assert_eq!(doc.sample().unwrap().line, 3);
    }

    #[test]
    fn empty_trailing_field_is_kept() {
        let doc = parse_document("a\tb\n1\t\n", b'\t').unwrap();
        assert_eq!(doc.sample().unwrap().fields, vec!["1", ""]);
    }

    #[test]
    fn every_short_or_long_row_is_reported() {
        let err = parse_document("a\tb\n1\n1\t2\n1\t2\t3\n", b'\t').unwrap_err();
        match err {
            ConvertError::Multiple(errors) => {
                assert_eq!(errors.0.len(), 2);
                assert!(matches!(
                    errors.0[0],
                    ConvertError::RowWidth {
                        line: 2,
                        expected: 2,
                        found: 1
                    }
                ));
                assert!(matches!(
                    errors.0[1],
                    ConvertError::RowWidth {
                        line: 4,
                        expected: 2,
                        found: 3
                    }
                ));
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(
            parse_document("", b'\t'),
            Err(ConvertError::MissingHeader)
        ));
        assert!(matches!(
            parse_document("\n\r\n", b'\t'),
            Err(ConvertError::MissingHeader)
        ));
    }

    #[test]
    fn header_only_input_has_no_rows() {
        assert!(matches!(
            parse_document("a\tb\n", b'\t'),
            Err(ConvertError::NoDataRows)
        ));
    }
}
