use crate::results::Record;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Column order of the CSV feed
pub const CSV_HEADER: [&str; 6] = ["title", "genre", "director", "country", "year", "imdb_rating"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    JsonLines,
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension, JSON lines unless it is `.csv`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::JsonLines,
        }
    }
}

/// Streams records to a sink in the chosen format
pub enum RecordWriter<W: Write> {
    JsonLines(W),
    Csv(csv::Writer<W>),
}

impl<W: Write> RecordWriter<W> {
    /// Wrap `inner`; for CSV the header row (and BOM when asked) goes out first
    pub fn new(mut inner: W, format: OutputFormat, bom: bool) -> Result<Self, OutputError> {
        match format {
            OutputFormat::JsonLines => Ok(RecordWriter::JsonLines(inner)),
            OutputFormat::Csv => {
                if bom {
                    inner.write_all(UTF8_BOM)?;
                }
                let mut writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(inner);
                writer.write_record(CSV_HEADER)?;
                Ok(RecordWriter::Csv(writer))
            }
        }
    }

    pub fn write(&mut self, record: &Record) -> Result<(), OutputError> {
        match self {
            RecordWriter::JsonLines(sink) => {
                serde_json::to_writer(&mut *sink, record)?;
                sink.write_all(b"\n")?;
            }
            RecordWriter::Csv(writer) => {
                writer.write_record([
                    &record.title,
                    &record.genre,
                    &record.director,
                    &record.country,
                    &record.year,
                    &record.rating,
                ])?;
            }
        }
        Ok(())
    }

    /// Flush everything and hand back the underlying sink
    pub fn finish(self) -> Result<W, OutputError> {
        match self {
            RecordWriter::JsonLines(mut sink) => {
                sink.flush()?;
                Ok(sink)
            }
            RecordWriter::Csv(writer) => writer
                .into_inner()
                .map_err(|e| OutputError::Io(e.into_error())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            title: "Брат".to_string(),
            genre: "криминальная драма, боевик".to_string(),
            director: "Алексей \"Балабанов\"".to_string(),
            country: "Россия".to_string(),
            year: "1997".to_string(),
            rating: "7.9".to_string(),
        }
    }

    fn render(format: OutputFormat, bom: bool, records: &[Record]) -> Vec<u8> {
        let mut writer = RecordWriter::new(Vec::new(), format, bom).unwrap();
        for record in records {
            writer.write(record).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_csv_starts_with_header() {
        let bytes = render(OutputFormat::Csv, false, &[]);
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "title,genre,director,country,year,imdb_rating\n"
        );
    }

    #[test]
    fn test_csv_row_reads_back() {
        let bytes = render(OutputFormat::Csv, false, &[sample()]);

        let mut reader = csv::ReaderBuilder::new().from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "криминальная драма, боевик");
        assert_eq!(&rows[0][2], "Алексей \"Балабанов\"");
        assert_eq!(&rows[0][5], "7.9");
    }

    #[test]
    fn test_csv_bom_prefix() {
        let bytes = render(OutputFormat::Csv, true, &[]);
        assert!(bytes.starts_with(UTF8_BOM));
        assert!(bytes[UTF8_BOM.len()..].starts_with(b"title,"));
    }

    #[test]
    fn test_json_lines_one_object_per_line() {
        let bytes = render(OutputFormat::JsonLines, true, &[sample(), Record::default()]);
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        let first: Record = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, sample());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("films.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("films.jsonl")), OutputFormat::JsonLines);
        assert_eq!(OutputFormat::from_path(Path::new("films")), OutputFormat::JsonLines);
    }
}
