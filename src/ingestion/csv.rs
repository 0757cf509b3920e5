//! # CSV Record Feed
//!
//! Streams raw records out of a local delimited file. Transport is chosen by
//! extension: a `.gz` suffix wraps the buffered reader in a gzip decoder
//! before the CSV parser sees it, so compressed and plain datasets are
//! interchangeable.

use crate::errors::{Result, SearchError};
use crate::ingestion::{RawZipRecord, RecordFeed};
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Record feed over a headered, delimited file.
pub struct CsvFeed {
    name: String,
    reader: csv::Reader<Box<dyn Read + Send>>,
}

impl std::fmt::Debug for CsvFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvFeed").field("name", &self.name).finish()
    }
}

impl CsvFeed {
    /// Open `path` and prepare a CSV reader over it. The first row must be
    /// a header naming the `Zipcode`, `City`, and `State` columns.
    pub fn open(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let stream = open_stream(path)?;
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(true)
            .from_reader(stream);

        Ok(Self {
            name: path.display().to_string(),
            reader,
        })
    }
}

/// Opens the file, buffers it, and optionally wraps it in a gzip decoder.
/// Returns a generic reader so the parser doesn't care about compression.
fn open_stream(path: &Path) -> Result<Box<dyn Read + Send>> {
    let file = File::open(path).map_err(|e| SearchError::DatasetIo {
        path: path.display().to_string(),
        details: e.to_string(),
    })?;

    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

#[async_trait]
impl RecordFeed for CsvFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_record(&mut self) -> Result<Option<RawZipRecord>> {
        match self.reader.deserialize::<RawZipRecord>().next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(SearchError::DataParsing {
                feed: self.name.clone(),
                details: e.to_string(),
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn drain(feed: &mut CsvFeed) -> Result<Vec<RawZipRecord>> {
        let mut records = Vec::new();
        while let Some(record) = feed.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    #[tokio::test]
    async fn test_reads_headered_rows_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Zipcode,City,State").unwrap();
        writeln!(file, "07405,BUTLER,NJ").unwrap();
        writeln!(file, "12345,Butler,PA").unwrap();
        file.flush().unwrap();

        let mut feed = CsvFeed::open(file.path(), ',').unwrap();
        let records = drain(&mut feed).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].zipcode, "07405");
        assert_eq!(records[0].city, "BUTLER");
        assert_eq!(records[1].state, "PA");
    }

    #[tokio::test]
    async fn test_gzip_transport() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zipcodes.csv.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        writeln!(encoder, "Zipcode,City,State").unwrap();
        writeln!(encoder, "33333,Buchanan,GA").unwrap();
        encoder.finish().unwrap();

        let mut feed = CsvFeed::open(&path, ',').unwrap();
        let records = drain(&mut feed).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].city, "Buchanan");
    }

    #[tokio::test]
    async fn test_short_row_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Zipcode,City,State").unwrap();
        writeln!(file, "07405,Butler").unwrap();
        file.flush().unwrap();

        let mut feed = CsvFeed::open(file.path(), ',').unwrap();
        let err = drain(&mut feed).await.unwrap_err();
        assert!(matches!(err, SearchError::DataParsing { .. }));
    }

    #[test]
    fn test_missing_file_is_dataset_io() {
        let err = CsvFeed::open("definitely/not/here.csv", ',').unwrap_err();
        assert!(matches!(err, SearchError::DatasetIo { .. }));
    }
}
