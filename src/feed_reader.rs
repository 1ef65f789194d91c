use crate::{Error, Feed, RawFeed};
use std::path::Path;

/// What to do with a record that cannot be loaded
#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep loading to collect every problem, then fail the whole load with [Error::InvalidFeed]
    #[derivative(Default)]
    Fail,
    /// Drop the record, log a warning and keep the error in [Feed::issues]
    Skip,
}

/// Allows to parameterize how the feed is loaded
///
/// ```
///let feed = gtfs_feed_graph::FeedReader::default()
///    .without_stop_times()
///    .read("fixtures/basic")?;
///assert!(feed.get_trip("N1")?.stop_times.is_empty());
/// # Ok::<(), gtfs_feed_graph::Error>(())
///```
#[derive(Derivative, Debug, Clone)]
#[derivative(Default)]
pub struct FeedReader {
    /// [crate::objects::StopTime] are very large and not always needed. This allows to skip reading them
    #[derivative(Default(value = "true"))]
    pub read_stop_times: bool,
    /// Policy for records that cannot be deserialized and for duplicated ids
    pub malformed_records: ErrorPolicy,
    /// Policy for trips and stop times referencing an unknown route, trip or stop
    pub dangling_references: ErrorPolicy,
}

impl FeedReader {
    /// Configures the reader to not read the stop times
    ///
    /// This can be useful to save time and memory with large datasets when the timetable are not needed
    /// Returns Self and can be chained
    pub fn without_stop_times(&mut self) -> &mut Self {
        self.read_stop_times = false;
        self
    }

    pub fn read_stop_times(&mut self, read_stop_times: bool) -> &mut Self {
        self.read_stop_times = read_stop_times;
        self
    }

    /// Malformed records and duplicated ids are dropped instead of failing the load
    pub fn skip_malformed_records(&mut self) -> &mut Self {
        self.malformed_records = ErrorPolicy::Skip;
        self
    }

    /// Trips and stop times referencing unknown objects are dropped instead of failing the load
    pub fn skip_dangling_references(&mut self) -> &mut Self {
        self.dangling_references = ErrorPolicy::Skip;
        self
    }

    /// Skips every record that cannot be loaded, the problems are listed in [Feed::issues]
    pub fn lenient(&mut self) -> &mut Self {
        self.skip_malformed_records().skip_dangling_references()
    }

    /// Reads a feed from a local path, either a directory or a zipped file
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Feed, Error> {
        self.raw_from_path(path)
            .and_then(|raw| Feed::try_from_params(raw, self))
    }

    /// Reads the raw feed from a local zip archive or local directory
    pub fn raw_from_path<P: AsRef<Path>>(&self, path: P) -> Result<RawFeed, Error> {
        RawFeed::from_path_params(path, self)
    }

    /// Reads a zipped feed from any object implementing [std::io::Read] and [std::io::Seek]
    pub fn read_from_reader<T: std::io::Read + std::io::Seek>(
        &self,
        reader: T,
    ) -> Result<Feed, Error> {
        RawFeed::from_reader_params(reader, self).and_then(|raw| Feed::try_from_params(raw, self))
    }
}
