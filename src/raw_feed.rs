use crate::objects::*;
use crate::{Error, FeedReader};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const TABLES: &[&str] = &[
    "calendar.txt",
    "routes.txt",
    "shapes.txt",
    "stops.txt",
    "stop_times.txt",
    "trips.txt",
];

/// The records read from one table of the feed
///
/// A record that could not be read does not stop the reading of the table, its error is kept
/// in `errors` and the next records are read.
#[derive(Debug)]
pub struct RawTable<O> {
    pub file_name: String,
    pub objects: Vec<O>,
    pub errors: Vec<Error>,
}

impl<O> RawTable<O> {
    fn failed(file_name: &str, error: Error) -> Self {
        Self {
            file_name: file_name.to_owned(),
            objects: Vec::new(),
            errors: vec![error],
        }
    }
}

/// Data structure that map the GTFS csv with little intelligence
///
/// The tables are not linked together, a missing table is `None`.
/// To navigate the transit data, [crate::Feed] will be more convenient.
#[derive(Debug)]
pub struct RawFeed {
    /// Time needed to read and parse the tables in milliseconds
    pub read_duration: i64,
    pub calendar: Option<RawTable<Calendar>>,
    pub routes: Option<RawTable<RawRoute>>,
    pub shapes: Option<RawTable<RawShapePoint>>,
    pub stops: Option<RawTable<RawStop>>,
    /// Also `None` when the reader was configured not to read the stop times
    pub stop_times: Option<RawTable<RawStopTime>>,
    pub trips: Option<RawTable<RawTrip>>,
    /// All files that are present in the feed
    pub files: Vec<String>,
}

fn read_objs<T, O>(mut reader: T, file_name: &str) -> RawTable<O>
where
    for<'de> O: Deserialize<'de>,
    T: std::io::Read,
{
    let mut bom = [0; 3];
    if let Err(e) = reader.read_exact(&mut bom) {
        // Smaller than a BOM, the table cannot even hold a header
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return RawTable {
                file_name: file_name.to_owned(),
                objects: Vec::new(),
                errors: Vec::new(),
            };
        }
        return RawTable::failed(
            file_name,
            Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            },
        );
    }

    let chained = if bom != [0xefu8, 0xbbu8, 0xbfu8] {
        bom.chain(reader)
    } else {
        [].chain(reader)
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(chained);
    // We store the headers to be able to return them in case of errors
    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            return RawTable::failed(
                file_name,
                Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                },
            )
        }
    };

    let mut table = RawTable {
        file_name: file_name.to_owned(),
        objects: Vec::new(),
        errors: Vec::new(),
    };
    for rec in reader.records() {
        let r = match rec {
            Ok(r) => r,
            Err(e) => {
                table.errors.push(Error::MalformedRecord {
                    file_name: file_name.to_owned(),
                    line: e.position().map(|p| p.line()),
                    source: e,
                    line_in_error: None,
                });
                continue;
            }
        };
        match r.deserialize(Some(&headers)) {
            Ok(o) => table.objects.push(o),
            Err(e) => table.errors.push(Error::MalformedRecord {
                file_name: file_name.to_owned(),
                line: r.position().map(|p| p.line()),
                source: e,
                line_in_error: Some(crate::error::LineError {
                    headers: headers.iter().map(|s| s.to_owned()).collect(),
                    values: r.iter().map(|s| s.to_owned()).collect(),
                }),
            }),
        }
    }

    table
}

fn read_objs_from_optional_path<O>(dir_path: &Path, file_name: &str) -> Option<RawTable<O>>
where
    for<'de> O: Deserialize<'de>,
{
    let path = dir_path.join(file_name);
    if !path.exists() {
        return None;
    }
    Some(match File::open(path) {
        Ok(r) => read_objs(r, file_name),
        Err(e) => RawTable::failed(
            file_name,
            Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            },
        ),
    })
}

fn read_optional_file<O, T>(
    file_mapping: &HashMap<&str, usize>,
    archive: &mut zip::ZipArchive<T>,
    file_name: &str,
) -> Option<RawTable<O>>
where
    for<'de> O: Deserialize<'de>,
    T: std::io::Read + std::io::Seek,
{
    file_mapping
        .get(file_name)
        .map(|i| match archive.by_index(*i) {
            Ok(file) => read_objs(file, file_name),
            Err(e) => RawTable::failed(
                file_name,
                Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                },
            ),
        })
}

fn table_summary<T>(objs: &Option<RawTable<T>>) -> String {
    match objs {
        Some(table) if table.errors.is_empty() => format!("{} objects", table.objects.len()),
        Some(table) => format!(
            "{} objects, {} unreadable records",
            table.objects.len(),
            table.errors.len()
        ),
        None => "File not present".to_string(),
    }
}

impl RawFeed {
    /// Prints on stdout some basic statistics about the feed (numbers of records for each table)
    pub fn print_stats(&self) {
        println!("GTFS data:");
        println!("  Read in {} ms", self.read_duration);
        println!("  Routes: {}", table_summary(&self.routes));
        println!("  Trips: {}", table_summary(&self.trips));
        println!("  Stops: {}", table_summary(&self.stops));
        println!("  Stop times: {}", table_summary(&self.stop_times));
        println!("  Shapes: {}", table_summary(&self.shapes));
        println!("  Calendar: {}", table_summary(&self.calendar));
    }

    /// Reads the raw feed from a local zip archive or local directory, with the stop times
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        Self::from_path_params(path, &FeedReader::default())
    }

    pub(crate) fn from_path_params<P>(path: P, params: &FeedReader) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();
        if p.is_file() {
            let reader = File::open(p)?;
            Self::from_reader_params(reader, params)
        } else if p.is_dir() {
            Self::from_directory(p, params)
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }

    fn from_directory(p: &Path, params: &FeedReader) -> Result<Self, Error> {
        let now = Utc::now();
        let files = std::fs::read_dir(p)?
            .filter_map(|d| {
                d.ok()
                    .and_then(|e| e.file_name().to_str().map(|s| s.to_owned()))
            })
            .collect();

        Ok(Self {
            calendar: read_objs_from_optional_path(p, "calendar.txt"),
            routes: read_objs_from_optional_path(p, "routes.txt"),
            shapes: read_objs_from_optional_path(p, "shapes.txt"),
            stops: read_objs_from_optional_path(p, "stops.txt"),
            stop_times: if params.read_stop_times {
                read_objs_from_optional_path(p, "stop_times.txt")
            } else {
                None
            },
            trips: read_objs_from_optional_path(p, "trips.txt"),
            read_duration: Utc::now().signed_duration_since(now).num_milliseconds(),
            files,
        })
    }

    /// Reads a zipped feed from any object implementing [std::io::Read] and [std::io::Seek]
    ///
    /// The tables can be at the root of the archive or in a subdirectory.
    pub fn from_reader<T: std::io::Read + std::io::Seek>(reader: T) -> Result<Self, Error> {
        Self::from_reader_params(reader, &FeedReader::default())
    }

    pub(crate) fn from_reader_params<T: std::io::Read + std::io::Seek>(
        reader: T,
        params: &FeedReader,
    ) -> Result<Self, Error> {
        let now = Utc::now();
        let mut archive = zip::ZipArchive::new(std::io::BufReader::new(reader))?;
        let mut file_mapping = HashMap::new();
        let mut files = Vec::new();

        for i in 0..archive.len() {
            let archive_file = archive.by_index(i)?;
            files.push(archive_file.name().to_owned());

            let path = Path::new(archive_file.name());
            // Some archives carry macOS metadata files with the same names
            if path.starts_with("__MACOSX") {
                continue;
            }
            for gtfs_file in TABLES {
                if path.file_name() == Some(std::ffi::OsStr::new(gtfs_file)) {
                    file_mapping.insert(*gtfs_file, i);
                    break;
                }
            }
        }

        Ok(Self {
            calendar: read_optional_file(&file_mapping, &mut archive, "calendar.txt"),
            routes: read_optional_file(&file_mapping, &mut archive, "routes.txt"),
            shapes: read_optional_file(&file_mapping, &mut archive, "shapes.txt"),
            stops: read_optional_file(&file_mapping, &mut archive, "stops.txt"),
            stop_times: if params.read_stop_times {
                read_optional_file(&file_mapping, &mut archive, "stop_times.txt")
            } else {
                None
            },
            trips: read_optional_file(&file_mapping, &mut archive, "trips.txt"),
            read_duration: Utc::now().signed_duration_since(now).num_milliseconds(),
            files,
        })
    }
}
