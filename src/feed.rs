use crate::collection::{Collection, Index};
use crate::objects::*;
use crate::raw_feed::{RawFeed, RawTable};
use crate::{Error, ErrorPolicy, FeedReader};
use std::collections::HashMap;
use std::path::Path;

/// A GTFS feed with all its objects linked together
///
/// Trips know their route and shape, stop times know their trip and stop.
/// The links are [Index] handles into the collections of the feed, the feed is immutable once loaded.
#[derive(Debug, Default)]
pub struct Feed {
    /// Time needed to read and link the feed in milliseconds
    pub read_duration: i64,
    pub routes: Collection<Route>,
    pub trips: Collection<Trip>,
    pub stops: Collection<Stop>,
    pub shapes: Collection<Shape>,
    pub calendar: Collection<Calendar>,
    /// Problems that did not stop the loading, the corresponding records were dropped
    pub issues: Vec<Error>,
    short_names: HashMap<String, Index<Route>>,
}

/// Collects the problems found while linking, according to the reader policies
struct Issues<'a> {
    params: &'a FeedReader,
    fatal: Vec<Error>,
    skipped: Vec<Error>,
}

impl<'a> Issues<'a> {
    fn new(params: &'a FeedReader) -> Self {
        Self {
            params,
            fatal: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn report(&mut self, error: Error) {
        let policy = match error {
            Error::DanglingReference { .. } => self.params.dangling_references,
            _ => self.params.malformed_records,
        };
        match policy {
            ErrorPolicy::Fail => self.fatal.push(error),
            ErrorPolicy::Skip => {
                warn!("record skipped: {}", error);
                self.skipped.push(error);
            }
        }
    }

    /// Takes the records of a table, reporting the ones that could not be read
    fn records<O>(
        &mut self,
        table: Option<RawTable<O>>,
        file_name: &str,
        required: bool,
    ) -> Vec<O> {
        match table {
            Some(table) => {
                for e in table.errors {
                    self.report(e);
                }
                table.objects
            }
            None if required => {
                warn!("{} is missing, it is read as empty", file_name);
                self.skipped.push(Error::MissingTable(file_name.to_owned()));
                Vec::new()
            }
            None => {
                debug!("{} is not present", file_name);
                Vec::new()
            }
        }
    }

    fn insert<T: Id + Type>(&mut self, collection: &mut Collection<T>, o: T) -> Option<Index<T>> {
        collection.insert(o).map_err(|e| self.report(e)).ok()
    }
}

impl Feed {
    /// Reads a feed from a local path (either a directory or a zipped file), with the stop times
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Feed, Error> {
        FeedReader::default().read(path)
    }

    /// Reads a feed from a local path, `stop_times.txt` is only read if `load_stop_times` is true
    ///
    /// Large feeds can have millions of stop times, skipping them is much faster.
    pub fn load<P: AsRef<Path>>(path: P, load_stop_times: bool) -> Result<Feed, Error> {
        FeedReader::default()
            .read_stop_times(load_stop_times)
            .read(path)
    }

    /// Reads a zipped feed from any object implementing [std::io::Read] and [std::io::Seek]
    pub fn from_reader<T: std::io::Read + std::io::Seek>(reader: T) -> Result<Feed, Error> {
        FeedReader::default().read_from_reader(reader)
    }

    /// Links the tables of a raw feed with the default policies
    pub fn try_from(raw: RawFeed) -> Result<Feed, Error> {
        Feed::try_from_params(raw, &FeedReader::default())
    }

    /// Links the tables of a raw feed
    ///
    /// The tables are linked in a fixed order: shapes, routes, trips, stops, stop times then calendar,
    /// as trips need routes and shapes and stop times need trips and stops.
    pub fn try_from_params(raw: RawFeed, params: &FeedReader) -> Result<Feed, Error> {
        let now = chrono::Utc::now();
        let mut issues = Issues::new(params);
        let mut feed = Feed::default();

        let shapes = issues.records(raw.shapes, "shapes.txt", false);
        feed.shapes = create_shapes(shapes);

        let routes = issues.records(raw.routes, "routes.txt", true);
        feed.create_routes(routes, &mut issues);

        let trips = issues.records(raw.trips, "trips.txt", true);
        let stops = issues.records(raw.stops, "stops.txt", true);
        feed.create_trips(trips, &mut issues);
        for stop in stops {
            issues.insert(&mut feed.stops, Stop::from(stop));
        }

        if params.read_stop_times {
            let stop_times = issues.records(raw.stop_times, "stop_times.txt", false);
            feed.link_stop_times(stop_times, &mut issues);
        }

        for calendar in issues.records(raw.calendar, "calendar.txt", false) {
            issues.insert(&mut feed.calendar, calendar);
        }

        if !issues.fatal.is_empty() {
            return Err(Error::InvalidFeed(issues.fatal));
        }
        feed.issues = issues.skipped;
        feed.read_duration = raw.read_duration
            + chrono::Utc::now()
                .signed_duration_since(now)
                .num_milliseconds();
        info!(
            "feed loaded in {} ms: {} routes, {} trips, {} stops, {} shapes, {} issues",
            feed.read_duration,
            feed.routes.len(),
            feed.trips.len(),
            feed.stops.len(),
            feed.shapes.len(),
            feed.issues.len()
        );
        Ok(feed)
    }

    fn create_routes(&mut self, raw_routes: Vec<RawRoute>, issues: &mut Issues) {
        for raw in raw_routes {
            let short_name = raw.short_name.clone();
            if let Some(index) = issues.insert(&mut self.routes, Route::from(raw)) {
                // Short names are not unique, the first route of routes.txt is kept
                self.short_names.entry(short_name).or_insert(index);
            }
        }
    }

    fn create_trips(&mut self, raw_trips: Vec<RawTrip>, issues: &mut Issues) {
        for raw in raw_trips {
            let route = match self.routes.get_index(&raw.route_id) {
                Some(route) => route,
                None => {
                    issues.report(Error::DanglingReference {
                        file_name: "trips.txt".to_owned(),
                        object_type: ObjectType::Route,
                        id: raw.route_id,
                    });
                    continue;
                }
            };
            // A trip does not need a shape, an unknown one is ignored
            let shape = raw.shape_id.as_ref().and_then(|shape_id| {
                let shape = self.shapes.get_index(shape_id);
                if shape.is_none() {
                    debug!("shape {} of trip {} is not known", shape_id, raw.id);
                }
                shape
            });
            let trip = Trip {
                id: raw.id,
                route,
                shape,
                service_id: raw.service_id,
                direction: raw.direction,
                headsign: raw.headsign,
                stop_times: Vec::new(),
            };
            if let Some(index) = issues.insert(&mut self.trips, trip) {
                if let Some(route) = self.routes.get_mut(route) {
                    route.trips.push(index);
                }
            }
        }
    }

    fn link_stop_times(&mut self, raw_stop_times: Vec<RawStopTime>, issues: &mut Issues) {
        for s in raw_stop_times {
            let trip = self.trips.get_index(&s.trip_id);
            let stop = self.stops.get_index(&s.stop_id);
            let (trip, stop) = match (trip, stop) {
                (Some(trip), Some(stop)) => (trip, stop),
                (None, _) => {
                    issues.report(Error::DanglingReference {
                        file_name: "stop_times.txt".to_owned(),
                        object_type: ObjectType::Trip,
                        id: s.trip_id,
                    });
                    continue;
                }
                (_, None) => {
                    issues.report(Error::DanglingReference {
                        file_name: "stop_times.txt".to_owned(),
                        object_type: ObjectType::Stop,
                        id: s.stop_id,
                    });
                    continue;
                }
            };
            if let Some(t) = self.trips.get_mut(trip) {
                t.stop_times.push(StopTime::from(&s, trip, stop));
            }
        }

        for trip in self.trips.values_mut() {
            trip.stop_times.sort_by_key(|st| st.stop_sequence);
        }
    }

    /// Prints on stdout the number of objects of the feed
    pub fn print_stats(&self) {
        println!("GTFS data:");
        println!("  Read in {} ms", self.read_duration);
        println!("  Routes: {}", self.routes.len());
        println!("  Trips: {}", self.trips.len());
        println!("  Stops: {}", self.stops.len());
        println!("  Shapes: {}", self.shapes.len());
        println!("  Calendar: {}", self.calendar.len());
        println!("  Issues: {}", self.issues.len());
    }

    pub fn get_route<'a>(&'a self, id: &str) -> Result<&'a Route, Error> {
        self.routes
            .get_by_id(id)
            .ok_or_else(|| not_found(ObjectType::Route, id))
    }

    pub fn get_trip<'a>(&'a self, id: &str) -> Result<&'a Trip, Error> {
        self.trips
            .get_by_id(id)
            .ok_or_else(|| not_found(ObjectType::Trip, id))
    }

    pub fn get_stop<'a>(&'a self, id: &str) -> Result<&'a Stop, Error> {
        self.stops
            .get_by_id(id)
            .ok_or_else(|| not_found(ObjectType::Stop, id))
    }

    pub fn get_shape<'a>(&'a self, id: &str) -> Result<&'a Shape, Error> {
        self.shapes
            .get_by_id(id)
            .ok_or_else(|| not_found(ObjectType::Shape, id))
    }

    pub fn get_calendar<'a>(&'a self, id: &str) -> Result<&'a Calendar, Error> {
        self.calendar
            .get_by_id(id)
            .ok_or_else(|| not_found(ObjectType::Calendar, id))
    }

    /// The route with this short name
    ///
    /// Short names are not unique in a feed, if several routes share it the first one of
    /// routes.txt is returned.
    pub fn route_by_short_name<'a>(&'a self, short_name: &str) -> Result<&'a Route, Error> {
        self.short_names
            .get(short_name)
            .map(|index| &self.routes[*index])
            .ok_or_else(|| not_found(ObjectType::Route, short_name))
    }
}

fn not_found(object_type: ObjectType, key: &str) -> Error {
    Error::NotFound {
        object_type,
        key: key.to_owned(),
    }
}

/// Groups the shape points by shape, in order of first appearance, and sorts them by sequence
///
/// The points of a shape do not need to be contiguous in shapes.txt.
fn create_shapes(points: Vec<RawShapePoint>) -> Collection<Shape> {
    let mut shapes: Collection<Shape> = Collection::default();
    for p in points {
        match shapes.get_mut_by_id(&p.id) {
            Some(shape) => shape.coords.push(Coord::from(&p)),
            None => {
                let shape = Shape {
                    coords: vec![Coord::from(&p)],
                    id: p.id,
                };
                // the id was just checked to be absent
                let _ = shapes.insert(shape);
            }
        }
    }

    for shape in shapes.values_mut() {
        shape.coords.sort_by_key(|c| c.sequence);
    }
    shapes
}
