use crate::collection::Index;
use crate::serde_helpers::*;
use chrono::{Datelike, NaiveDate, Weekday};
use std::fmt;

/// Objects having an identifier in the feed
pub trait Id {
    fn id(&self) -> &str;
}

pub trait Type {
    fn object_type(&self) -> ObjectType;
}

/// The kinds of linked objects of a feed
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum ObjectType {
    Stop,
    Route,
    Trip,
    Calendar,
    Shape,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectType::Stop => "stop",
            ObjectType::Route => "route",
            ObjectType::Trip => "trip",
            ObjectType::Calendar => "calendar",
            ObjectType::Shape => "shape",
        };
        write!(f, "{}", name)
    }
}

#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum LocationType {
    #[derivative(Default)]
    #[serde(rename = "0")]
    StopPoint,
    #[serde(rename = "1")]
    StopArea,
    #[serde(rename = "2")]
    StationEntrance,
    #[serde(rename = "3")]
    GenericNode,
    #[serde(rename = "4")]
    BoardingArea,
}

#[derive(Derivative)]
#[derivative(Default)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RouteType {
    Tramway,
    Subway,
    Rail,
    #[derivative(Default)]
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    // Any other value than 0..7 is invalid in the GTFS
    // However, some bad files might have other values
    // We don’t want to stop nor skip too soon during deserialization
    Other(u16),
}

impl<'de> ::serde::Deserialize<'de> for RouteType {
    fn deserialize<D>(deserializer: D) -> Result<RouteType, D::Error>
    where
        D: ::serde::Deserializer<'de>,
    {
        let i = <u16 as ::serde::Deserialize>::deserialize(deserializer)?;
        Ok(match i {
            0 => RouteType::Tramway,
            1 => RouteType::Subway,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            _ => RouteType::Other(i),
        })
    }
}

/// Direction of travel of a trip, inbound/outbound are arbitrary labels of the feed
#[derive(Debug, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DirectionType {
    #[serde(rename = "0")]
    Outbound,
    #[serde(rename = "1")]
    Inbound,
}

/// A service calendar, the days of the week a service runs between two dates
#[derive(Debug, Deserialize)]
pub struct Calendar {
    #[serde(rename = "service_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_bool")]
    pub monday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub tuesday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub wednesday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub thursday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub friday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub saturday: bool,
    #[serde(deserialize_with = "deserialize_bool")]
    pub sunday: bool,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
}

impl Type for Calendar {
    fn object_type(&self) -> ObjectType {
        ObjectType::Calendar
    }
}

impl Id for Calendar {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}—{}", self.start_date, self.end_date)
    }
}

impl Calendar {
    /// Is the service active on this day of the week, whatever the validity period
    pub fn runs_on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn valid_weekday(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date && self.runs_on(date.weekday())
    }
}

/// A stop or station where vehicles pick up or drop off riders
#[derive(Debug, Default)]
pub struct Stop {
    pub id: String,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub location_type: LocationType,
    pub parent_station: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Type for Stop {
    fn object_type(&self) -> ObjectType {
        ObjectType::Stop
    }
}

impl Id for Stop {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<RawStop> for Stop {
    fn from(raw: RawStop) -> Self {
        Self {
            id: raw.id,
            code: raw.code,
            name: raw.name,
            description: raw.description,
            location_type: raw.location_type.unwrap_or_default(),
            parent_station: raw.parent_station,
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

/// A point of a shape, only the sequence order is meaningful
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
    pub sequence: u32,
    pub dist_traveled: Option<f32>,
}

/// The path a vehicle travels, its coordinates are sorted by sequence once the feed is loaded
#[derive(Debug, Default)]
pub struct Shape {
    pub id: String,
    pub coords: Vec<Coord>,
}

impl Type for Shape {
    fn object_type(&self) -> ObjectType {
        ObjectType::Shape
    }
}

impl Id for Shape {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} points)", self.id, self.coords.len())
    }
}

/// The visit of a trip at a stop
///
/// Times are in seconds since midnight of the service day and can exceed 24 hours.
/// They are `None` for stops that are not timepoints.
#[derive(Debug)]
pub struct StopTime {
    pub trip: Index<Trip>,
    pub stop: Index<Stop>,
    pub arrival_time: Option<u32>,
    pub departure_time: Option<u32>,
    pub stop_sequence: u32,
}

impl StopTime {
    pub fn from(raw: &RawStopTime, trip: Index<Trip>, stop: Index<Stop>) -> Self {
        Self {
            trip,
            stop,
            arrival_time: raw.arrival_time,
            departure_time: raw.departure_time,
            stop_sequence: raw.stop_sequence,
        }
    }
}

#[derive(Debug)]
pub struct Route {
    pub id: String,
    pub short_name: String,
    pub long_name: String,
    pub route_type: RouteType,
    pub agency_id: Option<String>,
    /// Trips of the route, in the order of trips.txt
    pub trips: Vec<Index<Trip>>,
}

impl Type for Route {
    fn object_type(&self) -> ObjectType {
        ObjectType::Route
    }
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.long_name.is_empty() {
            write!(f, "{}", self.long_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

impl From<RawRoute> for Route {
    fn from(raw: RawRoute) -> Self {
        Self {
            id: raw.id,
            short_name: raw.short_name,
            long_name: raw.long_name,
            route_type: raw.route_type.unwrap_or_default(),
            agency_id: raw.agency_id,
            trips: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Trip {
    pub id: String,
    pub route: Index<Route>,
    pub shape: Option<Index<Shape>>,
    pub service_id: String,
    pub direction: Option<DirectionType>,
    pub headsign: Option<String>,
    /// Empty unless the stop times were read, sorted by stop sequence
    pub stop_times: Vec<StopTime>,
}

impl Type for Trip {
    fn object_type(&self) -> ObjectType {
        ObjectType::Trip
    }
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.headsign {
            Some(headsign) => write!(f, "{} to {}", self.id, headsign),
            None => write!(f, "{}", self.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawRoute {
    #[serde(rename = "route_id")]
    pub id: String,
    #[serde(rename = "route_short_name", default)]
    pub short_name: String,
    #[serde(rename = "route_long_name", default)]
    pub long_name: String,
    #[serde(default)]
    pub route_type: Option<RouteType>,
    pub agency_id: Option<String>,
}

impl Id for RawRoute {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "trip_id")]
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    #[serde(rename = "trip_headsign")]
    pub headsign: Option<String>,
    #[serde(rename = "direction_id")]
    pub direction: Option<DirectionType>,
    pub shape_id: Option<String>,
}

impl fmt::Display for RawTrip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "route id: {}, service id: {}",
            self.route_id, self.service_id
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct RawStop {
    #[serde(rename = "stop_id")]
    pub id: String,
    #[serde(rename = "stop_code")]
    pub code: Option<String>,
    #[serde(rename = "stop_name", default)]
    pub name: String,
    #[serde(rename = "stop_desc")]
    pub description: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    pub parent_station: Option<String>,
    #[serde(rename = "stop_lat", deserialize_with = "de_with_trimed_float")]
    pub latitude: f64,
    #[serde(rename = "stop_lon", deserialize_with = "de_with_trimed_float")]
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawShapePoint {
    #[serde(rename = "shape_id")]
    pub id: String,
    #[serde(rename = "shape_pt_lat", deserialize_with = "de_with_trimed_float")]
    pub latitude: f64,
    #[serde(rename = "shape_pt_lon", deserialize_with = "de_with_trimed_float")]
    pub longitude: f64,
    #[serde(rename = "shape_pt_sequence")]
    pub sequence: u32,
    #[serde(rename = "shape_dist_traveled")]
    pub dist_traveled: Option<f32>,
}

impl From<&RawShapePoint> for Coord {
    fn from(raw: &RawShapePoint) -> Self {
        Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            sequence: raw.sequence,
            dist_traveled: raw.dist_traveled,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawStopTime {
    pub trip_id: String,
    #[serde(deserialize_with = "deserialize_optional_time", default)]
    pub arrival_time: Option<u32>,
    #[serde(deserialize_with = "deserialize_optional_time", default)]
    pub departure_time: Option<u32>,
    pub stop_id: String,
    pub stop_sequence: u32,
}
