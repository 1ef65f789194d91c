use crate::objects::*;
use crate::{Error, Feed, FeedReader, RawFeed, ServicePattern};
use chrono::{NaiveDate, Weekday};
use std::fs::File;

fn ids<T: Id>(objects: &[&T]) -> Vec<String> {
    objects.iter().map(|o| o.id().to_owned()).collect()
}

#[test]
fn read_routes() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(4, feed.routes.len());
    let route = feed.get_route("1093").unwrap();
    assert_eq!("1093", route.id);
    assert_eq!("N", route.short_name);
    assert_eq!("JUDAH", route.long_name);
    assert_eq!(RouteType::Tramway, route.route_type);
    assert_eq!(Some("SFMTA".to_owned()), route.agency_id);
    assert_eq!(RouteType::Bus, feed.get_route("1096").unwrap().route_type);
}

#[test]
fn route_by_short_name() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let route = feed.route_by_short_name("N").unwrap();
    assert_eq!("N", route.short_name);
    assert_eq!("1093", route.id);
    assert_eq!(4, route.trips.len());
    // 1094 and 1096 are both KT, the first one of routes.txt wins
    assert_eq!("1094", feed.route_by_short_name("KT").unwrap().id);
    match feed.route_by_short_name("Z") {
        Err(Error::NotFound { object_type, key }) => {
            assert_eq!(ObjectType::Route, object_type);
            assert_eq!("Z", key);
        }
        other => panic!("expected not found, got {:?}", other),
    }
}

#[test]
fn read_trips() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(8, feed.trips.len());
    let trip = feed.get_trip("N2").unwrap();
    assert_eq!("1093", trip.route(&feed).id);
    assert_eq!("N_in", trip.shape(&feed).unwrap().id);
    assert_eq!("WKDY", trip.service_id);
    assert_eq!(Some(DirectionType::Inbound), trip.direction);
    assert_eq!(Some("Caltrain via Downtown".to_owned()), trip.headsign);

    let trip = feed.get_trip("L1").unwrap();
    assert_eq!(None, trip.headsign);
    assert_eq!(None, trip.direction);
    assert!(trip.shape.is_none());
}

#[test]
fn trips_without_known_shape() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert!(feed.get_trip("N4").unwrap().shape.is_none());
    assert!(feed.get_trip("KT2").unwrap().shape.is_none());
    assert!(feed.issues.is_empty());
}

#[test]
fn route_trips_in_file_order() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let route = feed.get_route("1093").unwrap();
    let trips: Vec<&str> = route
        .trips
        .iter()
        .map(|t| feed.trips[*t].id.as_str())
        .collect();
    assert_eq!(vec!["N1", "N2", "N3", "N4"], trips);
}

#[test]
fn read_stops() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(6, feed.stops.len());
    let stop = feed.get_stop("4277").unwrap();
    assert_eq!("Judah St & La Playa St", stop.name);
    assert_eq!(37.760, stop.latitude);
    assert_eq!(-122.509, stop.longitude);
    assert_eq!(Some("14277".to_owned()), stop.code);
    assert_eq!(LocationType::StopPoint, stop.location_type);
    assert_eq!(
        LocationType::StopPoint,
        feed.get_stop("4278").unwrap().location_type
    );
    let station = feed.get_stop("9999").unwrap();
    assert_eq!(LocationType::StopArea, station.location_type);
    assert_eq!(None, station.code);
    assert_eq!(Some("Never served".to_owned()), station.description);
    assert!(feed.get_stop("Utopia").is_err());
}

#[test]
fn read_shapes() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(3, feed.shapes.len());

    let shape = feed.get_shape("N_out").unwrap();
    assert_eq!(5, shape.coords.len());
    // the columns are resolved by name, longitude comes first in this file
    assert_eq!(37.7600, shape.coords[0].latitude);
    assert_eq!(-122.5090, shape.coords[0].longitude);
    assert_eq!(Some(1.1), shape.coords[1].dist_traveled);

    assert_eq!(2, feed.get_shape("KT_out").unwrap().coords.len());
}

#[test]
fn shape_points_not_contiguous() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let shape = feed.get_shape("N_in").unwrap();
    let sequences: Vec<u32> = shape.coords.iter().map(|c| c.sequence).collect();
    assert_eq!(vec![10, 20, 30], sequences);
    assert_eq!(-122.4580, shape.coords[1].longitude);
    assert_eq!(None, shape.coords[0].dist_traveled);
}

#[test]
fn shapes_sorted_by_sequence() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    for shape in feed.shapes.values() {
        assert!(shape
            .coords
            .windows(2)
            .all(|w| w[0].sequence <= w[1].sequence));
    }
}

#[test]
fn read_stop_times() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let trip = feed.get_trip("N1").unwrap();
    let stops: Vec<&str> = trip
        .stop_times
        .iter()
        .map(|st| st.stop(&feed).id.as_str())
        .collect();
    assert_eq!(vec!["4277", "4278", "5237"], stops);
    assert_eq!(Some(6 * 3600), trip.stop_times[0].arrival_time);
    assert_eq!(Some(6 * 3600 + 150), trip.stop_times[1].departure_time);
    assert_eq!("N1", feed.trips[trip.stop_times[0].trip].id);
    assert_eq!(Some((6 * 3600, 6 * 3600 + 600)), trip.time_range());

    assert!(feed.trips.values().all(|t| t.is_sorted()));
}

#[test]
fn stop_times_after_midnight() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let trip = feed.get_trip("N2").unwrap();
    assert_eq!(Some(86400 + 5 * 60), trip.stop_times[1].arrival_time);
    assert_eq!(Some(86400 + 20 * 60), trip.stop_times[2].arrival_time);
}

#[test]
fn stop_times_without_times() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let trip = feed.get_trip("N3").unwrap();
    assert_eq!(3, trip.stop_times.len());
    assert_eq!("Judah St & 34th Ave", trip.stop_times[1].stop(&feed).name);
    assert!(trip.stop_times[1].arrival_time.is_none());
    assert!(trip.stop_times[1].departure_time.is_none());
}

#[test]
fn without_stop_times() {
    let feed = Feed::load("fixtures/basic", false).expect("impossible to read gtfs");
    assert_eq!(8, feed.trips.len());
    assert!(feed.trips.values().all(|t| t.stop_times.is_empty()));
    assert!(feed.get_route("1093").unwrap().stops(&feed).is_empty());

    let raw = FeedReader::default()
        .without_stop_times()
        .raw_from_path("fixtures/basic")
        .expect("impossible to read gtfs");
    assert!(raw.stop_times.is_none());
}

#[test]
fn route_shapes() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let route = feed.route_by_short_name("N").unwrap();
    // N1 and N3 share N_out, N4 has no shape
    assert_eq!(vec!["N_out", "N_in"], ids(&route.shapes(&feed)));
    assert_eq!("N_out", route.longest_shape(&feed).unwrap().id);

    let route = feed.get_route("1094").unwrap();
    assert_eq!(vec!["KT_out"], ids(&route.shapes(&feed)));

    let route = feed.get_route("1095").unwrap();
    assert!(route.shapes(&feed).is_empty());
    assert!(route.longest_shape(&feed).is_none());
}

#[test]
fn route_stops() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let route = feed.route_by_short_name("N").unwrap();
    assert_eq!(
        vec!["4277", "4278", "5237", "6994"],
        ids(&route.stops(&feed))
    );
    let route = feed.get_route("1094").unwrap();
    assert_eq!(vec!["6994", "7145"], ids(&route.stops(&feed)));
}

#[test]
fn route_headsigns() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let route = feed.route_by_short_name("N").unwrap();
    assert_eq!(
        vec!["Ocean Beach", "Caltrain via Downtown"],
        route.headsigns(&feed)
    );
    assert!(feed.get_route("1095").unwrap().headsigns(&feed).is_empty());
}

#[test]
fn read_calendar() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(3, feed.calendar.len());
    let calendar = feed.get_calendar("SAT").unwrap();
    assert!(!calendar.monday);
    assert!(calendar.saturday);
    assert!(calendar.valid_weekday(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
    assert!(!calendar.valid_weekday(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()));
    assert!(!calendar.valid_weekday(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
}

#[test]
fn schedule() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let schedule = feed.schedule();
    for day in &[
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ] {
        assert_eq!(Some("WKDY"), schedule.service(*day));
    }
    assert_eq!(Some("SAT"), schedule.service(Weekday::Sat));
    assert_eq!(Some("SUN"), schedule.service_by_index(6));
    assert_eq!(Some("WKDY"), schedule.pattern(ServicePattern::Weekday));
    assert_eq!(Some("SAT"), schedule.pattern(ServicePattern::Saturday));
    assert_eq!(Some("SUN"), schedule.pattern(ServicePattern::Sunday));
}

#[test]
fn load_twice() {
    let first = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    let second = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!(first.routes.len(), second.routes.len());
    assert_eq!(first.trips.len(), second.trips.len());
    assert_eq!(first.stops.len(), second.stops.len());
    assert_eq!(first.shapes.len(), second.shapes.len());
    assert_eq!(first.schedule(), second.schedule());
    for route in first.routes.values() {
        let other = second.get_route(&route.id).unwrap();
        assert_eq!(ids(&route.shapes(&first)), ids(&other.shapes(&second)));
        assert_eq!(ids(&route.stops(&first)), ids(&other.stops(&second)));
        assert_eq!(route.headsigns(&first), other.headsigns(&second));
        assert_eq!(
            route.longest_shape(&first).map(|s| s.id.clone()),
            other.longest_shape(&second).map(|s| s.id.clone())
        );
    }
}

#[test]
fn dangling_references_fail() {
    match Feed::from_path("fixtures/dangling") {
        Err(Error::InvalidFeed(errors)) => {
            assert_eq!(3, errors.len());
            assert!(errors
                .iter()
                .all(|e| matches!(e, Error::DanglingReference { .. })));
            match &errors[0] {
                Error::DanglingReference {
                    file_name,
                    object_type,
                    id,
                } => {
                    assert_eq!("trips.txt", file_name);
                    assert_eq!(&ObjectType::Route, object_type);
                    assert_eq!("R404", id);
                }
                other => panic!("unexpected error {}", other),
            }
        }
        other => panic!("expected an invalid feed, got {:?}", other),
    }
}

#[test]
fn dangling_references_skipped() {
    let feed = FeedReader::default()
        .skip_dangling_references()
        .read("fixtures/dangling")
        .expect("impossible to read gtfs");
    assert_eq!(1, feed.trips.len());
    assert!(feed.get_trip("T2").is_err());
    assert_eq!(1, feed.get_route("R1").unwrap().trips.len());
    assert_eq!(1, feed.get_trip("T1").unwrap().stop_times.len());
    assert_eq!(3, feed.issues.len());
    assert!(matches!(
        &feed.issues[1],
        Error::DanglingReference { object_type: ObjectType::Stop, id, .. } if id == "S404"
    ));
    assert!(matches!(
        &feed.issues[2],
        Error::DanglingReference { object_type: ObjectType::Trip, id, .. } if id == "T2"
    ));
}

#[test]
fn malformed_records_fail() {
    match Feed::from_path("fixtures/malformed") {
        Err(Error::InvalidFeed(errors)) => {
            assert_eq!(4, errors.len());
            assert!(matches!(errors[0], Error::DuplicateId { .. }));
        }
        other => panic!("expected an invalid feed, got {:?}", other),
    }
}

#[test]
fn malformed_records_skipped() {
    let feed = FeedReader::default()
        .skip_malformed_records()
        .read("fixtures/malformed")
        .expect("impossible to read gtfs");
    assert_eq!(4, feed.issues.len());
    assert_eq!(1, feed.routes.len());
    assert_eq!("One", feed.get_route("R1").unwrap().long_name);
    assert_eq!(2, feed.stops.len());
    assert!(feed.get_stop("S3").is_err());

    let sequences: Vec<u32> = feed
        .get_trip("T1")
        .unwrap()
        .stop_times
        .iter()
        .map(|st| st.stop_sequence)
        .collect();
    assert_eq!(vec![1, 4], sequences);

    match &feed.issues[1] {
        Error::MalformedRecord {
            file_name,
            line,
            line_in_error,
            ..
        } => {
            assert_eq!("stops.txt", file_name);
            assert_eq!(&Some(4), line);
            let line_in_error = line_in_error.as_ref().unwrap();
            assert_eq!("stop_lat", line_in_error.headers[2]);
            assert_eq!("abc", line_in_error.values[2]);
        }
        other => panic!("unexpected error {}", other),
    }
}

#[test]
fn overflowing_time_is_malformed() {
    match Feed::from_path("fixtures/overflowing_time") {
        Err(Error::InvalidFeed(errors)) => assert_eq!(1, errors.len()),
        other => panic!("expected an invalid feed, got {:?}", other.map(|_| ())),
    }

    let feed = FeedReader::default()
        .skip_malformed_records()
        .read("fixtures/overflowing_time")
        .expect("impossible to read gtfs");
    assert_eq!(1, feed.issues.len());
    match &feed.issues[0] {
        Error::MalformedRecord {
            file_name,
            line,
            line_in_error,
            ..
        } => {
            assert_eq!("stop_times.txt", file_name);
            assert_eq!(&Some(3), line);
            let line_in_error = line_in_error.as_ref().unwrap();
            assert_eq!("arrival_time", line_in_error.headers[1]);
            assert_eq!("9999999:00:00", line_in_error.values[1]);
        }
        other => panic!("unexpected error {}", other),
    }
    assert_eq!(1, feed.get_trip("T1").unwrap().stop_times.len());
    assert_eq!(
        Some(1_193_046 * 3600),
        feed.get_trip("T2").unwrap().stop_times[0].arrival_time
    );
}

#[test]
fn optional_tables_missing() {
    let feed = Feed::from_path("fixtures/only_required").expect("impossible to read gtfs");
    assert!(feed.issues.is_empty());
    assert!(feed.shapes.is_empty());
    assert!(feed.calendar.is_empty());
    assert_eq!(crate::Schedule::default(), feed.schedule());
    assert_eq!(2, feed.trips.len());
    assert!(feed.trips.values().all(|t| t.shape.is_none()));
    let route = feed.get_route("R1").unwrap();
    assert!(route.longest_shape(&feed).is_none());
    assert!(route.headsigns(&feed).is_empty());
}

#[test]
fn core_table_missing() {
    let feed = FeedReader::default()
        .lenient()
        .read("fixtures/missing_stops")
        .expect("a missing table is read as empty");
    assert!(feed.stops.is_empty());
    assert_eq!(2, feed.trips.len());
    assert!(matches!(&feed.issues[..], [Error::MissingTable(t)] if t == "stops.txt"));
}

#[test]
fn not_a_feed() {
    assert!(matches!(
        Feed::from_path("fixtures/does_not_exist"),
        Err(Error::NotFileNorDirectory(_))
    ));
}

#[test]
fn read_from_zip() {
    let feed = Feed::from_path("fixtures/zips/basic.zip").expect("impossible to read gtfs");
    assert_eq!(4, feed.routes.len());
    assert_eq!(8, feed.trips.len());
    assert_eq!(6, feed.stops.len());
    assert_eq!(3, feed.shapes.len());
    assert_eq!(3, feed.calendar.len());
    assert_eq!(3, feed.get_trip("N1").unwrap().stop_times.len());

    let reader = File::open("fixtures/zips/basic.zip").unwrap();
    let feed = FeedReader::default()
        .without_stop_times()
        .read_from_reader(reader)
        .expect("impossible to read gtfs");
    assert!(feed.get_trip("N1").unwrap().stop_times.is_empty());
}

#[test]
fn raw_feed_files() {
    let raw = RawFeed::from_path("fixtures/zips/basic.zip").expect("impossible to read gtfs");
    assert_eq!(6, raw.files.len());
    assert!(raw.files.contains(&"feed/routes.txt".to_owned()));
    assert_eq!(10, raw.shapes.unwrap().objects.len());

    let raw = RawFeed::from_path("fixtures/only_required").expect("impossible to read gtfs");
    assert_eq!(3, raw.files.len());
    assert!(raw.shapes.is_none());
    assert_eq!(2, raw.trips.unwrap().objects.len());
}

#[test]
fn display() {
    let feed = Feed::from_path("fixtures/basic").expect("impossible to read gtfs");
    assert_eq!("JUDAH", format!("{}", feed.get_route("1093").unwrap()));
    assert_eq!(
        "N1 to Ocean Beach",
        format!("{}", feed.get_trip("N1").unwrap())
    );
    assert_eq!("L1", format!("{}", feed.get_trip("L1").unwrap()));
    assert_eq!("N_in (3 points)", format!("{}", feed.get_shape("N_in").unwrap()));
    assert_eq!(
        "Sorano".to_owned(),
        format!(
            "{}",
            Stop {
                name: "Sorano".to_owned(),
                ..Stop::default()
            }
        )
    );
}
