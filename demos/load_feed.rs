use gtfs_feed_graph::{format_time, FeedReader, ServicePattern};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "fixtures/basic".to_owned());
    let short_name = args.next().unwrap_or_else(|| "N".to_owned());

    let feed = FeedReader::default()
        .lenient()
        .read(&path)
        .expect("impossible to read gtfs");
    feed.print_stats();

    for issue in &feed.issues {
        println!("skipped: {}", issue);
    }

    let route = feed
        .route_by_short_name(&short_name)
        .expect("no route with this short name");
    println!("{}: {} trips", route, route.trips.len());
    println!("  headsigns: {}", route.headsigns(&feed).join(", "));
    if let Some(shape) = route.longest_shape(&feed) {
        println!("  longest shape: {}", shape);
    }
    for stop in route.stops(&feed) {
        println!("  stop {}: {}", stop.id, stop);
    }

    if let Some(trip) = route.trips.first().map(|t| &feed.trips[*t]) {
        for st in &trip.stop_times {
            let time = st
                .departure_time
                .map(format_time)
                .unwrap_or_else(|| "--:--:--".to_owned());
            println!("  {} {}", time, st.stop(&feed));
        }
    }

    let schedule = feed.schedule();
    for pattern in &[
        ServicePattern::Weekday,
        ServicePattern::Saturday,
        ServicePattern::Sunday,
    ] {
        println!("{:?}: {:?}", pattern, schedule.pattern(*pattern));
    }
}
