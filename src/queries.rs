//! Read-only views computed from a loaded [Feed]
//!
//! The objects only hold handles, so every query takes the feed they belong to.
//! Results are in order of first appearance, following the order of the trips in trips.txt,
//! which makes them identical between two loads of the same feed.

use crate::objects::*;
use crate::Feed;
use itertools::Itertools;

impl Route {
    /// The distinct shapes used by the trips of the route, trips without shape are ignored
    pub fn shapes<'a>(&self, feed: &'a Feed) -> Vec<&'a Shape> {
        self.trips
            .iter()
            .filter_map(|t| feed.trips[*t].shape)
            .unique()
            .map(|s| &feed.shapes[s])
            .collect()
    }

    /// The shape with the most points, on a tie the first one of [Route::shapes] is returned
    pub fn longest_shape<'a>(&self, feed: &'a Feed) -> Option<&'a Shape> {
        let mut longest: Option<&Shape> = None;
        for shape in self.shapes(feed) {
            if longest.map_or(true, |l| shape.coords.len() > l.coords.len()) {
                longest = Some(shape);
            }
        }
        longest
    }

    /// The distinct stops served by the route
    ///
    /// They come from the stop times, not from the shapes, so the stop times must have been read.
    pub fn stops<'a>(&self, feed: &'a Feed) -> Vec<&'a Stop> {
        self.trips
            .iter()
            .flat_map(|t| feed.trips[*t].stop_times.iter())
            .map(|st| st.stop)
            .unique()
            .map(|s| &feed.stops[s])
            .collect()
    }

    /// The distinct headsigns of the trips of the route
    pub fn headsigns<'a>(&self, feed: &'a Feed) -> Vec<&'a str> {
        self.trips
            .iter()
            .filter_map(|t| feed.trips[*t].headsign.as_deref())
            .unique()
            .collect()
    }
}

impl Trip {
    pub fn route<'a>(&self, feed: &'a Feed) -> &'a Route {
        &feed.routes[self.route]
    }

    pub fn shape<'a>(&self, feed: &'a Feed) -> Option<&'a Shape> {
        self.shape.map(|s| &feed.shapes[s])
    }

    /// Whether the stop times are in ascending sequence, which holds for every loaded trip
    pub fn is_sorted(&self) -> bool {
        self.stop_times
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.stop_sequence <= b.stop_sequence)
    }

    /// First departure and last arrival of the trip, if those stops have times
    pub fn time_range(&self) -> Option<(u32, u32)> {
        let first = self.stop_times.first()?.departure_time?;
        let last = self.stop_times.last()?.arrival_time?;
        Some((first, last))
    }
}

impl StopTime {
    pub fn stop<'a>(&self, feed: &'a Feed) -> &'a Stop {
        &feed.stops[self.stop]
    }
}
