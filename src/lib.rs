/*! Loads a [GTFS feed](https://gtfs.org/reference/static) in memory, linking its objects together.

Each trip knows its route and its shape, each route its trips, and each stop time its trip and
its stop. The links are resolved once at load time so navigating the feed needs no lookup by id.

The tables are read by header name with [csv](https://crates.io/crates/csv) and
[serde](https://serde.rs). A missing table is read as empty.
Records that cannot be loaded either fail the load or are skipped, see [FeedReader].

```
let feed = gtfs_feed_graph::Feed::load("fixtures/basic", true)?;
let route = feed.route_by_short_name("N")?;
let longest = route.longest_shape(&feed).expect("the route has shapes");
println!("{} runs along {} points", route, longest.coords.len());
# Ok::<(), gtfs_feed_graph::Error>(())
```

The [RawFeed] structure gives access to the records of each table before linking.
*/
#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod collection;
pub mod error;
mod feed;
mod feed_reader;
pub mod objects;
mod queries;
mod raw_feed;
mod schedule;
mod serde_helpers;

#[cfg(test)]
mod tests;

pub use collection::{Collection, Index};
pub use error::Error;
pub use feed::Feed;
pub use feed_reader::{ErrorPolicy, FeedReader};
pub use objects::*;
pub use raw_feed::{RawFeed, RawTable};
pub use schedule::{Schedule, ServicePattern};
pub use serde_helpers::{format_time, parse_time};
