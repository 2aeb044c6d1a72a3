pub mod catalog;
mod fetch;
mod model;

pub use fetch::{DataProvider, FeedClient, FetchError};
pub use model::{DailyRecord, Field, ProvincialSeries, RegionalSeries, Series};
