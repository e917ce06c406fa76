pub mod dates;

pub use dates::{format_day, parse_day, start_of_day_utc, start_of_week_sun, utc_day_of};
