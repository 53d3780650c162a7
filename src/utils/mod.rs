mod maths_utils;
mod perf;
mod time_utils;

pub use time_utils::{TimeUtils, epoch_sec_to_date, format_duration};

pub(crate) use maths_utils::{get_max, get_min, mean, round_to_places};
