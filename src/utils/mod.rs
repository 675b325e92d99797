pub mod duration;
pub mod uploads;
