pub mod reconciler;
pub mod time;

pub use reconciler::AttendanceService;
pub use time::SystemClock;
