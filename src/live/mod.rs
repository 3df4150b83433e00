pub mod buffer;
pub mod session;

pub use buffer::SlidingWindowBuffer;
pub use session::{
    ActivityEvent, LiveSession, LiveSessionSnapshot, ACTIVITY_WINDOW_CAPACITY,
    SCORE_WINDOW_CAPACITY,
};
