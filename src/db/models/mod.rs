pub mod focus_session;

pub use focus_session::FocusSession;
