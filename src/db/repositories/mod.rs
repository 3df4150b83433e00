pub(crate) mod focus_sessions;
