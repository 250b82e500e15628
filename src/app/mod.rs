// Application layer: drives a query session from the command line.

pub mod runner;

pub use runner::{parse_request_line, run_interactive, run_once, SessionSummary};
