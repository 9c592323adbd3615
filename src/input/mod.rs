mod reader;

pub use reader::{LineSource, ReadOutcome};
