/// SGR escape parsing for colored tool output.
pub mod ansi;
pub mod paths;
pub mod probe;
pub mod process;
