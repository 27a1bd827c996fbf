// Output: terminal grid rendering and JSON export of the sample.

pub mod export;
pub mod grid;
