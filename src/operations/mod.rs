pub mod add;
pub mod remove;
pub mod report;
pub mod update;
