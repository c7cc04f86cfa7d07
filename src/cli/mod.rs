pub mod contribute;
pub mod drift;
pub mod report;
pub mod ui;
