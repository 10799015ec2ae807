pub mod charts;
pub mod dashboard;
pub mod domain;
pub mod indicators;
pub mod providers;
