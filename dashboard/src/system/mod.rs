pub mod cluster;
pub mod exec;
pub mod table;
pub mod units;
