// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod pbs_repo;
pub mod routes;
pub mod store;
pub mod units;
pub mod worker;
