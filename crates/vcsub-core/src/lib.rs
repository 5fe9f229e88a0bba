pub mod config;
pub mod logging;

pub mod batch;
pub mod metadata;
pub mod sample_list;
pub mod scheduler;
