pub mod analyst;
pub mod classifier;
pub mod kpi;
pub mod period;
pub mod stats;
