pub mod collector;

pub use collector::{CollectionPlan, Collector, RunSummary};
