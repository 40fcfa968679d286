pub mod engine;
pub mod web;

pub use engine::{CrawlTarget, Engine, EngineOptions, Step, TargetKind, TargetState};
