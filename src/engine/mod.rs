// ChatLens content-context engine
// The observer/counter pipeline and the on-page statistics badge.

pub mod badge;
pub mod observer_engine;

pub use observer_engine::{EnginePhase, ObserverEngine, ObserverEngineTrait};
