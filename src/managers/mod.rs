// ChatLens state managers
// Managers handle stateful records shared between contexts.

pub mod download_manager;
