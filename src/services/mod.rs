// ChatLens services
// Services provide the core collaborators: the two-scope store, the
// cross-context messenger, the background worker, and the popup controller.

pub mod background_worker;
pub mod messenger;
pub mod popup_controller;
pub mod storage_service;
