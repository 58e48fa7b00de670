//! Cross-context message routing for ChatLens.
//!
//! The messenger only queues envelopes; this module performs delivery,
//! handing each envelope to every context except its sender and
//! collecting the acknowledgements. Kept separate from `app` so delivery
//! can be unit-tested against a single envelope.

use tracing::debug;

use crate::app::App;
use crate::dom::Document;
use crate::engine::observer_engine::ObserverEngineTrait;
use crate::services::background_worker::BackgroundWorkerTrait;
use crate::services::messenger::Envelope;
use crate::services::popup_controller::PopupControllerTrait;
use crate::types::message::{Context, MessageResponse};

/// Delivers one envelope to its target contexts, in [`Context::ALL`]
/// order, returning each acknowledgement. At most one delivery per
/// context per envelope; the sender never receives its own message.
pub fn deliver(
    app: &mut App,
    doc: &mut Document,
    envelope: &Envelope,
) -> Vec<(Context, MessageResponse)> {
    debug!(from = ?envelope.from, message = ?envelope.message, "delivering");
    let mut out = Vec::new();
    for target in envelope.targets() {
        let response = match target {
            Context::Background => app
                .background
                .on_message(&mut app.messenger, &envelope.message),
            Context::Content => app
                .engine
                .on_message(doc, &mut app.messenger, &envelope.message),
            Context::Popup => app.popup.on_message(&envelope.message),
        };
        out.push((target, response));
    }
    out
}
