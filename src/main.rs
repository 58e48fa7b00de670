//! ChatLens driver — newline-delimited JSON over stdin/stdout for host
//! integration and manual simulation.
//!
//! Protocol: one JSON object per line.
//! Request:  {"id":1, "cmd":"insert", "params":{"element":{"tag":"img"}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! The driver owns one [`Document`] and one [`App`]; commands mutate the
//! document, advance time, inject messages, and drive the popup, with the
//! engine reacting exactly as it would inside the content context.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use chatlens::app::App;
use chatlens::dom::{Document, Element};
use chatlens::engine::observer_engine::ObserverEngineTrait;
use chatlens::services::messenger::MessengerTrait;
use chatlens::services::popup_controller::{BannerKind, PopupControllerTrait};
use chatlens::types::message::{parse_message, Context};
use chatlens::types::settings::SettingToggle;

fn db_path() -> std::path::PathBuf {
    let dir = if let Ok(dir) = std::env::var("CHATLENS_DATA_DIR") {
        std::path::PathBuf::from(dir)
    } else {
        chatlens::platform::get_data_dir()
    };
    let _ = std::fs::create_dir_all(&dir);
    dir.join("chatlens.db")
}

fn phase_str(app: &App) -> &'static str {
    use chatlens::engine::EnginePhase::*;
    match app.engine.phase() {
        Idle => "idle",
        WaitingForHost { .. } => "waiting",
        Active => "active",
        TimedOut => "timed_out",
    }
}

fn handle_cmd(app: &mut App, doc: &mut Document, cmd: &str, params: &Value) -> Result<Value, String> {
    match cmd {
        "ping" => Ok(json!({"pong": true})),

        "install" => {
            app.install();
            Ok(json!({"ok": true}))
        }
        "startup" => {
            app.startup();
            Ok(json!({"phase": phase_str(app)}))
        }
        "tick" => {
            let count = params.get("count").and_then(|v| v.as_u64()).unwrap_or(1);
            for _ in 0..count {
                app.tick(doc);
            }
            Ok(json!({"phase": phase_str(app)}))
        }

        // ─── Document ───
        "insert" => {
            let element: Element = params
                .get("element")
                .cloned()
                .ok_or("missing element")
                .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid element"))?;
            let parent = params
                .get("parent")
                .and_then(|v| v.as_u64())
                .map(|v| v as usize)
                .unwrap_or_else(|| doc.body());
            let node = doc.append_child(parent, &element).map_err(|e| e.to_string())?;
            app.engine.pump(doc, &mut app.messenger);
            app.pump_messages(doc);
            Ok(json!({"node": node}))
        }
        "remove" => {
            let node = params.get("node").and_then(|v| v.as_u64()).ok_or("missing node")? as usize;
            doc.remove_node(node).map_err(|e| e.to_string())?;
            app.engine.pump(doc, &mut app.messenger);
            app.pump_messages(doc);
            Ok(json!({"ok": true}))
        }
        "hover" => {
            let node = params.get("node").and_then(|v| v.as_u64()).ok_or("missing node")? as usize;
            let enter = params.get("enter").and_then(|v| v.as_bool()).unwrap_or(true);
            app.engine.handle_hover(doc, node, enter);
            Ok(json!({"highlighted": doc.has_class(node, chatlens::engine::observer_engine::HIGHLIGHT_CLASS)}))
        }

        // ─── Messages ───
        "message" => {
            let from = match params.get("from").and_then(|v| v.as_str()).unwrap_or("popup") {
                "background" => Context::Background,
                "content" => Context::Content,
                _ => Context::Popup,
            };
            let raw = params.get("value").cloned().ok_or("missing value")?;
            match parse_message(&raw) {
                Ok(message) => {
                    app.messenger.send(from, message);
                    app.pump_messages(doc);
                }
                Err(e) => {
                    // Unknown actions are logged, ignored, and still
                    // acknowledged.
                    warn!(error = %e, "ignoring message");
                }
            }
            Ok(json!({"success": true}))
        }

        // ─── Popup ───
        "popup.open" => {
            app.popup.open();
            let stats = app.popup.displayed_stats();
            Ok(json!({
                "settings": app.popup.settings(),
                "totalMessages": stats.total_messages,
                "totalImages": stats.total_images
            }))
        }
        "popup.toggle" => {
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            let value = params.get("value").and_then(|v| v.as_bool()).ok_or("missing value")?;
            let toggle = match name {
                "stats" => SettingToggle::Stats,
                "imagePreview" => SettingToggle::ImagePreview,
                "autoSave" => SettingToggle::AutoSave,
                other => return Err(format!("unknown toggle: {}", other)),
            };
            app.popup.set_toggle(&mut app.messenger, toggle, value);
            app.pump_messages(doc);
            Ok(json!({"settings": app.popup.settings()}))
        }
        "popup.save" => {
            app.popup.save(&mut app.messenger);
            app.pump_messages(doc);
            Ok(json!({"ok": true}))
        }
        "popup.reset" => {
            app.popup.reset_stats();
            let stats = app.popup.displayed_stats();
            Ok(json!({"totalMessages": stats.total_messages, "totalImages": stats.total_images}))
        }
        "popup.banner" => match app.popup.banner() {
            Some(b) => Ok(json!({
                "text": b.text,
                "kind": if b.kind == BannerKind::Error { "error" } else { "success" }
            })),
            None => Ok(json!(null)),
        },

        // ─── Stats ───
        "stats" => {
            let stats = app.engine.stats();
            Ok(json!({
                "phase": phase_str(app),
                "totalMessages": stats.total_messages,
                "totalImages": stats.total_images
            }))
        }

        _ => Err(format!("unknown cmd: {}", cmd)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let path = db_path();
    let mut app = App::new(path.to_str().unwrap_or("chatlens.db")).expect("Failed to initialize ChatLens");
    let mut doc = Document::new();

    // Signal ready
    let ready = json!({"event":"ready","version":env!("CARGO_PKG_VERSION")});
    println!("{}", ready);
    let _ = io::stdout().flush();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                println!("{}", json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let cmd = request.get("cmd").and_then(|v| v.as_str()).unwrap_or("");
        let params = request.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_cmd(&mut app, &mut doc, cmd, &params) {
            Ok(result) => json!({"id": id, "result": result}),
            Err(error) => json!({"id": id, "error": error}),
        };
        println!("{}", response);
        let _ = io::stdout().flush();
    }
}
