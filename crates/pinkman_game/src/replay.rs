use pinkman_core::input::{InputState, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::ControllerInput;

/// Recorded key intent, one entry per run of identical frames.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ControllerInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(ControllerInput {
                    move_left: frame.left,
                    move_right: frame.right,
                    jump_pressed: frame.jump,
                });
            }
        }
        out
    }
}

/// Drive an `InputState` so that reading it back yields `input`. A jump is
/// released and pressed again so every recorded jump is a fresh edge.
pub fn press_keys(input: ControllerInput, state: &mut InputState) {
    state.set_key(Key::Left, input.move_left);
    state.set_key(Key::Right, input.move_right);
    if input.jump_pressed {
        state.key_up(Key::Space);
        state.key_down(Key::Space);
    } else {
        state.key_up(Key::Space);
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    if let Some(index) = replay.frames.iter().position(|f| f.left && f.right) {
        return Err(format!(
            "Replay validation failed: frame {index} holds both left and right"
        ));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}
