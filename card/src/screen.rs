use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Prompt,
    Success,
}

/// Owns the single `accepted` flag. It only ever moves from false to true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenController {
    accepted: bool,
}

impl ScreenController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn screen(&self) -> Screen {
        if self.accepted {
            Screen::Success
        } else {
            Screen::Prompt
        }
    }

    /// Switches to the success screen. Returns `true` only for the call that performed the swap.
    pub fn accept(&mut self) -> bool {
        if self.accepted {
            return false;
        }
        self.accepted = true;
        tracing::info!("valentine accepted");
        true
    }
}
