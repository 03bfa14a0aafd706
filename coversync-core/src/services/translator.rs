use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Open,
    Close,
    Stop,
    Identify,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Open => "open",
            Intent::Close => "close",
            Intent::Stop => "stop",
            Intent::Identify => "identify",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// First supported entry wins. Intents without a row pass through unchanged.
const VOCABULARY: &[(Intent, &[&str])] = &[
    (Intent::Open, &["open", "rollOut", "up"]),
    (Intent::Close, &["close", "rollUp", "down"]),
];

/// Maps an abstract intent to the command name the actuator understands.
///
/// When nothing in the fallback chain is supported the literal intent is
/// returned, leaving the device to reject it.
pub fn translate(intent: Intent, supported: &BTreeSet<String>) -> &'static str {
    VOCABULARY
        .iter()
        .find(|(candidate, _)| *candidate == intent)
        .and_then(|(_, chain)| {
            chain
                .iter()
                .copied()
                .find(|command| supported.contains(*command))
        })
        .unwrap_or(intent.as_str())
}
