// ============================================================================
// Shared Protocol Types
// ============================================================================

// Player ID - assigned by the host when a client connects, roster key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u32);

// Team slot, mirroring the engine's team numbering. `None` doubles as the
// "no winner" value in round results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    None,
    Spectator,
    Terrorist,
    Ct,
}

// ============================================================================
// Client Commands
// ============================================================================

// Server to Client: an instruction the game client executes locally.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCommand {
    // Print a line in the player's chat.
    Chat(String),
    // Play a named sound resource at the given volume.
    PlaySound { path: String, volume: f32 },
}
