//! Game recording and replay.
//!
//! Because a seeded game is 100% deterministic, replay requires only:
//! - `seed: u64` - drives dice, trivia draws and question generation
//! - `num_players` - the setup choice
//! - `actions` - the accepted commands, in order
//!
//! No state deltas needed. Re-running the commands on a fresh session
//! rebuilds every intermediate state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;
use crate::game::{GameState, InvariantViolation, Notification, check_invariants};
use crate::session::{Command, GameSession};

/// Recording file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Minimal recording - just seed, player count, and commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// File format version.
    pub version: u32,
    /// Random seed of the session.
    pub seed: u64,
    /// Players chosen at setup.
    pub num_players: usize,
    /// Accepted commands after setup.
    pub actions: Vec<Command>,
}

/// Errors that can occur while saving, loading or replaying.
#[derive(Debug)]
pub enum ReplayError {
    /// Reading or writing the file failed.
    Io(std::io::Error),
    /// The file is not a valid recording.
    Format(serde_json::Error),
    /// The file was written by an unknown format version.
    UnsupportedVersion(u32),
    /// The recorded player count was rejected at setup.
    SetupRejected(GameError),
    /// A recorded command was rejected on replay.
    Rejected {
        /// Index of the command (setup is not counted).
        step: usize,
        /// Rejection reason.
        error: GameError,
    },
    /// Replay reached a state that breaks a game invariant.
    Invariant {
        /// Index of the command that produced the state.
        step: usize,
        /// First violation found.
        violation: InvariantViolation,
    },
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recording I/O failed: {e}"),
            Self::Format(e) => write!(f, "Invalid recording: {e}"),
            Self::UnsupportedVersion(v) => {
                write!(f, "Unsupported recording version {v} (expected {FORMAT_VERSION})")
            }
            Self::SetupRejected(error) => write!(f, "Setup rejected: {error}"),
            Self::Rejected { step, error } => write!(f, "Step {step} rejected: {error}"),
            Self::Invariant { step, violation } => write!(f, "Step {step}: {violation}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::SetupRejected(error) | Self::Rejected { error, .. } => Some(error),
            Self::Invariant { violation, .. } => Some(violation),
            Self::UnsupportedVersion(_) => None,
        }
    }
}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

/// One replayed command and what it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Index of the command.
    pub step: usize,
    /// The command.
    pub command: Command,
    /// Messages it produced.
    pub notifications: Vec<Notification>,
}

/// Result of replaying a recording.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    /// State after the last command.
    pub state: GameState,
    /// Per-command messages.
    pub transcript: Vec<TranscriptEntry>,
}

impl Recording {
    /// Create a new recording.
    #[must_use]
    pub fn new(seed: u64, num_players: usize, actions: Vec<Command>) -> Self {
        Self {
            version: FORMAT_VERSION,
            seed,
            num_players,
            actions,
        }
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON, checking the format version.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or an unknown version.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let recording: Self = serde_json::from_str(json)?;
        if recording.version != FORMAT_VERSION {
            return Err(ReplayError::UnsupportedVersion(recording.version));
        }
        Ok(recording)
    }

    /// Save recording to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), actions = self.actions.len(), "recording saved");
        Ok(())
    }

    /// Load recording from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations fail or format is invalid.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Re-execute the recording on a fresh seeded session.
    ///
    /// Every intermediate state is checked against the game invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if setup or any command is rejected, or if an
    /// invariant breaks.
    pub fn replay(&self) -> Result<ReplayOutcome, ReplayError> {
        let mut session = GameSession::seeded(self.seed);
        session
            .start(self.num_players)
            .map_err(ReplayError::SetupRejected)?;

        let mut transcript = Vec::with_capacity(self.actions.len());
        for (step, command) in self.actions.iter().enumerate() {
            let output = session
                .apply(command)
                .map_err(|error| ReplayError::Rejected { step, error })?;
            if let Some(violation) = check_invariants(session.state()).into_iter().next() {
                return Err(ReplayError::Invariant { step, violation });
            }
            transcript.push(TranscriptEntry {
                step,
                command: command.clone(),
                notifications: output.notifications,
            });
        }

        Ok(ReplayOutcome {
            state: session.state().clone(),
            transcript,
        })
    }
}
