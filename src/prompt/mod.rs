//! Interactive prompt surface
//!
//! The wizard asks every question through [`PromptSurface`]. [`TerminalPrompt`]
//! renders them with dialoguer; [`ScriptedPrompt`] replays canned answers.

mod scripted;
mod surface;
mod terminal;

pub use scripted::{PromptKind, PromptRecord, ScriptedAnswer, ScriptedPrompt};
pub use surface::{ChoiceItem, ChoiceRequest, OptionSource, PromptSurface, TextRequest};
pub use terminal::TerminalPrompt;
