//! Serifu Engine — character-voice style transfer for chunked Japanese text.
//!
//! Learns, per fictional character, how that character rephrases the
//! function-word ending of a phrase relative to a neutral phrasing of the
//! same sentence, then applies the learned rules to rewrite new neutral
//! sentences in the character's voice.

pub mod core;
pub mod schema;
