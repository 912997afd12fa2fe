//! Capability traits
//!
//! Every remote service the gateway talks to sits behind one of these traits
//! so flows can be wired with any implementation (remote client, no-op, mock).
//!
//! ```text
//! Speech:
//!   - SpeechRecognizer: audio -> text
//!   - SpeechSynthesizer: text -> base64 audio
//!
//! Text:
//!   - Translator: text in one language -> text in another (fail-soft)
//!   - TextExtractor: document image -> text
//!
//! Answers:
//!   - Responder: question -> non-empty answer
//!
//! Data:
//!   - WeatherProvider: location -> current conditions
//! ```

mod responder;
mod speech;
mod text_processing;
mod weather;

pub use responder::{Answer, AnswerSource, AttemptOutcome, BackendAttempt, Responder};
pub use speech::{SpeechRecognizer, SpeechSynthesizer};
pub use text_processing::{NoopTranslator, TextExtractor, Translator};
pub use weather::{WeatherProvider, WeatherReport};
