//! Rule-based advisories
//!
//! Deterministic text used whenever remote services cannot answer:
//! - `fallback`: keyword-table responder for farmer questions
//! - `weather`: threshold advisory, generative prompt and reply template for current conditions
//! - `document`: canned analysis of OCR output

pub mod document;
pub mod fallback;
mod keywords;
pub mod weather;

pub use document::analyze as analyze_document;
pub use fallback::{Advice, Category, RuleBasedResponder};
pub use weather::{advisory_prompt, basic_advisory, format_weather_message};
