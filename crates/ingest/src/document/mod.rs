//! Turning raw input text into indexed sentences.

pub mod splitter;
