//! Serves a directory of session transcripts over HTTP: an index of
//! sessions, raw markdown for machines, rendered HTML for humans.

pub mod index;
pub mod parse;
pub mod server;
pub mod templates;
