//! ini-resolve: inifile section and parameter resolver
//!
//! A library for answering questions about a tokenized simulation inifile:
//! which sections a section falls back to, what value a configuration key
//! has, which entries assign a parameter, and which type a `like`
//! submodule resolves to. It also keeps keys and sections in canonical
//! order when the document is edited.

pub mod config;
pub mod document;
pub mod edit;
pub mod key;
pub mod like;
pub mod literal;
pub mod lookup;
pub mod ned;
pub mod ordering;
pub mod registry;
pub mod resolution;
pub mod section;
pub mod time;
