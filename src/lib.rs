//! admgraph: an in-memory document graph for the Audio Definition Model.
//!
//! ADM (ITU-R BS.2076) describes the audio of a file as a graph: programmes
//! contain contents, contents point at objects, objects at pack formats and
//! track UIDs, and so on down to channel formats and their timed block
//! formats. This crate holds that graph in memory with typed, validated
//! parameters and consistent cross-references. It does not read or write XML;
//! a reader builds a [`Document`] through this API and a writer walks it.
//!
//! # Modules
//!
//! - [`model`]: element types, ids, timestamps and parameter values
//! - [`document`]: the [`Document`] arena, references, and deep copy
//! - [`timing`]: block format duration resolution
//! - [`validation`]: structural lint with an issue report
//! - [`error`]: the [`AdmError`] type
//!
//! # Example
//!
//! ```
//! use admgraph::model::{AudioObject, AudioProgramme, AudioContent, Duration, Start, Time};
//! use admgraph::Document;
//!
//! let mut doc = Document::new();
//! let programme = doc.add(AudioProgramme::new("Main")).unwrap();
//! let content = doc.create(AudioContent::new("Dialogue"));
//! let object = doc.create(AudioObject::new("Narrator"));
//! doc.add_reference(programme, content).unwrap();
//! doc.add_reference(content, object).unwrap();
//! doc.set(object, Start(Time::from_secs(2))).unwrap();
//! doc.set(object, Duration(Time::from_secs(5))).unwrap();
//!
//! assert_eq!(doc.references::<AudioContent, _>(programme), vec![content]);
//! assert!(admgraph::validate_document(&doc, &Default::default()).is_ok());
//! ```

pub mod document;
pub mod error;
pub mod model;
pub mod timing;
pub mod validation;

pub use document::{Document, DocumentId, Handle, ReferenceSync};
pub use error::AdmError;
pub use timing::{update_block_durations, ResolveOptions};
pub use validation::{validate_document, ValidateOptions, ValidationReport};
