//! # LifeKey Core
//!
//! Core logic for the LifeKey emergency-identification record system.
//!
//! This crate contains pure data operations:
//! - Patient record store: identifier allocation, upsert, lookup by identifier
//! - Repository backends (JSON file, in-memory) behind one load/save interface
//! - Form intake, QR payload text and demo seed data
//! - Lookup routing between the local store and a remote LifeKey service
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest`
//! and `cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod lookup;
pub mod qr;
pub mod record;
pub mod repositories;
pub mod seed;
pub mod store;

pub use config::CoreConfig;
pub use error::{ErrorKind, LifeKeyError, LifeKeyResult};
pub use form::PatientForm;
pub use lookup::{LookupRouter, RemoteLookupClient, Resolved};
pub use record::{PatientDraft, PatientRecord};
pub use repositories::{file::FileRepository, memory::MemoryRepository, RecordRepository};
pub use store::PatientStore;

pub use lifekey_id::LifeKeyId;
pub use lifekey_types::{NonEmptyText, TextList};
