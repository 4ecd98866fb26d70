//! Transform Steps - step implementations for the remodel engine
//!
//! This crate provides the leaf inspection and mutation steps used by
//! transformation templates:
//!
//! - `file`: existence checks, recursive file search, copy/delete/rename
//! - `text`: line- and occurrence-oriented text file edits
//! - `properties`: Java-style `.properties` file reads and edits
//! - `control`: abort-on-condition and manual-instruction recording
//!
//! Every mutator declares its own abort-on-failure default: edits that
//! leave the tree inconsistent when half-applied (copy, rename, replace,
//! set) default to aborting the run, removal-style steps default to
//! continuing. Templates can override the default per step.

pub mod control;
pub mod file;
pub mod properties;
pub mod text;

pub use control::{AbortStep, ManualInstruction};
pub use file::{
    CopyDirectory, CopyFile, DeleteDirectory, DeleteFile, FileExists, FindFiles, RenameFile,
};
pub use properties::{PropertyExists, ReadProperty, RemoveProperty, SetProperty};
pub use text::{InsertLine, InsertPosition, LineMatch, ReadTextFile, RemoveLine, ReplaceText};
