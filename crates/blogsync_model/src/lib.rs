//! # blogsync model
//!
//! Entities shared by every blogsync crate.
//!
//! This crate provides:
//! - [`User`], [`Comment`] and [`Post`] records
//! - [`EntityId`], the stable identifier assigned by the remote API
//! - The [`Entity`] trait used by stores to key records
//! - [`Collection`], a tag naming each cached collection
//!
//! Entities are plain immutable records. Their serde representation matches
//! the remote JSON API (camelCase field names), so the same type is used on
//! the wire and in the local store.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod id;

pub use entity::{Collection, Comment, Entity, Post, User};
pub use id::EntityId;
