//! Product catalogue records managed by a [`ResourceActor`](crate::actor_framework::ResourceActor).

pub mod dtos;
pub mod entity;

pub use dtos::*;
