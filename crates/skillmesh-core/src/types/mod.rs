//! Core types for skillmesh.

mod card;
mod corpus;
mod hit;

pub use card::*;
pub use corpus::*;
pub use hit::*;
