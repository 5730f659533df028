//! Domain and wire types shared by the BlitzWatch client surfaces.

pub mod domain;
pub mod error;
pub mod protocol;
