//! Tendon Design Toolkit
//!
//! Inspection tools for tendon-driven continuum robot computations: unit
//! conversion between SI and display units, framing of backbone point
//! clouds, tendon color assignment, and a terminal front end.

pub mod cli;
pub mod core;
pub mod model;
pub mod yaml;
