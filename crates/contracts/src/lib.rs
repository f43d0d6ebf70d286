//! # Contracts
//!
//! Frozen interface contracts shared by every simfleet crate.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Naming Model
//! - Scene objects are addressed by opaque simulator handles (`ObjectHandle`)
//! - Homogeneous robots share one scene namespace and are told apart by an
//!   `InstanceSuffix` appended to every part name

mod config;
mod error;
mod motion;
mod parameter;
mod part;
mod runtime;
mod script;
mod suffix;
mod vision;

pub use config::*;
pub use error::*;
pub use motion::*;
pub use parameter::*;
pub use part::Part;
pub use runtime::*;
pub use script::*;
pub use suffix::{InstanceSuffix, SuffixPool, SUFFIXES};
pub use vision::*;
