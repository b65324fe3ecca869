#![cfg_attr(docsrs, feature(doc_cfg))]
//! Arcade off-road driving simulation.
//!
//! The crate pairs a procedurally generated [`terrain`] heightfield with a
//! single-body [`vehicle`] model. The simulation core is engine-agnostic: the
//! vehicle only ever sees the ground through height and roughness queries.
//! With the `plugin` feature the core is wired into Bevy by
//! [`plugin::DrivingPlugin`].
pub mod config;
pub mod constants;
pub mod logging;
pub mod numeric;
#[cfg(feature = "plugin")]
#[cfg_attr(docsrs, doc(cfg(feature = "plugin")))]
pub mod plugin;
pub mod terrain;
pub mod vector_math;
pub mod vehicle;
pub use constants::*;

// Re-export commonly used items
pub use config::{ConfigError, DrivingConfig, SimConfig, TerrainConfig, VehicleConfig};
pub use logging::init as init_logging;
#[cfg(feature = "plugin")]
#[cfg_attr(docsrs, doc(cfg(feature = "plugin")))]
pub use plugin::DrivingPlugin;
pub use terrain::{GroundFns, GroundQuery, TerrainHeightField};
pub use vector_math::vec_normalize;
pub use vehicle::{DriveInput, GroundState, PhysicsResult, PlayArea, VehicleDynamics};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use offroad::prelude::*;
    //! ```

    pub use crate::DriveInput;
    pub use crate::GroundQuery;
    pub use crate::PhysicsResult;
    pub use crate::SimConfig;
    pub use crate::TerrainHeightField;
    pub use crate::VehicleDynamics;
    pub use glam::Vec3;
}
