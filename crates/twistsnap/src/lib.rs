#![warn(missing_docs)]

//! Parametric twist-and-snap quarter-turn connectors and the PTFE tube
//! fittings built on them.
//!
//! A [`TwistSnapConnector`] holds the connector's dimensions in a TOML
//! backed store. From it come the plug ([`TwistSnapConnector::twist_snap_connector`])
//! and the matching socket ([`TwistSnapConnector::twist_snap_socket`]).
//! The [`fittings`] module mounts either on a grip knob, and [`catalog`]
//! builds and exports named fittings in bulk.
//!
//! ```no_run
//! use twistsnap::{export_catalog, Catalog, ExportFormat};
//!
//! let connector = twistsnap::fittings::ptfe_connector();
//! let written = export_catalog(&Catalog::default(), &connector, "out", &ExportFormat::ALL)?;
//! println!("wrote {} files", written.len());
//! # Ok::<(), twistsnap::TwistSnapError>(())
//! ```

pub mod catalog;
pub mod config;
mod connector;
pub mod error;
pub mod fittings;
pub mod geometry;
pub mod outline;

pub use catalog::{export_catalog, Catalog, ExportFormat, ExportRecord, FittingKind, FittingSpec};
pub use config::{ConfigStore, TwistSnapConnector};
pub use error::{ConfigError, OutlineError, Result, TwistSnapError};
pub use fittings::{StraightCut, TaperCut, ThreadedConnector};
pub use outline::{Notch, TabOutline};
