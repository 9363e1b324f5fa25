//! Named fittings and batch export.
//!
//! A catalog is a list of `[[fitting]]` tables:
//!
//! ```toml
//! [[fitting]]
//! name = "snap-socket-straight-OD4"
//! kind = "straight-socket"
//! tube_outer_diameter = 4.3
//! ```
//!
//! Missing parameters take the fitting's defaults.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use twistsnap_cad::Assembly;

use crate::config::TwistSnapConnector;
use crate::error::{Result, TwistSnapError};
use crate::fittings::{
    connector_fitting, socket_fitting, straight_cut_connector_fitting,
    straight_cut_socket_fitting, taper_cut_connector_fitting, taper_cut_socket_fitting,
    StraightCut, TaperCut, DEFAULT_KNOB_LENGTH,
};

fn default_knob_length() -> f64 {
    DEFAULT_KNOB_LENGTH
}

/// What a catalog entry builds, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FittingKind {
    /// Socket fitting with a straight bore.
    StraightSocket(StraightCut),
    /// Socket fitting stepping down to a narrower tube.
    TaperSocket(TaperCut),
    /// Connector fitting with a straight bore.
    StraightConnector(StraightCut),
    /// Connector fitting stepping down to a narrower tube.
    TaperConnector(TaperCut),
    /// Grip knob and connector, no bore.
    ConnectorFitting {
        /// Grip length.
        #[serde(default = "default_knob_length")]
        knob_length: f64,
    },
    /// Grip knob and socket, no bore.
    SocketFitting {
        /// Grip length.
        #[serde(default = "default_knob_length")]
        knob_length: f64,
    },
    /// The bare twist-snap connector.
    Connector,
    /// The bare twist-snap socket.
    Socket,
}

impl FittingKind {
    /// The `kind` string used in catalog files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StraightSocket(_) => "straight-socket",
            Self::TaperSocket(_) => "taper-socket",
            Self::StraightConnector(_) => "straight-connector",
            Self::TaperConnector(_) => "taper-connector",
            Self::ConnectorFitting { .. } => "connector-fitting",
            Self::SocketFitting { .. } => "socket-fitting",
            Self::Connector => "connector",
            Self::Socket => "socket",
        }
    }
}

impl fmt::Display for FittingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named entry of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingSpec {
    /// Output file stem.
    pub name: String,
    /// What to build.
    #[serde(flatten)]
    pub kind: FittingKind,
}

impl FittingSpec {
    /// Create a named catalog entry.
    pub fn new(name: impl Into<String>, kind: FittingKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Build this entry around `connector`.
    pub fn build(&self, connector: &TwistSnapConnector) -> Result<Assembly> {
        debug!(name = %self.name, kind = %self.kind, "building fitting");
        let assembly = match &self.kind {
            FittingKind::StraightSocket(cut) => straight_cut_socket_fitting(connector, cut)?,
            FittingKind::TaperSocket(cut) => taper_cut_socket_fitting(connector, cut)?,
            FittingKind::StraightConnector(cut) => straight_cut_connector_fitting(connector, cut)?,
            FittingKind::TaperConnector(cut) => taper_cut_connector_fitting(connector, cut)?,
            FittingKind::ConnectorFitting { knob_length } => {
                connector_fitting(connector, *knob_length)?.into()
            }
            FittingKind::SocketFitting { knob_length } => {
                socket_fitting(connector, *knob_length)?.into()
            }
            FittingKind::Connector => connector.twist_snap_connector()?.into(),
            FittingKind::Socket => connector.twist_snap_socket()?.into(),
        };
        Ok(assembly)
    }
}

/// An ordered list of fittings to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Entries in file order.
    #[serde(rename = "fitting", default)]
    pub fittings: Vec<FittingSpec>,
}

/// The six fittings the project ships.
///
/// `snap-socket-straight-OD4` bores the tube path at radius
/// `tube_outer_diameter / 2` (2.15 mm). Older exports of this socket cut it
/// at the full 4.3 mm as a radius, so its bore is narrower than in those
/// files and matches the straight connector's.
impl Default for Catalog {
    fn default() -> Self {
        Self {
            fittings: vec![
                FittingSpec::new(
                    "snap-socket-step-down-OD6ID3-OD4ID2.5",
                    FittingKind::TaperSocket(TaperCut::default()),
                ),
                FittingSpec::new(
                    "snap-socket-step-down-OD6ID3-OD4ID2",
                    FittingKind::TaperSocket(TaperCut {
                        taper_end_diameter: 2.2,
                        ..TaperCut::default()
                    }),
                ),
                FittingSpec::new(
                    "snap-connector-straight-OD4",
                    FittingKind::StraightConnector(StraightCut::default()),
                ),
                FittingSpec::new(
                    "snap-socket-straight-OD4",
                    FittingKind::StraightSocket(StraightCut::default()),
                ),
                FittingSpec::new("snap-connector", FittingKind::Connector),
                FittingSpec::new("snap-socket", FittingKind::Socket),
            ],
        }
    }
}

impl Catalog {
    /// Parse a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "<string>")
    }

    /// Read a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TwistSnapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(text).map_err(|e| TwistSnapError::Catalog {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        catalog.check_unique(origin)?;
        Ok(catalog)
    }

    /// Every entry names its own output files, so names must not repeat.
    fn check_unique(&self, origin: &str) -> Result<()> {
        let mut seen = HashSet::new();
        let mut names = self.fittings.iter().map(|f| f.name.as_str());
        match names.find(|name| !seen.insert(*name)) {
            Some(dup) => Err(TwistSnapError::Catalog {
                path: origin.to_string(),
                message: format!("duplicate fitting name {dup:?}"),
            }),
            None => Ok(()),
        }
    }

    /// Serialise as `[[fitting]]` tables.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| TwistSnapError::Catalog {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&FittingSpec> {
        self.fittings.iter().find(|f| f.name == name)
    }

    /// Build the named entry.
    pub fn build(&self, name: &str, connector: &TwistSnapConnector) -> Result<Assembly> {
        self.get(name)
            .ok_or_else(|| TwistSnapError::UnknownFitting(name.to_string()))?
            .build(connector)
    }

    /// Keep only the named entries, in the given order. Repeated names
    /// select their entry once.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Catalog> {
        let mut seen = HashSet::new();
        let fittings = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| seen.insert(*n))
            .map(|n| {
                self.get(n)
                    .cloned()
                    .ok_or_else(|| TwistSnapError::UnknownFitting(n.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog { fittings })
    }
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Binary STL, all bodies merged.
    Stl,
    /// STEP AP214, one faceted body per child.
    Step,
}

impl ExportFormat {
    /// Both formats.
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Step, ExportFormat::Stl];

    /// File extension and output subdirectory.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Step => "step",
        }
    }

    /// `<out_dir>/<ext>/<name>.<ext>`.
    pub fn output_path(self, out_dir: &Path, name: &str) -> PathBuf {
        out_dir
            .join(self.extension())
            .join(format!("{name}.{}", self.extension()))
    }
}

impl FromStr for ExportFormat {
    type Err = TwistSnapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(Self::Stl),
            "step" | "stp" => Ok(Self::Step),
            _ => Err(TwistSnapError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One file written by [`export_catalog`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    /// Catalog entry name.
    pub name: String,
    /// Format written.
    pub format: ExportFormat,
    /// File written.
    pub path: PathBuf,
    /// Triangles across all bodies.
    pub triangles: usize,
}

fn write_one(
    assembly: &Assembly,
    name: &str,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<ExportRecord> {
    let path = format.output_path(out_dir, name);
    match format {
        ExportFormat::Stl => assembly.write_stl(&path)?,
        ExportFormat::Step => assembly.write_step(&path)?,
    }
    Ok(ExportRecord {
        name: name.to_string(),
        format,
        triangles: assembly.num_triangles(),
        path,
    })
}

/// Build every entry in parallel and write it in each of `formats`.
///
/// Files go to `<out_dir>/step/` and `<out_dir>/stl/`, created as needed.
/// Records come back in catalog order, formats in the order given.
pub fn export_catalog(
    catalog: &Catalog,
    connector: &TwistSnapConnector,
    out_dir: impl AsRef<Path>,
    formats: &[ExportFormat],
) -> Result<Vec<ExportRecord>> {
    let out_dir = out_dir.as_ref();
    for format in formats {
        let dir = out_dir.join(format.extension());
        std::fs::create_dir_all(&dir).map_err(|source| TwistSnapError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    }
    connector.validate()?;
    catalog.check_unique("<catalog>")?;

    let per_fitting = catalog
        .fittings
        .par_iter()
        .map(|spec| {
            let assembly = spec.build(connector)?;
            formats
                .iter()
                .map(|&format| write_one(&assembly, &spec.name, format, out_dir))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let records: Vec<ExportRecord> = per_fitting.into_iter().flatten().collect();
    info!(
        fittings = catalog.fittings.len(),
        files = records.len(),
        out = %out_dir.display(),
        "exported catalog"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fittings::ThreadedConnector;

    #[test]
    fn test_default_catalog_names() {
        let c = Catalog::default();
        let names: Vec<&str> = c.fittings.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "snap-socket-step-down-OD6ID3-OD4ID2.5",
                "snap-socket-step-down-OD6ID3-OD4ID2",
                "snap-connector-straight-OD4",
                "snap-socket-straight-OD4",
                "snap-connector",
                "snap-socket",
            ]
        );
        match &c.get("snap-socket-step-down-OD6ID3-OD4ID2").unwrap().kind {
            FittingKind::TaperSocket(cut) => assert_eq!(cut.taper_end_diameter, 2.2),
            other => panic!("unexpected kind {other}"),
        }
    }

    #[test]
    fn test_parse_with_defaults() {
        let c = Catalog::from_toml_str(
            r#"
[[fitting]]
name = "a"
kind = "straight-socket"
knob_length = 12

[[fitting]]
name = "b"
kind = "taper-connector"
taper_end_diameter = 2.2
threaded = { diameter = 10.1, thread_pitch = 0.874 }

[[fitting]]
name = "c"
kind = "socket"

[[fitting]]
name = "d"
kind = "connector-fitting"
"#,
        )
        .unwrap();
        assert_eq!(c.fittings.len(), 4);
        assert_eq!(
            c.fittings[0].kind,
            FittingKind::StraightSocket(StraightCut {
                knob_length: 12.0,
                ..StraightCut::default()
            })
        );
        match &c.fittings[1].kind {
            FittingKind::TaperConnector(cut) => {
                assert_eq!(cut.taper_length, 4.0);
                assert_eq!(cut.threaded, Some(ThreadedConnector::fine_pitch()));
            }
            other => panic!("unexpected kind {other}"),
        }
        assert_eq!(c.fittings[2].kind, FittingKind::Socket);
        assert_eq!(
            c.fittings[3].kind,
            FittingKind::ConnectorFitting { knob_length: 10.0 }
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = Catalog::from_toml_str("[[fitting]]\nname = \"x\"\nkind = \"bolt\"\n");
        assert!(matches!(err, Err(TwistSnapError::Catalog { .. })));
        let dup = "[[fitting]]\nname = \"x\"\nkind = \"socket\"\n\n\
                   [[fitting]]\nname = \"x\"\nkind = \"connector\"\n";
        assert!(matches!(
            Catalog::from_toml_str(dup),
            Err(TwistSnapError::Catalog { .. })
        ));
        assert_eq!(Catalog::from_toml_str("").unwrap().fittings.len(), 0);
    }

    #[test]
    fn test_toml_round_trip_keeps_kinds() {
        let c = Catalog::default();
        let text = c.to_toml_string().unwrap();
        assert!(text.contains("kind = \"taper-socket\""));
        assert_eq!(Catalog::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn test_select() {
        let c = Catalog::default();
        let picked = c.select(&["snap-socket", "snap-connector"]).unwrap();
        assert_eq!(picked.fittings[0].name, "snap-socket");
        assert_eq!(picked.fittings.len(), 2);

        let repeated = c
            .select(&["snap-socket", "snap-connector", "snap-socket"])
            .unwrap();
        assert_eq!(repeated, picked);
        assert!(matches!(
            c.select(&["nope"]),
            Err(TwistSnapError::UnknownFitting(n)) if n == "nope"
        ));
    }

    #[test]
    fn test_export_format() {
        assert_eq!("STL".parse::<ExportFormat>().unwrap(), ExportFormat::Stl);
        assert_eq!("step".parse::<ExportFormat>().unwrap(), ExportFormat::Step);
        assert_eq!("stp".parse::<ExportFormat>().unwrap(), ExportFormat::Step);
        assert!(matches!(
            "obj".parse::<ExportFormat>(),
            Err(TwistSnapError::UnknownFormat(_))
        ));
        let p = ExportFormat::Step.output_path(Path::new("out"), "x");
        assert_eq!(p, Path::new("out/step/x.step"));
    }

    #[test]
    fn test_unknown_build() {
        let c = Catalog::default();
        let conn = crate::fittings::ptfe_connector();
        assert!(matches!(
            c.build("missing", &conn),
            Err(TwistSnapError::UnknownFitting(_))
        ));
    }
}
