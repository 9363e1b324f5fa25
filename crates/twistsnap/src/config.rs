//! Connector configuration.
//!
//! [`TwistSnapConnector`] keeps its dimensions in a sectioned key/value
//! [`ConfigStore`]. Getters fall back to defaults (some derived from other
//! values) when a key is absent; setters create the section on demand. The
//! store round-trips through TOML:
//!
//! ```toml
//! [snapfit]
//! radius_extension = 1.5
//! count = 3
//!
//! [general]
//! tolerance = 0.15
//! ```

use std::path::Path;

use toml::{Table, Value};

use crate::error::ConfigError;
use crate::geometry::{arc_span, CHANNEL_CLEARANCE, TWIST_CHANNEL_LEAD};

/// Value type expected for a known key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Float,
    Integer,
}

/// Every key the connector reads, with its expected type.
const KNOWN_KEYS: &[(&str, &str, Kind)] = &[
    ("snapfit", "radius_extension", Kind::Float),
    ("snapfit", "height", Kind::Float),
    ("snapfit", "arc_percentage", Kind::Float),
    ("snapfit", "count", Kind::Integer),
    ("grip", "diameter", Kind::Float),
    ("general", "wall_depth", Kind::Float),
    ("general", "wall_width", Kind::Float),
    ("general", "tolerance", Kind::Float),
    ("mesh", "circle_segments", Kind::Integer),
];

/// A sectioned key/value store, one TOML table per section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    table: Table,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `section.key`.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.table.get(section)?.as_table()?.get(key)
    }

    /// `section.key` as a float; integers are widened.
    pub fn get_f64(&self, section: &str, key: &str) -> Option<f64> {
        match self.get(section, key)? {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// `section.key` as an integer.
    pub fn get_i64(&self, section: &str, key: &str) -> Option<i64> {
        self.get(section, key)?.as_integer()
    }

    /// Set `section.key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .table
            .entry(section.to_string())
            .or_insert(Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Value::Table(t) = entry {
            t.insert(key.to_string(), value.into());
        }
    }

    /// True when the section exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.table.get(section).is_some_and(Value::is_table)
    }

    /// Section names in order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Overlay the sections of a TOML document onto this store.
    ///
    /// Known keys must hold numbers of the right kind. Unknown keys are kept.
    /// `origin` names the source in error messages.
    pub fn merge_toml_str(&mut self, text: &str, origin: &str) -> Result<(), ConfigError> {
        let parse_error = |message: String| ConfigError::ParseError {
            path: origin.to_string(),
            message,
        };
        let parsed: Table = text.parse().map_err(|e: toml::de::Error| parse_error(e.to_string()))?;

        for (section, value) in &parsed {
            let Value::Table(keys) = value else {
                return Err(parse_error(format!("top-level key {section:?} is not a section")));
            };
            for (key, value) in keys {
                if let Some(&(_, _, kind)) = KNOWN_KEYS
                    .iter()
                    .find(|(s, k, _)| *s == section.as_str() && *k == key.as_str())
                {
                    let ok = match kind {
                        Kind::Float => value.is_float() || value.is_integer(),
                        Kind::Integer => value.is_integer(),
                    };
                    if !ok {
                        return Err(parse_error(format!(
                            "{section}.{key} must be {}, got {value}",
                            match kind {
                                Kind::Float => "a number",
                                Kind::Integer => "an integer",
                            }
                        )));
                    }
                }
            }
        }

        for (section, value) in parsed {
            if let Value::Table(keys) = value {
                for (key, value) in keys {
                    self.set(&section, &key, value);
                }
            }
        }
        Ok(())
    }

    /// Serialise the store as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(&self.table).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Parameters of a twist-and-snap connector and its matching socket.
///
/// All lengths are millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct TwistSnapConnector {
    connector_radius: f64,
    config: ConfigStore,
}

impl Default for TwistSnapConnector {
    fn default() -> Self {
        Self::new(10.0, 2.0, 0.1)
    }
}

impl TwistSnapConnector {
    /// Create a connector of `connector_radius` with walls `wall_size`
    /// thick and deep, and `tolerance` clearance to the socket.
    pub fn new(connector_radius: f64, wall_size: f64, tolerance: f64) -> Self {
        let mut connector = Self {
            connector_radius,
            config: ConfigStore::new(),
        };
        connector.set_grip_diameter(connector_radius + wall_size * 2.0);
        connector.set_wall_depth(wall_size);
        connector.set_wall_width(wall_size);
        connector.set_tolerance(tolerance);
        connector
    }

    /// Radius of the connector body.
    pub fn connector_radius(&self) -> f64 {
        self.connector_radius
    }

    /// Set the radius of the connector body.
    pub fn set_connector_radius(&mut self, value: f64) {
        self.connector_radius = value;
    }

    /// The underlying store.
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// How far a snap-fit tab reaches out from the connector radius.
    /// Defaults to 2/3 of the wall width.
    pub fn snapfit_radius_extension(&self) -> f64 {
        self.config
            .get_f64("snapfit", "radius_extension")
            .unwrap_or_else(|| self.wall_width() * 2.0 / 3.0)
    }

    /// Set the snap-fit tab extension.
    pub fn set_snapfit_radius_extension(&mut self, value: f64) {
        self.config.set("snapfit", "radius_extension", value);
    }

    /// Overall height of a snap-fit tab. Defaults to the wall depth.
    pub fn snapfit_height(&self) -> f64 {
        self.config
            .get_f64("snapfit", "height")
            .unwrap_or_else(|| self.wall_depth())
    }

    /// Set the snap-fit tab height.
    pub fn set_snapfit_height(&mut self, value: f64) {
        self.config.set("snapfit", "height", value);
    }

    /// Percentage of the circle each tab spans.
    pub fn arc_percentage(&self) -> f64 {
        self.config.get_f64("snapfit", "arc_percentage").unwrap_or(10.0)
    }

    /// Set the tab arc percentage.
    pub fn set_arc_percentage(&mut self, value: f64) {
        self.config.set("snapfit", "arc_percentage", value);
    }

    /// Number of tabs around the connector.
    pub fn snapfit_count(&self) -> u32 {
        self.config
            .get_i64("snapfit", "count")
            .map_or(4, |v| v.clamp(0, u32::MAX as i64) as u32)
    }

    /// Set the number of tabs.
    pub fn set_snapfit_count(&mut self, value: u32) {
        self.config.set("snapfit", "count", i64::from(value));
    }

    /// Outer diameter of the grip.
    pub fn grip_diameter(&self) -> f64 {
        self.config.get_f64("grip", "diameter").unwrap_or(6.0)
    }

    /// Set the grip diameter.
    pub fn set_grip_diameter(&mut self, value: f64) {
        self.config.set("grip", "diameter", value);
    }

    /// Wall thickness along Z.
    pub fn wall_depth(&self) -> f64 {
        self.config.get_f64("general", "wall_depth").unwrap_or(2.0)
    }

    /// Set the wall depth.
    pub fn set_wall_depth(&mut self, value: f64) {
        self.config.set("general", "wall_depth", value);
    }

    /// Radial thickness of the socket wall.
    pub fn wall_width(&self) -> f64 {
        self.config.get_f64("general", "wall_width").unwrap_or(2.0)
    }

    /// Set the wall width.
    pub fn set_wall_width(&mut self, value: f64) {
        self.config.set("general", "wall_width", value);
    }

    /// Clearance between socket and connector.
    pub fn tolerance(&self) -> f64 {
        self.config.get_f64("general", "tolerance").unwrap_or(0.1)
    }

    /// Set the clearance.
    pub fn set_tolerance(&mut self, value: f64) {
        self.config.set("general", "tolerance", value);
    }

    /// Segments used for a full circle when meshing.
    pub fn circle_segments(&self) -> u32 {
        self.config
            .get_i64("mesh", "circle_segments")
            .map_or(64, |v| v.clamp(0, u32::MAX as i64) as u32)
    }

    /// Set the circle segment count.
    pub fn set_circle_segments(&mut self, value: u32) {
        self.config.set("mesh", "circle_segments", i64::from(value));
    }

    /// Overlay a TOML configuration file.
    ///
    /// A missing file is skipped with a warning.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "config file not found, keeping current values"
                );
                return Ok(());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        self.config.merge_toml_str(&text, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded connector config");
        Ok(())
    }

    /// Overlay configuration from a TOML string.
    pub fn load_config_str(&mut self, text: &str) -> Result<(), ConfigError> {
        self.config.merge_toml_str(text, "<string>")
    }

    /// Explicitly set values as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        self.config.to_toml_string()
    }

    /// Write the explicitly set values to a TOML file.
    pub fn save_config(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Store with every known key resolved, fallbacks included.
    pub fn effective_config(&self) -> ConfigStore {
        let mut store = self.config.clone();
        store.set("snapfit", "radius_extension", self.snapfit_radius_extension());
        store.set("snapfit", "height", self.snapfit_height());
        store.set("snapfit", "arc_percentage", self.arc_percentage());
        store.set("snapfit", "count", i64::from(self.snapfit_count()));
        store.set("grip", "diameter", self.grip_diameter());
        store.set("general", "wall_depth", self.wall_depth());
        store.set("general", "wall_width", self.wall_width());
        store.set("general", "tolerance", self.tolerance());
        store.set("mesh", "circle_segments", i64::from(self.circle_segments()));
        store
    }

    /// Reject values no connector can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |field: &str, message: String| ConfigError::ValidationFailed {
            field: field.to_string(),
            message,
        };
        let positive = [
            ("connector.radius", self.connector_radius),
            ("general.wall_depth", self.wall_depth()),
            ("general.wall_width", self.wall_width()),
            ("snapfit.radius_extension", self.snapfit_radius_extension()),
            ("snapfit.height", self.snapfit_height()),
            ("snapfit.arc_percentage", self.arc_percentage()),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(fail(field, format!("must be positive, got {value}")));
            }
        }
        let arc = self.arc_percentage();
        let (start, end) = arc_span(arc, TWIST_CHANNEL_LEAD, CHANNEL_CLEARANCE, 0.0);
        if end - start >= 360.0 {
            return Err(fail(
                "snapfit.arc_percentage",
                format!("{arc} gives a twist channel of {}°", end - start),
            ));
        }
        let count = self.config.get_i64("snapfit", "count").unwrap_or(4);
        if count < 1 {
            return Err(fail("snapfit.count", format!("must be at least 1, got {count}")));
        }
        let tolerance = self.tolerance();
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(fail(
                "general.tolerance",
                format!("must not be negative, got {tolerance}"),
            ));
        }
        let segments = self.config.get_i64("mesh", "circle_segments").unwrap_or(64);
        if segments < 8 {
            return Err(fail(
                "mesh.circle_segments",
                format!("must be at least 8, got {segments}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_sets_store() {
        let c = TwistSnapConnector::new(4.5, 2.0, 0.1);
        assert_eq!(c.connector_radius(), 4.5);
        assert_eq!(c.grip_diameter(), 8.5);
        assert_eq!(c.wall_depth(), 2.0);
        assert_eq!(c.wall_width(), 2.0);
        assert_eq!(c.tolerance(), 0.1);
        assert!(c.config().has_section("general"));
        assert!(!c.config().has_section("snapfit"));
    }

    #[test]
    fn test_fallbacks_follow_walls() {
        let mut c = TwistSnapConnector::default();
        assert_relative_eq!(c.snapfit_radius_extension(), 4.0 / 3.0);
        assert_eq!(c.snapfit_height(), 2.0);
        assert_eq!(c.arc_percentage(), 10.0);
        assert_eq!(c.snapfit_count(), 4);
        assert_eq!(c.circle_segments(), 64);

        c.set_wall_width(3.0);
        c.set_wall_depth(1.5);
        assert_relative_eq!(c.snapfit_radius_extension(), 2.0);
        assert_eq!(c.snapfit_height(), 1.5);

        c.set_snapfit_radius_extension(1.0);
        c.set_wall_width(6.0);
        assert_eq!(c.snapfit_radius_extension(), 1.0);
    }

    #[test]
    fn test_setters_create_sections() {
        let mut c = TwistSnapConnector::default();
        c.set_snapfit_count(3);
        c.set_circle_segments(32);
        assert!(c.config().has_section("snapfit"));
        assert_eq!(c.snapfit_count(), 3);
        assert_eq!(c.circle_segments(), 32);
    }

    #[test]
    fn test_merge_overlays_and_keeps_unknown() {
        let mut c = TwistSnapConnector::default();
        c.load_config_str(
            "[snapfit]\nheight = 3\ncount = 6\n\n[general]\ntolerance = 0.2\n\n[notes]\nauthor = \"me\"\n",
        )
        .unwrap();
        assert_eq!(c.snapfit_height(), 3.0);
        assert_eq!(c.snapfit_count(), 6);
        assert_eq!(c.tolerance(), 0.2);
        assert_eq!(c.wall_depth(), 2.0);
        assert!(c.config().get("notes", "author").is_some());
    }

    #[test]
    fn test_merge_rejects_bad_types() {
        let mut c = TwistSnapConnector::default();
        let err = c.load_config_str("[snapfit]\ncount = 2.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let err = c.load_config_str("[general]\ntolerance = \"loose\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(c.load_config_str("stray = 1\n").is_err());
        assert!(c.load_config_str("[general\n").is_err());
        // Nothing was applied from the failed loads.
        assert_eq!(c.tolerance(), 0.1);
        assert_eq!(c.snapfit_count(), 4);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut c = TwistSnapConnector::new(4.5, 2.0, 0.1);
        c.set_arc_percentage(12.5);
        let text = c.to_toml_string().unwrap();
        let mut other = TwistSnapConnector::new(4.5, 1.0, 0.0);
        other.load_config_str(&text).unwrap();
        assert_eq!(other, c);
    }

    #[test]
    fn test_effective_config_resolves_fallbacks() {
        let c = TwistSnapConnector::default();
        let eff = c.effective_config();
        assert_eq!(eff.get_i64("snapfit", "count"), Some(4));
        assert_eq!(eff.get_f64("snapfit", "height"), Some(2.0));
        assert_eq!(eff.get_i64("mesh", "circle_segments"), Some(64));
        assert!(c.config().get("snapfit", "count").is_none());
    }

    #[test]
    fn test_validate() {
        assert!(TwistSnapConnector::default().validate().is_ok());

        let mut c = TwistSnapConnector::default();
        c.set_arc_percentage(100.0);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ValidationFailed { field, .. }) if field == "snapfit.arc_percentage"
        ));

        // The twist channel spans 7.56° per percent and must stay under a turn.
        let mut c = TwistSnapConnector::default();
        c.set_arc_percentage(47.0);
        assert!(c.validate().is_ok());
        c.set_arc_percentage(48.0);
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ValidationFailed { field, .. }) if field == "snapfit.arc_percentage"
        ));

        let mut c = TwistSnapConnector::default();
        c.set_snapfit_count(0);
        assert!(c.validate().is_err());

        let mut c = TwistSnapConnector::default();
        c.set_tolerance(-0.1);
        assert!(c.validate().is_err());

        let mut c = TwistSnapConnector::default();
        c.set_circle_segments(6);
        assert!(c.validate().is_err());

        assert!(TwistSnapConnector::new(0.0, 2.0, 0.1).validate().is_err());
        assert!(TwistSnapConnector::new(4.5, 2.0, 0.0).validate().is_ok());
    }
}
