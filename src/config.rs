//! Physics configuration.
//!
//! Solver tuning is read from the `[physics]` section of an INI file. Keys
//! that are missing or unparsable keep their defaults.
//!
//! ```ini
//! [physics]
//! gravity_x = 0.0
//! gravity_y = -9.8
//! velocity_iterations = 10
//! positional_correction_percent = 0.2
//! positional_correction_slop = 0.01
//! restitution_velocity_threshold = 0.5
//! ```
//!
//! Contacts closing slower than `restitution_velocity_threshold` never bounce,
//! whatever the materials' restitution. Set it to 0 to keep slow elastic
//! collisions elastic.

use configparser::ini::Ini;
use log::{info, warn};
use std::path::Path;

use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

const SECTION: &str = "physics";

const DEFAULT_GRAVITY: Vec2 = Vec2 { x: 0.0, y: -9.8 };
const DEFAULT_VELOCITY_ITERATIONS: usize = 10;
const DEFAULT_POSITIONAL_CORRECTION_PERCENT: f64 = 0.2;
const DEFAULT_POSITIONAL_CORRECTION_SLOP: f64 = 0.01;
const DEFAULT_RESTITUTION_VELOCITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Acceleration applied to every Dynamic body.
    pub gravity: Vec2,
    /// Impulse passes over the contact list per step.
    pub velocity_iterations: usize,
    /// Fraction of the penetration (beyond the slop) removed per step.
    pub positional_correction_percent: f64,
    /// Penetration tolerated without positional correction.
    pub positional_correction_slop: f64,
    /// Closing speeds below this resolve without bounce, so a contact is
    /// inelastic there even when both materials have restitution 1.
    pub restitution_velocity_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            positional_correction_percent: DEFAULT_POSITIONAL_CORRECTION_PERCENT,
            positional_correction_slop: DEFAULT_POSITIONAL_CORRECTION_SLOP,
            restitution_velocity_threshold: DEFAULT_RESTITUTION_VELOCITY_THRESHOLD,
        }
    }
}

impl PhysicsConfig {
    /// Defaults overridden by whatever `path` provides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        config.load_from_file(path)?;
        Ok(config)
    }

    /// Loads the `[physics]` section of an INI file over the current values.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|e| PhysicsError::Config(format!("failed to load {}: {}", path.display(), e)))?;
        self.apply_ini(&ini)?;
        info!(
            "Loaded physics config from {}: gravity=({}, {}), iterations={}, percent={}, slop={}, restitution threshold={}",
            path.display(),
            self.gravity.x,
            self.gravity.y,
            self.velocity_iterations,
            self.positional_correction_percent,
            self.positional_correction_slop,
            self.restitution_velocity_threshold
        );
        Ok(())
    }

    /// Same as [`PhysicsConfig::load_from_file`] for INI text already in memory.
    pub fn load_from_str(&mut self, contents: &str) -> Result<()> {
        let mut ini = Ini::new();
        ini.read(contents.to_string())
            .map_err(|e| PhysicsError::Config(format!("failed to parse config: {}", e)))?;
        self.apply_ini(&ini)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.set(SECTION, "gravity_x", Some(self.gravity.x.to_string()));
        ini.set(SECTION, "gravity_y", Some(self.gravity.y.to_string()));
        ini.set(SECTION, "velocity_iterations", Some(self.velocity_iterations.to_string()));
        ini.set(
            SECTION,
            "positional_correction_percent",
            Some(self.positional_correction_percent.to_string()),
        );
        ini.set(
            SECTION,
            "positional_correction_slop",
            Some(self.positional_correction_slop.to_string()),
        );
        ini.set(
            SECTION,
            "restitution_velocity_threshold",
            Some(self.restitution_velocity_threshold.to_string()),
        );
        ini.write(path)?;
        info!("Saved physics config to {}", path.display());
        Ok(())
    }

    /// Rejects values the solver cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::Config(format!("gravity must be finite, got {:?}", self.gravity)));
        }
        if self.velocity_iterations == 0 {
            return Err(PhysicsError::Config("velocity_iterations must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.positional_correction_percent) {
            return Err(PhysicsError::Config(format!(
                "positional_correction_percent must be in [0, 1], got {}",
                self.positional_correction_percent
            )));
        }
        if !(self.positional_correction_slop >= 0.0) {
            return Err(PhysicsError::Config(format!(
                "positional_correction_slop must be non-negative, got {}",
                self.positional_correction_slop
            )));
        }
        if !(self.restitution_velocity_threshold >= 0.0) {
            return Err(PhysicsError::Config(format!(
                "restitution_velocity_threshold must be non-negative, got {}",
                self.restitution_velocity_threshold
            )));
        }
        Ok(())
    }

    fn apply_ini(&mut self, ini: &Ini) -> Result<()> {
        if let Some(x) = float(ini, "gravity_x") {
            self.gravity.x = x;
        }
        if let Some(y) = float(ini, "gravity_y") {
            self.gravity.y = y;
        }
        match ini.getuint(SECTION, "velocity_iterations") {
            Ok(Some(iterations)) => self.velocity_iterations = iterations as usize,
            Ok(None) => {}
            Err(e) => warn!("Ignoring velocity_iterations: {}", e),
        }
        if let Some(percent) = float(ini, "positional_correction_percent") {
            self.positional_correction_percent = percent;
        }
        if let Some(slop) = float(ini, "positional_correction_slop") {
            self.positional_correction_slop = slop;
        }
        if let Some(threshold) = float(ini, "restitution_velocity_threshold") {
            self.restitution_velocity_threshold = threshold;
        }
        self.validate()
    }
}

fn float(ini: &Ini, key: &str) -> Option<f64> {
    match ini.getfloat(SECTION, key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring {}: {}", key, e);
            None
        }
    }
}
