//! Site configuration.
//!
//! Every timing constant the pages use can be overridden from a JSON file.
//! Missing keys keep their defaults, so `{}` is a valid config.

use std::path::Path;

use inkfolio_core::Size;
use inkfolio_fx::{BurstConfig, OverlayConfig, ParallaxConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::Duration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub per_char_ms: u64,
    pub cursor: bool,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            per_char_ms: 50,
            cursor: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub duration_ms: u64,
    pub fade_ms: u64,
    pub line_count: usize,
    pub min_length_px: f32,
    pub max_length_px: f32,
    pub max_angle_deg: f32,
    pub max_start_offset_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            fade_ms: 300,
            line_count: 20,
            min_length_px: 50.0,
            max_length_px: 150.0,
            max_angle_deg: 45.0,
            max_start_offset_ms: 200,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub particle_count: usize,
    pub duration_ms: u64,
    pub scale: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            particle_count: 3,
            duration_ms: 300,
            scale: 1.0,
        }
    }
}

/// Parallax smoothing longer than a frame makes the layer visibly lag the pointer.
pub const MAX_SMOOTHING_MS: u64 = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    pub domain_px: f32,
    pub range_px: f32,
    pub smoothing_ms: u64,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            domain_px: 800.0,
            range_px: 30.0,
            smoothing_ms: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub submit_ms: u64,
    pub success_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_ms: 1500,
            success_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Fixed seed for every random generator; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub viewport: (f32, f32),
    pub loading_ms: u64,
    pub typing: TypingConfig,
    pub transition: TransitionConfig,
    pub hover: HoverConfig,
    pub parallax: ParallaxSettings,
    pub contact: ContactConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            seed: None,
            viewport: (1280.0, 800.0),
            loading_ms: 2000,
            typing: TypingConfig::default(),
            transition: TransitionConfig::default(),
            hover: HoverConfig::default(),
            parallax: ParallaxSettings::default(),
            contact: ContactConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl SiteConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: SiteConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = self.viewport;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(invalid("viewport", format!("{w}x{h} is not a positive size")));
        }
        let p = &self.parallax;
        if !(p.domain_px.is_finite() && p.domain_px > 0.0) {
            return Err(invalid("parallax.domain_px", "must be positive"));
        }
        if !p.range_px.is_finite() {
            return Err(invalid("parallax.range_px", "must be finite"));
        }
        if p.smoothing_ms > MAX_SMOOTHING_MS {
            return Err(invalid(
                "parallax.smoothing_ms",
                format!("{}ms exceeds one frame ({MAX_SMOOTHING_MS}ms)", p.smoothing_ms),
            ));
        }
        let t = &self.transition;
        if !(t.min_length_px.is_finite() && t.max_length_px.is_finite()) {
            return Err(invalid("transition.length", "must be finite"));
        }
        if t.min_length_px < 0.0 || t.min_length_px > t.max_length_px {
            return Err(invalid(
                "transition.length",
                format!("{}..{} is not a valid range", t.min_length_px, t.max_length_px),
            ));
        }
        if !(t.max_angle_deg.is_finite() && t.max_angle_deg >= 0.0) {
            return Err(invalid("transition.max_angle_deg", "must be non-negative"));
        }
        if !(self.hover.scale.is_finite() && self.hover.scale >= 0.0) {
            return Err(invalid("hover.scale", "must be non-negative"));
        }
        Ok(())
    }

    pub fn viewport_size(&self) -> Size {
        Size::new(self.viewport.0, self.viewport.1)
    }

    pub fn loading(&self) -> Duration {
        Duration::from_millis(self.loading_ms)
    }

    pub fn per_char_delay(&self) -> Duration {
        Duration::from_millis(self.typing.per_char_ms)
    }

    pub fn overlay(&self) -> OverlayConfig {
        let t = &self.transition;
        OverlayConfig {
            duration: Duration::from_millis(t.duration_ms),
            fade: Duration::from_millis(t.fade_ms),
            line_count: t.line_count,
            length_px: (t.min_length_px, t.max_length_px),
            max_angle_deg: t.max_angle_deg,
            max_start_offset: Duration::from_millis(t.max_start_offset_ms),
        }
    }

    pub fn burst(&self) -> BurstConfig {
        BurstConfig {
            particle_count: self.hover.particle_count,
            duration: Duration::from_millis(self.hover.duration_ms),
            scale: self.hover.scale,
        }
    }

    pub fn parallax(&self) -> ParallaxConfig {
        ParallaxConfig {
            domain: self.parallax.domain_px,
            range: self.parallax.range_px,
            smoothing: Duration::from_millis(self.parallax.smoothing_ms),
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.contact.submit_ms)
    }

    pub fn success_duration(&self) -> Duration {
        Duration::from_millis(self.contact.success_ms)
    }
}

/// Reads a config file. A missing file yields the defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<SiteConfig, ConfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(s) => {
            let cfg = SiteConfig::from_json_str(&s)?;
            log::info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no config at {}, using defaults", path.display());
            Ok(SiteConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_defaults() {
        assert_eq!(SiteConfig::from_json_str("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json_str(
            r#"{ "seed": 7, "transition": { "line_count": 5 }, "contact": { "submit_ms": 10 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.overlay().line_count, 5);
        assert_eq!(cfg.overlay().duration, Duration::from_millis(800));
        assert_eq!(cfg.submit_delay(), Duration::from_millis(10));
        assert_eq!(cfg.success_duration(), Duration::from_secs(3));
    }

    #[test]
    fn rejects_degenerate_values() {
        let err = SiteConfig::from_json_str(r#"{ "parallax": { "domain_px": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "parallax.domain_px", .. }));

        let err = SiteConfig::from_json_str(
            r#"{ "transition": { "min_length_px": 200, "max_length_px": 100 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "transition.length", .. }));

        let err = SiteConfig::from_json_str(r#"{ "parallax": { "smoothing_ms": 5000 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "parallax.smoothing_ms", .. }));
        let cfg = SiteConfig::from_json_str(r#"{ "parallax": { "smoothing_ms": 16 } }"#).unwrap();
        assert_eq!(cfg.parallax.smoothing_ms, 16);

        assert!(matches!(
            SiteConfig::from_json_str("{ nope").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = load_config("/definitely/not/here/inkfolio.json").unwrap();
        assert_eq!(cfg, SiteConfig::default());
    }
}
