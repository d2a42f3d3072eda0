use std::io::Read;
use std::time::Duration;

use crate::ease::FadeEase;
use crate::foundation::error::{BannerError, BannerResult};

/// Timing of the banner cross-fade.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransitionTiming {
    /// Delay between starting the fade-out and swapping the image. Covers decode latency of
    /// typical banner assets.
    pub settle_delay_ms: u64,
    /// Animation frames to wait after the swap before fading in.
    pub frame_barrier: u8,
    /// Duration of the fade-in.
    pub fade_in_ms: u64,
    pub fade_ease: FadeEase,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            settle_delay_ms: 250,
            frame_barrier: 2,
            fade_in_ms: 250,
            fade_ease: FadeEase::EaseOut,
        }
    }
}

impl TransitionTiming {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    pub fn validate(&self) -> BannerResult<()> {
        if self.frame_barrier == 0 {
            return Err(BannerError::validation(
                "transition frameBarrier must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Engine-level settings owned by the host application.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub transition: TransitionTiming,
}

impl EngineConfig {
    /// Decode and validate a config from JSON text. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> BannerResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Decode and validate a config from a reader.
    pub fn from_reader(r: impl Read) -> BannerResult<Self> {
        let cfg: Self = serde_json::from_reader(r)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BannerResult<()> {
        self.transition.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.transition.settle_delay(), Duration::from_millis(250));
        assert_eq!(cfg.transition.frame_barrier, 2);
    }

    #[test]
    fn partial_override() {
        let cfg = EngineConfig::from_json_str(
            r#"{ "transition": { "settleDelayMs": 400, "fadeEase": "linear" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.transition.settle_delay_ms, 400);
        assert_eq!(cfg.transition.fade_ease, FadeEase::Linear);
        assert_eq!(cfg.transition.fade_in_ms, 250);
    }

    #[test]
    fn zero_frame_barrier_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "transition": { "frameBarrier": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, BannerError::Validation(_)));
    }

    #[test]
    fn malformed_json_is_serde_error() {
        let err = EngineConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, BannerError::Serde(_)));
    }
}
