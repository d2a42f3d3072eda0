/// Opacity curve for banner fades, named after the CSS timing keywords.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FadeEase {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl FadeEase {
    /// Map linear progress `t` to eased progress. `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }

    /// Interpolate from `from` to `to` at linear progress `t`.
    pub fn ramp(self, from: f64, to: f64, t: f64) -> f64 {
        from + (to - from) * self.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FadeEase; 4] = [
        FadeEase::Linear,
        FadeEase::EaseIn,
        FadeEase::EaseOut,
        FadeEase::EaseInOut,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
            assert_eq!(ease.apply(-3.0), 0.0);
            assert_eq!(ease.apply(7.0), 1.0);
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for ease in ALL {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b);
            assert!(b < c);
        }
    }

    #[test]
    fn ramp_runs_both_directions() {
        assert_eq!(FadeEase::Linear.ramp(1.0, 0.0, 0.25), 0.75);
        assert_eq!(FadeEase::Linear.ramp(0.0, 1.0, 0.25), 0.25);
    }

    #[test]
    fn css_names() {
        let e: FadeEase = serde_json::from_str("\"ease-in-out\"").unwrap();
        assert_eq!(e, FadeEase::EaseInOut);
    }
}
