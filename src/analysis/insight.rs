//! Categorical judgments derived from composition metrics.
//!
//! Pure threshold mapping: the same metrics always produce the same
//! insight set, and no metric value can fail to map.

use serde::Serialize;
use std::fmt;

use super::composition::CompositionMetrics;

const BALANCE_GOOD_BELOW: f64 = 0.1;
const BRIGHTNESS_DARK_BELOW: f64 = 0.3;
const BRIGHTNESS_BRIGHT_ABOVE: f64 = 0.7;
const THIRDS_STRONG_ABOVE: f64 = 0.4;
const CONTRAST_LOW_BELOW: f64 = 0.15;
const CONTRAST_GOOD_ABOVE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceInsight {
    GoodHorizontal,
    RebalanceHorizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrightnessInsight {
    TooDark,
    TooBright,
    Good,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThirdsInsight {
    StrongThirds,
    RepositionSubject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContrastInsight {
    IncreaseContrast,
    Good,
}

impl BalanceInsight {
    pub fn message(&self) -> &'static str {
        match self {
            BalanceInsight::GoodHorizontal => "good horizontal balance",
            BalanceInsight::RebalanceHorizontal => "consider rebalancing elements horizontally",
        }
    }
}

impl BrightnessInsight {
    pub fn message(&self) -> &'static str {
        match self {
            BrightnessInsight::TooDark => "too dark",
            BrightnessInsight::TooBright => "too bright",
            BrightnessInsight::Good => "good overall brightness",
        }
    }
}

impl ThirdsInsight {
    pub fn message(&self) -> &'static str {
        match self {
            ThirdsInsight::StrongThirds => "good use of rule of thirds",
            ThirdsInsight::RepositionSubject => {
                "consider repositioning key elements along the thirds grid"
            }
        }
    }
}

impl ContrastInsight {
    pub fn message(&self) -> &'static str {
        match self {
            ContrastInsight::IncreaseContrast => "consider increasing contrast",
            ContrastInsight::Good => "good contrast",
        }
    }
}

impl fmt::Display for BalanceInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl fmt::Display for BrightnessInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl fmt::Display for ThirdsInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl fmt::Display for ContrastInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One judgment per metric axis. `contrast` is `None` when the metric
/// falls in the neutral middle band, which carries no judgment at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompositionInsight {
    pub balance: BalanceInsight,
    pub brightness: BrightnessInsight,
    pub composition: ThirdsInsight,
    pub contrast: Option<ContrastInsight>,
}

impl CompositionInsight {
    /// Messages in a fixed order, contrast last and only when present.
    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages = vec![
            self.balance.message(),
            self.brightness.message(),
            self.composition.message(),
        ];
        if let Some(contrast) = self.contrast {
            messages.push(contrast.message());
        }
        messages
    }
}

/// Boundary values take the second branch: a balance of exactly 0.1 is not
/// "good", a brightness of exactly 0.3 or 0.7 is.
pub fn generate_insights(metrics: &CompositionMetrics) -> CompositionInsight {
    let balance = if metrics.balance_horizontal < BALANCE_GOOD_BELOW {
        BalanceInsight::GoodHorizontal
    } else {
        BalanceInsight::RebalanceHorizontal
    };

    let brightness = if metrics.overall_brightness < BRIGHTNESS_DARK_BELOW {
        BrightnessInsight::TooDark
    } else if metrics.overall_brightness > BRIGHTNESS_BRIGHT_ABOVE {
        BrightnessInsight::TooBright
    } else {
        BrightnessInsight::Good
    };

    let composition = if metrics.thirds_intensity > THIRDS_STRONG_ABOVE {
        ThirdsInsight::StrongThirds
    } else {
        ThirdsInsight::RepositionSubject
    };

    let contrast = if metrics.contrast < CONTRAST_LOW_BELOW {
        Some(ContrastInsight::IncreaseContrast)
    } else if metrics.contrast > CONTRAST_GOOD_ABOVE {
        Some(ContrastInsight::Good)
    } else {
        None
    };

    CompositionInsight {
        balance,
        brightness,
        composition,
        contrast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(f: impl FnOnce(&mut CompositionMetrics)) -> CompositionMetrics {
        let mut metrics = CompositionMetrics {
            balance_horizontal: 0.05,
            balance_vertical: 0.05,
            thirds_intensity: 0.5,
            overall_brightness: 0.5,
            edge_density: 0.3,
            contrast: 0.3,
        };
        f(&mut metrics);
        metrics
    }

    #[test]
    fn well_composed_metrics_read_as_good() {
        let insight = generate_insights(&metrics_with(|_| {}));
        assert_eq!(insight.balance, BalanceInsight::GoodHorizontal);
        assert_eq!(insight.brightness, BrightnessInsight::Good);
        assert_eq!(insight.composition, ThirdsInsight::StrongThirds);
        assert_eq!(insight.contrast, None);
    }

    #[test]
    fn generation_is_pure() {
        let metrics = metrics_with(|m| m.contrast = 0.6);
        assert_eq!(generate_insights(&metrics), generate_insights(&metrics));
    }

    #[test]
    fn balance_boundary_is_exclusive() {
        let at_threshold = metrics_with(|m| m.balance_horizontal = 0.1);
        assert_eq!(
            generate_insights(&at_threshold).balance,
            BalanceInsight::RebalanceHorizontal
        );

        let just_below = metrics_with(|m| m.balance_horizontal = 0.0999);
        assert_eq!(
            generate_insights(&just_below).balance,
            BalanceInsight::GoodHorizontal
        );
    }

    #[test]
    fn brightness_boundaries_land_in_the_good_band() {
        let dark_edge = metrics_with(|m| m.overall_brightness = 0.3);
        assert_eq!(generate_insights(&dark_edge).brightness, BrightnessInsight::Good);

        let bright_edge = metrics_with(|m| m.overall_brightness = 0.7);
        assert_eq!(
            generate_insights(&bright_edge).brightness,
            BrightnessInsight::Good
        );

        let dark = metrics_with(|m| m.overall_brightness = 0.29);
        assert_eq!(generate_insights(&dark).brightness, BrightnessInsight::TooDark);

        let bright = metrics_with(|m| m.overall_brightness = 0.71);
        assert_eq!(
            generate_insights(&bright).brightness,
            BrightnessInsight::TooBright
        );
    }

    #[test]
    fn thirds_boundary_is_exclusive() {
        let at_threshold = metrics_with(|m| m.thirds_intensity = 0.4);
        assert_eq!(
            generate_insights(&at_threshold).composition,
            ThirdsInsight::RepositionSubject
        );
    }

    #[test]
    fn middle_contrast_band_carries_no_judgment() {
        for value in [0.15, 0.3, 0.5] {
            let metrics = metrics_with(|m| m.contrast = value);
            assert_eq!(generate_insights(&metrics).contrast, None);
        }

        let low = metrics_with(|m| m.contrast = 0.1);
        assert_eq!(
            generate_insights(&low).contrast,
            Some(ContrastInsight::IncreaseContrast)
        );

        let high = metrics_with(|m| m.contrast = 0.6);
        assert_eq!(generate_insights(&high).contrast, Some(ContrastInsight::Good));
    }

    #[test]
    fn messages_include_contrast_only_when_judged() {
        let neutral = generate_insights(&metrics_with(|m| m.contrast = 0.3));
        assert_eq!(neutral.messages().len(), 3);

        let judged = generate_insights(&metrics_with(|m| m.contrast = 0.6));
        assert_eq!(judged.messages().len(), 4);
        assert_eq!(judged.messages()[3], "good contrast");
    }
}
