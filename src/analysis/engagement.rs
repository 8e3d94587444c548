//! Engagement metrics derived from raw video statistics.
//!
//! This is the one fail-fast analysis: bad statistics surface as a
//! [`MetricsError`] instead of degrading, because a silently wrong ratio
//! is worse than no ratio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MetricsError;

/// Raw statistics as a metadata source reports them. Everything is
/// optional here; absence only becomes an error inside
/// [`calculate_metrics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStats {
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub subscriber_count: Option<u64>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceTier {
    Good,
    Average,
    Poor,
}

impl PerformanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Good => "good",
            PerformanceTier::Average => "average",
            PerformanceTier::Poor => "poor",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceRatings {
    pub like_ratio: PerformanceTier,
    pub comment_ratio: PerformanceTier,
}

/// Input counts together with every derived engagement figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementMetrics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub subscriber_count: u64,
    pub published_at: DateTime<Utc>,
    /// Likes per 100 views.
    pub like_ratio: f64,
    /// Comments per 100 views.
    pub comment_ratio: f64,
    /// Views per 100 subscribers.
    pub sub_conversion: f64,
    /// Views per elapsed day since publication.
    pub view_velocity: f64,
    /// Weighted blend of the ratios, capped at 100.
    pub engagement_score: f64,
    pub performance: PerformanceRatings,
}

pub fn calculate_metrics(stats: &VideoStats) -> Result<EngagementMetrics, MetricsError> {
    calculate_metrics_at(stats, Utc::now())
}

/// Same as [`calculate_metrics`] with an explicit clock, which keeps the
/// day arithmetic deterministic.
pub fn calculate_metrics_at(
    stats: &VideoStats,
    now: DateTime<Utc>,
) -> Result<EngagementMetrics, MetricsError> {
    let view_count = stats
        .view_count
        .ok_or(MetricsError::MissingField("view_count"))?;
    let like_count = stats
        .like_count
        .ok_or(MetricsError::MissingField("like_count"))?;
    let comment_count = stats
        .comment_count
        .ok_or(MetricsError::MissingField("comment_count"))?;
    let subscriber_count = stats
        .subscriber_count
        .ok_or(MetricsError::MissingField("subscriber_count"))?;
    let published_at = stats
        .published_at
        .ok_or(MetricsError::MissingField("published_at"))?;

    if view_count == 0 {
        return Err(MetricsError::ZeroDenominator("view_count"));
    }
    if subscriber_count == 0 {
        return Err(MetricsError::ZeroDenominator("subscriber_count"));
    }

    let views = view_count as f64;
    let like_ratio = like_count as f64 / views * 100.0;
    let comment_ratio = comment_count as f64 / views * 100.0;
    let sub_conversion = views / subscriber_count as f64 * 100.0;

    // Published today, or with a clock skewed into the future, counts as
    // one elapsed day.
    let elapsed_days = (now - published_at).num_days().max(1);
    let view_velocity = views / elapsed_days as f64;

    let engagement_score =
        (like_ratio * 20.0 + comment_ratio * 30.0 + sub_conversion * 0.3).min(100.0);

    let performance = PerformanceRatings {
        like_ratio: rate_like_ratio(like_ratio),
        comment_ratio: rate_comment_ratio(comment_ratio),
    };

    Ok(EngagementMetrics {
        view_count,
        like_count,
        comment_count,
        subscriber_count,
        published_at,
        like_ratio,
        comment_ratio,
        sub_conversion,
        view_velocity,
        engagement_score,
        performance,
    })
}

fn rate_like_ratio(like_ratio: f64) -> PerformanceTier {
    if like_ratio > 4.0 {
        PerformanceTier::Good
    } else if like_ratio > 1.0 {
        PerformanceTier::Average
    } else {
        PerformanceTier::Poor
    }
}

fn rate_comment_ratio(comment_ratio: f64) -> PerformanceTier {
    if comment_ratio > 0.5 {
        PerformanceTier::Good
    } else if comment_ratio > 0.1 {
        PerformanceTier::Average
    } else {
        PerformanceTier::Poor
    }
}
