//! Experience curve: experience required to advance from one level to the next.
//!
//! The curve is a piecewise table. Each segment continues from the value the
//! previous segment reached at its upper bound, so the curve stays continuous
//! and strictly increasing as long as every segment grows.

/// Growth shape of one curve segment, relative to the segment's anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentShape {
    /// `anchor_value + per_level * (level - anchor_level)`
    Linear { per_level: f64 },
    /// `anchor_value * (level / anchor_level) ^ exponent`
    Power { exponent: f64 },
}

/// A bracket of levels sharing one growth shape.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveSegment {
    /// Inclusive upper level of this bracket. `None` for the last, open-ended bracket.
    pub up_to: Option<u32>,
    pub shape: SegmentShape,
}

impl CurveSegment {
    pub const fn linear(up_to: u32, per_level: f64) -> Self {
        Self {
            up_to: Some(up_to),
            shape: SegmentShape::Linear { per_level },
        }
    }

    pub const fn power(up_to: Option<u32>, exponent: f64) -> Self {
        Self {
            up_to,
            shape: SegmentShape::Power { exponent },
        }
    }

    fn value(&self, anchor_level: u32, anchor_value: f64, level: u32) -> f64 {
        match self.shape {
            SegmentShape::Linear { per_level } => {
                anchor_value + per_level * f64::from(level - anchor_level)
            }
            SegmentShape::Power { exponent } => {
                anchor_value * (f64::from(level) / f64::from(anchor_level)).powf(exponent)
            }
        }
    }
}

/// Errors reported by [`ExperienceCurve::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("experience curve has no segments")]
    Empty,

    #[error("experience curve base must be at least 1")]
    BaseTooSmall,

    #[error("segment {index} does not grow")]
    NonIncreasing { index: usize },

    #[error("segment {index} bound must be above the previous bound")]
    UnorderedBounds { index: usize },

    #[error("only the last segment may be open-ended")]
    OpenSegmentNotLast,

    #[error("experience required does not grow from level {level} to the next")]
    FlatAt { level: u32 },
}

/// Piecewise experience curve, `required(level)` = experience needed to leave `level`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceCurve {
    /// Experience required at level 1.
    pub base: u64,
    pub segments: Vec<CurveSegment>,
}

impl Default for ExperienceCurve {
    /// Gentle linear start, then power brackets with increasing exponents.
    fn default() -> Self {
        Self {
            base: 500,
            segments: vec![
                CurveSegment::linear(10, 100.0),
                CurveSegment::power(Some(30), 1.05),
                CurveSegment::power(Some(50), 1.15),
                CurveSegment::power(Some(75), 1.25),
                CurveSegment::power(None, 1.35),
            ],
        }
    }
}

impl ExperienceCurve {
    /// Experience required to advance from `level` to `level + 1`. Levels below 1 evaluate as 1.
    pub fn required(&self, level: u32) -> u64 {
        let level = level.max(1);
        let mut anchor_level = 1u32;
        let mut anchor_value = self.base as f64;

        for segment in &self.segments {
            match segment.up_to {
                Some(up_to) if level > up_to => {
                    anchor_value = segment.value(anchor_level, anchor_value, up_to);
                    anchor_level = up_to;
                }
                _ => {
                    let value = segment.value(anchor_level, anchor_value, level);
                    return (value.floor() as u64).max(1);
                }
            }
        }

        // Past the last bounded segment: hold the last anchor growth linearly.
        (anchor_value.floor() as u64)
            .max(1)
            .saturating_add(u64::from(level - anchor_level))
    }

    /// Cumulative experience needed to reach `level` from level 1. Saturates at `u64::MAX`.
    pub fn total_to_reach(&self, level: u32) -> u64 {
        (1..level.max(1)).fold(0u64, |total, l| total.saturating_add(self.required(l)))
    }

    /// Levels checked for strict growth beyond the last segment bound.
    pub const CHECKED_LEVELS: u32 = 1_000;

    /// Checks the table produces a strictly increasing curve.
    ///
    /// Segment shapes are checked first; the floored values are then compared
    /// level by level up to the last bound or [`Self::CHECKED_LEVELS`],
    /// whichever is higher.
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.segments.is_empty() {
            return Err(CurveError::Empty);
        }
        if self.base < 1 {
            return Err(CurveError::BaseTooSmall);
        }

        let mut previous_bound = 1u32;
        for (index, segment) in self.segments.iter().enumerate() {
            let grows = match segment.shape {
                SegmentShape::Linear { per_level } => per_level >= 1.0,
                SegmentShape::Power { exponent } => exponent > 0.0,
            };
            if !grows {
                return Err(CurveError::NonIncreasing { index });
            }

            match segment.up_to {
                Some(bound) if bound <= previous_bound => {
                    return Err(CurveError::UnorderedBounds { index });
                }
                Some(bound) => previous_bound = bound,
                None if index + 1 != self.segments.len() => {
                    return Err(CurveError::OpenSegmentNotLast);
                }
                None => {}
            }
        }

        let last = previous_bound.max(Self::CHECKED_LEVELS);
        let mut previous = self.required(1);
        for level in 2..=last {
            let current = self.required(level);
            if current <= previous {
                return Err(CurveError::FlatAt { level: level - 1 });
            }
            previous = current;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_requires_base() {
        assert_eq!(ExperienceCurve::default().required(1), 500);
        assert_eq!(ExperienceCurve::default().required(0), 500);
    }

    #[test]
    fn linear_bracket() {
        let curve = ExperienceCurve::default();
        assert_eq!(curve.required(2), 600);
        assert_eq!(curve.required(10), 1400);
    }

    #[test]
    fn strictly_increasing() {
        let curve = ExperienceCurve::default();
        for level in 1..2_000 {
            assert!(
                curve.required(level + 1) > curve.required(level),
                "curve flat at level {level}"
            );
        }
    }

    #[test]
    fn level_hundred_costs_hundreds_of_thousands() {
        let total = ExperienceCurve::default().total_to_reach(100);
        assert!((100_000..1_000_000).contains(&total), "total = {total}");
    }

    #[test]
    fn default_curve_validates() {
        assert_eq!(ExperienceCurve::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_flat_segment() {
        let curve = ExperienceCurve {
            base: 100,
            segments: vec![CurveSegment::linear(10, 0.0)],
        };
        assert_eq!(curve.validate(), Err(CurveError::NonIncreasing { index: 0 }));
    }

    #[test]
    fn rejects_open_segment_in_middle() {
        let curve = ExperienceCurve {
            base: 100,
            segments: vec![
                CurveSegment::power(None, 1.1),
                CurveSegment::linear(20, 10.0),
            ],
        };
        assert_eq!(curve.validate(), Err(CurveError::OpenSegmentNotLast));
    }

    #[test]
    fn rejects_growth_lost_to_rounding() {
        let curve = ExperienceCurve {
            base: 2,
            segments: vec![CurveSegment::power(None, 0.1)],
        };
        assert_eq!(curve.validate(), Err(CurveError::FlatAt { level: 1 }));
    }

    #[test]
    fn steep_totals_saturate() {
        let curve = ExperienceCurve {
            base: u64::MAX / 4,
            segments: vec![CurveSegment::power(None, 8.0)],
        };
        assert_eq!(curve.total_to_reach(1_000), u64::MAX);
    }
}
