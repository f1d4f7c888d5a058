//! # Time
//!
//! Locating a requested time within the discrete time steps of a collection and blending the
//! two snapshots around it.

use crate::prelude::*;

use ndarray::{ArrayBase, Data, Dimension};

/// Where a requested time falls within a sorted list of time steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeBracket {
    /// the time matches a step exactly
    Exact(usize),
    /// the time lies strictly between two consecutive steps
    Between {
        lower: usize,
        upper: usize,
        /// position between the two steps, `0` at `lower` and `1` at `upper`
        weight: f64,
    },
}

impl TimeBracket {
    /// find `time` in `times`, which must be sorted in ascending order
    ///
    /// When several steps hold the same time the last one is used.
    pub fn locate(times: &[f64], time: f64) -> Result<Self, Error> {
        if let Some(index) = times.iter().rposition(|t| *t == time) {
            return Ok(Self::Exact(index));
        }

        let bracket = times
            .windows(2)
            .position(|pair| pair[0] < time && time < pair[1]);

        match bracket {
            Some(lower) => {
                let (t1, t2) = (times[lower], times[lower + 1]);
                Ok(Self::Between {
                    lower,
                    upper: lower + 1,
                    weight: (time - t1) / (t2 - t1),
                })
            }
            None => Err(Error::TimeOutOfRange {
                time,
                first: times.first().copied().unwrap_or(f64::NAN),
                last: times.last().copied().unwrap_or(f64::NAN),
            }),
        }
    }
}

/// linear blend `lower + (upper - lower) * weight` of two snapshots of a field
pub fn blend<S1, S2, D>(
    lower: &ArrayBase<S1, D>,
    upper: &ArrayBase<S2, D>,
    weight: f64,
) -> ndarray::Array<f64, D>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = lower.to_owned();
    out.zip_mut_with(upper, |a, b| *a += (b - *a) * weight);
    out
}
