use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DELAY_MS, DEFAULT_DELAY_TOLERANCE_PX, DEFAULT_DISTANCE_PX};

/// Pointer movement in pixels, either as a radius or per axis.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(untagged)]
pub enum Distance {
    Scalar(f64),
    Axes {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
    },
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        Distance::Scalar(value)
    }
}

impl Distance {
    fn validate(&self, field: &str) -> Result<(), String> {
        let components: Vec<f64> = match *self {
            Distance::Scalar(value) => vec![value],
            Distance::Axes { x, y } => x.into_iter().chain(y).collect(),
        };
        if components.is_empty() {
            return Err(format!("{field} needs at least one of x or y"));
        }
        validate_amount(field, &components)
    }
}

fn validate_amount(field: &str, values: &[f64]) -> Result<(), String> {
    if values.iter().all(|v| v.is_finite() && *v >= 0.0) {
        Ok(())
    } else {
        Err(format!("{field} must be a finite, non-negative number"))
    }
}

/// Hold the pointer for `value` milliseconds, moving at most `tolerance`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DelayConstraint {
    pub value: f64,
    pub tolerance: Distance,
}

/// Move the pointer at least `value` before the drag starts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DistanceConstraint {
    pub value: Distance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Distance>,
}

/// Preconditions gating a pointer-initiated drag. An empty set activates
/// immediately.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ActivationConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelayConstraint>,
}

/// One check handed to the drag engine, in evaluation order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActivationCheck {
    Delay(DelayConstraint),
    Distance(DistanceConstraint),
}

impl ActivationConstraints {
    /// Touch default: a 200 ms hold within 10 px.
    pub fn touch_default() -> Self {
        Self {
            distance: None,
            delay: Some(DelayConstraint {
                value: DEFAULT_DELAY_MS,
                tolerance: Distance::Scalar(DEFAULT_DELAY_TOLERANCE_PX),
            }),
        }
    }

    /// Default for everything else: the touch hold, or 5 px of movement.
    pub fn other_default() -> Self {
        Self {
            distance: Some(DistanceConstraint {
                value: Distance::Scalar(DEFAULT_DISTANCE_PX),
                tolerance: None,
            }),
            ..Self::touch_default()
        }
    }

    /// Delay check first, then distance.
    pub fn to_checks(&self) -> Vec<ActivationCheck> {
        self.delay
            .map(ActivationCheck::Delay)
            .into_iter()
            .chain(self.distance.map(ActivationCheck::Distance))
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if let Some(delay) = &self.delay {
            validate_amount("delay.value", &[delay.value])?;
            delay.tolerance.validate("delay.tolerance")?;
        }
        if let Some(distance) = &self.distance {
            distance.value.validate("distance.value")?;
            if let Some(tolerance) = &distance.tolerance {
                tolerance.validate("distance.tolerance")?;
            }
        }
        Ok(())
    }
}
