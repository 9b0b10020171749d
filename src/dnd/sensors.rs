use serde::{Deserialize, Serialize};

use super::constraints::{ActivationCheck, ActivationConstraints};
use crate::errors::ConfigError;

/// Activation constraints per input kind, as configured for the editor canvas.
///
/// `mouse` only applies when the pointer is on the source's handle and falls
/// back to `other` when unset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouse: Option<ActivationConstraints>,
    #[serde(default = "ActivationConstraints::touch_default")]
    pub touch: ActivationConstraints,
    #[serde(default = "ActivationConstraints::other_default")]
    pub other: ActivationConstraints,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mouse: None,
            touch: ActivationConstraints::touch_default(),
            other: ActivationConstraints::other_default(),
        }
    }
}

impl SensorConfig {
    /// Checks every configured constraint set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sets = [
            ("mouse", self.mouse.as_ref()),
            ("touch", Some(&self.touch)),
            ("other", Some(&self.other)),
        ];
        for (sensor, constraints) in sets {
            if let Some(constraints) = constraints {
                constraints
                    .validate()
                    .map_err(|reason| ConfigError::InvalidConstraint { sensor, reason })?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerType {
    Mouse,
    Touch,
    Pen,
    Other(String),
}

impl From<&str> for PointerType {
    fn from(value: &str) -> Self {
        match value {
            "mouse" => PointerType::Mouse,
            "touch" => PointerType::Touch,
            "pen" => PointerType::Pen,
            other => PointerType::Other(other.to_string()),
        }
    }
}

/// A node in the document the pointer can land on.
pub trait Element: PartialEq {
    /// True when `other` is a descendant of `self`.
    fn contains(&self, other: &Self) -> bool;
}

/// What sits under the pointer. Only elements can match a handle.
#[derive(Clone, Debug, PartialEq)]
pub enum EventTarget<E> {
    Element(E),
    /// Text nodes, the document, the window.
    NonElement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<E> {
    pub pointer_type: PointerType,
    pub target: EventTarget<E>,
}

/// The draggable being pressed, with its optional grab handle.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSource<E> {
    pub handle: Option<E>,
}

impl<E: Element> DragSource<E> {
    fn is_grabbed_at(&self, target: &E) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle == target || handle.contains(target))
    }
}

/// Picks the activation constraints for each drag-start candidate.
///
/// Built once when the drag sensors are set up; configuration errors surface
/// here and never per event. Resolution reads only its arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActivationResolver {
    config: SensorConfig,
}

impl ActivationResolver {
    pub fn new(config: SensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parses and validates a JSON sensor configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn resolve<E: Element>(
        &self,
        event: &PointerEvent<E>,
        source: &DragSource<E>,
    ) -> &ActivationConstraints {
        match (&event.pointer_type, &event.target) {
            (PointerType::Mouse, EventTarget::Element(target)) if source.is_grabbed_at(target) => {
                self.config.mouse.as_ref().unwrap_or(&self.config.other)
            }
            (PointerType::Touch, _) => &self.config.touch,
            _ => &self.config.other,
        }
    }

    /// Resolved constraints as ordered checks for the drag engine.
    pub fn activation_checks<E: Element>(
        &self,
        event: &PointerEvent<E>,
        source: &DragSource<E>,
    ) -> Vec<ActivationCheck> {
        self.resolve(event, source).to_checks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dnd::constraints::{DelayConstraint, Distance, DistanceConstraint};
    use serde_json::json;

    /// Element identified by its path from the document root.
    #[derive(Clone, Debug, PartialEq)]
    struct Node(Vec<u32>);

    impl Element for Node {
        fn contains(&self, other: &Self) -> bool {
            other.0.len() > self.0.len() && other.0.starts_with(&self.0)
        }
    }

    fn node(path: &[u32]) -> Node {
        Node(path.to_vec())
    }

    fn event(pointer_type: &str, target: EventTarget<Node>) -> PointerEvent<Node> {
        PointerEvent {
            pointer_type: pointer_type.into(),
            target,
        }
    }

    fn handle_source() -> DragSource<Node> {
        DragSource {
            handle: Some(node(&[0, 2])),
        }
    }

    fn delay_check() -> ActivationCheck {
        ActivationCheck::Delay(DelayConstraint {
            value: 200.0,
            tolerance: Distance::Scalar(10.0),
        })
    }

    fn distance_check() -> ActivationCheck {
        ActivationCheck::Distance(DistanceConstraint {
            value: Distance::Scalar(5.0),
            tolerance: None,
        })
    }

    #[test]
    fn mouse_on_handle_without_mouse_config_uses_other() {
        let resolver = ActivationResolver::default();
        let checks = resolver.activation_checks(
            &event("mouse", EventTarget::Element(node(&[0, 2]))),
            &handle_source(),
        );
        assert_eq!(checks, vec![delay_check(), distance_check()]);
    }

    #[test]
    fn touch_uses_delay_only() {
        let resolver = ActivationResolver::default();
        let checks = resolver.activation_checks(
            &event("touch", EventTarget::Element(node(&[5]))),
            &handle_source(),
        );
        assert_eq!(checks, vec![delay_check()]);
    }

    #[test]
    fn pen_falls_through_to_other() {
        let resolver = ActivationResolver::default();
        let checks = resolver.activation_checks(
            &event("pen", EventTarget::Element(node(&[0, 2]))),
            &handle_source(),
        );
        assert_eq!(checks, vec![delay_check(), distance_check()]);
    }

    #[test]
    fn mouse_outside_handle_falls_through_to_other() {
        let mouse = ActivationConstraints::default();
        let resolver = ActivationResolver::new(SensorConfig {
            mouse: Some(mouse),
            ..SensorConfig::default()
        })
        .unwrap();

        let outside = event("mouse", EventTarget::Element(node(&[0, 3])));
        assert_eq!(resolver.resolve(&outside, &handle_source()), &SensorConfig::default().other);

        let no_handle = DragSource { handle: None };
        let on_element = event("mouse", EventTarget::Element(node(&[0, 2])));
        assert_eq!(resolver.resolve(&on_element, &no_handle), &SensorConfig::default().other);

        let non_element = event("mouse", EventTarget::NonElement);
        assert_eq!(resolver.resolve(&non_element, &handle_source()), &SensorConfig::default().other);
    }

    #[test]
    fn configured_mouse_applies_inside_handle() {
        let mouse = ActivationConstraints::default();
        let resolver = ActivationResolver::new(SensorConfig {
            mouse: Some(mouse),
            ..SensorConfig::default()
        })
        .unwrap();

        let on_child = event("mouse", EventTarget::Element(node(&[0, 2, 1, 4])));
        assert_eq!(resolver.resolve(&on_child, &handle_source()), &mouse);
        assert!(resolver.activation_checks(&on_child, &handle_source()).is_empty());
    }

    #[test]
    fn json_config_fills_defaults() {
        let resolver = ActivationResolver::from_json(r#"{ "mouse": { "distance": { "value": 2 } } }"#).unwrap();
        let config = resolver.config();
        assert_eq!(config.touch, ActivationConstraints::touch_default());
        assert_eq!(config.other, ActivationConstraints::other_default());
        assert_eq!(
            config.mouse.unwrap().to_checks(),
            vec![ActivationCheck::Distance(DistanceConstraint {
                value: Distance::Scalar(2.0),
                tolerance: None,
            })]
        );
    }

    #[test]
    fn malformed_config_fails_at_setup() {
        let missing_tolerance = ActivationResolver::from_json(r#"{ "touch": { "delay": { "value": 200 } } }"#);
        assert!(matches!(missing_tolerance, Err(ConfigError::Parse(_))));

        let unknown_sensor = ActivationResolver::from_json(r#"{ "stylus": {} }"#);
        assert!(matches!(unknown_sensor, Err(ConfigError::Parse(_))));

        let negative: SensorConfig = serde_json::from_value(json!({
            "other": { "distance": { "value": -5 } }
        }))
        .unwrap();
        let err = ActivationResolver::new(negative).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConstraint { sensor: "other", .. }));
    }

    #[test]
    fn pointer_type_parsing() {
        assert_eq!(PointerType::from("mouse"), PointerType::Mouse);
        assert_eq!(PointerType::from("touch"), PointerType::Touch);
        assert_eq!(PointerType::from("pen"), PointerType::Pen);
        assert_eq!(PointerType::from("Mouse"), PointerType::Other("Mouse".into()));
    }
}
