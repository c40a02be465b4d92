//! Port creation arguments.

use bess_client::PortOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key carrying the name hint in a flat option mapping.
const NAME_KEY: &str = "name";

/// Arguments of a port creation request.
///
/// The name hint travels separately from the options; everything else is
/// handed to the engine as-is. Serialised form is a flat mapping:
///
/// ```yaml
/// name: eth0
/// port_id: 0
/// num_inc_q: 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortConfig {
    /// Requested port name. The engine picks one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Driver-specific options.
    #[serde(flatten)]
    pub options: PortOptions,
}

impl PortConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits the name hint out of a flat option mapping.
    ///
    /// A `null` name counts as no hint. A name that is not a string stays
    /// among the options for the engine to reject.
    pub fn from_kwargs(mut options: PortOptions) -> Self {
        let name = match options.remove(NAME_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                options.insert(NAME_KEY.to_string(), other);
                None
            }
        };
        Self { name, options }
    }

    /// Sets the name hint.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds or replaces a driver option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> PortOptions {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_builder() {
        let config = PortConfig::new()
            .with_name("eth0")
            .with_option("mtu", 1500)
            .with_option("loopback", true);

        assert_eq!(config.name.as_deref(), Some("eth0"));
        assert_eq!(config.options.get("mtu"), Some(&json!(1500)));
        assert_eq!(config.options.get("loopback"), Some(&json!(true)));
        assert!(!config.options.contains_key("name"));
    }

    #[test]
    fn test_from_kwargs_pops_name() {
        let config = PortConfig::from_kwargs(map(json!({"name": "eth0", "mtu": 1500})));
        assert_eq!(config.name.as_deref(), Some("eth0"));
        assert_eq!(config.options, map(json!({"mtu": 1500})));
    }

    #[test]
    fn test_from_kwargs_without_name() {
        let config = PortConfig::from_kwargs(map(json!({"vdev": "net_tap0"})));
        assert_eq!(config.name, None);
        assert_eq!(config.options.len(), 1);

        let config = PortConfig::from_kwargs(map(json!({"name": null})));
        assert_eq!(config.name, None);
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_from_kwargs_keeps_non_string_name_as_option() {
        let config = PortConfig::from_kwargs(map(json!({"name": 7, "mtu": 1})));
        assert_eq!(config.name, None);
        assert_eq!(config.options, map(json!({"name": 7, "mtu": 1})));
    }

    #[test]
    fn test_flat_serde() {
        let config: PortConfig =
            serde_json::from_value(json!({"name": "eth1", "pci": "03:00.0"})).unwrap();
        assert_eq!(config.name.as_deref(), Some("eth1"));
        assert_eq!(config.options, map(json!({"pci": "03:00.0"})));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back, json!({"name": "eth1", "pci": "03:00.0"}));

        let anonymous = serde_json::to_value(PortConfig::new().with_option("port_id", 1)).unwrap();
        assert_eq!(anonymous, json!({"port_id": 1}));
    }
}
