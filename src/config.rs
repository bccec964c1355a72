//! Per-artwork configuration schemas and their resolved runtime values.
//!
//! A schema is a closed sum type over property kinds, validated
//! exhaustively when it is constructed; a bad descriptor (minimum above
//! maximum, default outside the range) is rejected immediately with the
//! offending key named, never at render time. The engine itself only ever
//! sees resolved `Values`.

use crate::errors::ConfigError;

/// A named image source offered by an image property
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pub name: String,
    pub source: String,
}

impl ImageSource {
    pub fn new(name: &str, source: &str) -> Self {
        ImageSource {
            name: name.to_string(),
            source: source.to_string(),
        }
    }
}

/// One configurable property
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Number {
        default: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    NumberRange {
        default: Option<(f64, f64)>,
        min: f64,
        max: f64,
        step: Option<f64>,
    },
    Boolean {
        default: Option<bool>,
    },
    Text {
        default: Option<String>,
    },
    Choice {
        choices: Vec<String>,
        default: Option<String>,
    },
    Image {
        predefined: Vec<ImageSource>,
        default: Option<String>,
    },
}

/// A validated, ordered property schema
#[derive(Clone, Debug)]
pub struct Config {
    properties: Vec<(String, Property)>,
}

impl Config {
    /// Validate and freeze a schema. Every numeric descriptor is checked
    /// here so render passes never see an inconsistent property.
    pub fn new(properties: Vec<(&str, Property)>) -> Result<Self, ConfigError> {
        for (key, property) in &properties {
            validate(key, property)?;
        }
        Ok(Config {
            properties: properties
                .into_iter()
                .map(|(k, p)| (k.to_string(), p))
                .collect(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, p)| p)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    /// Resolve every property to its default runtime value
    pub fn default_values(&self) -> Values {
        let mut values = Values::new();
        for (key, property) in &self.properties {
            values.set(key, default_for(property));
        }
        values
    }
}

fn validate(key: &str, property: &Property) -> Result<(), ConfigError> {
    let err_key = || key.to_string();
    match property {
        Property::Number {
            default, min, max, ..
        } => {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ConfigError::MinOverMax {
                        key: err_key(),
                        min: *min,
                        max: *max,
                    });
                }
            }
            if let Some(default) = default {
                if let Some(min) = min {
                    if default < min {
                        return Err(ConfigError::DefaultOutOfRange {
                            key: err_key(),
                            default: *default,
                            min: *min,
                            max: max.unwrap_or(f64::INFINITY),
                        });
                    }
                }
                if let Some(max) = max {
                    if default > max {
                        return Err(ConfigError::DefaultOutOfRange {
                            key: err_key(),
                            default: *default,
                            min: min.unwrap_or(f64::NEG_INFINITY),
                            max: *max,
                        });
                    }
                }
            }
        }
        Property::NumberRange {
            default, min, max, ..
        } => {
            if min > max {
                return Err(ConfigError::MinOverMax {
                    key: err_key(),
                    min: *min,
                    max: *max,
                });
            }
            if let Some((lo, hi)) = default {
                for value in [lo, hi] {
                    if value < min || value > max {
                        return Err(ConfigError::DefaultOutOfRange {
                            key: err_key(),
                            default: *value,
                            min: *min,
                            max: *max,
                        });
                    }
                }
            }
        }
        Property::Choice { choices, default } => {
            if let Some(default) = default {
                if !choices.contains(default) {
                    return Err(ConfigError::UnknownChoice {
                        key: err_key(),
                        default: default.clone(),
                    });
                }
            }
        }
        Property::Boolean { .. } | Property::Text { .. } | Property::Image { .. } => {}
    }
    Ok(())
}

fn default_for(property: &Property) -> Value {
    match property {
        Property::Number { default, min, max, .. } => Value::Number(match default {
            Some(d) => *d,
            None => match (min, max) {
                (Some(min), Some(max)) => min + (max - min) / 2.0,
                (Some(min), None) => *min,
                (None, Some(max)) => *max,
                (None, None) => 0.0,
            },
        }),
        Property::NumberRange { default, min, max, .. } => {
            let (lo, hi) = default.unwrap_or((*min, *max));
            Value::Range(lo, hi)
        }
        Property::Boolean { default } => Value::Bool(default.unwrap_or(false)),
        Property::Text { default } => Value::Text(default.clone().unwrap_or_default()),
        Property::Choice { choices, default } => Value::Text(
            default
                .clone()
                .or_else(|| choices.first().cloned())
                .unwrap_or_default(),
        ),
        Property::Image { predefined, default } => Value::Text(
            default
                .clone()
                .or_else(|| predefined.first().map(|p| p.source.clone()))
                .unwrap_or_default(),
        ),
    }
}

/// A resolved runtime value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Range(f64, f64),
    Bool(bool),
    Text(String),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Range(..) => "number-range",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "text",
        }
    }
}

/// Resolved configuration values consumed by render passes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, Value)>,
}

impl Values {
    pub fn new() -> Self {
        Values::default()
    }

    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn require(&self, key: &str) -> Result<&Value, ConfigError> {
        self.get(key).ok_or_else(|| ConfigError::UnknownProperty {
            key: key.to_string(),
        })
    }

    pub fn number(&self, key: &str) -> Result<f64, ConfigError> {
        match self.require(key)? {
            Value::Number(n) => Ok(*n),
            other => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "number",
                actual: other.kind(),
            }),
        }
    }

    pub fn range(&self, key: &str) -> Result<(f64, f64), ConfigError> {
        match self.require(key)? {
            Value::Range(lo, hi) => Ok((*lo, *hi)),
            other => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "number-range",
                actual: other.kind(),
            }),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<bool, ConfigError> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "boolean",
                actual: other.kind(),
            }),
        }
    }

    pub fn text(&self, key: &str) -> Result<&str, ConfigError> {
        match self.require(key)? {
            Value::Text(s) => Ok(s),
            other => Err(ConfigError::TypeMismatch {
                key: key.to_string(),
                expected: "text",
                actual: other.kind(),
            }),
        }
    }
}
