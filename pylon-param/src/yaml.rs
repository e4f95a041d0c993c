//! YAML parameter file loading.
//!
//! Two layouts are accepted. The ROS 2 layout scopes parameters per node:
//!
//! ```yaml
//! /**:
//!   ros__parameters:
//!     frame_rate: 10.0
//!
//! /pylon_camera_node:
//!   ros__parameters:
//!     device_user_id: "left"
//!     gige:
//!       mtu_size: 1500
//! ```
//!
//! The flat ROS 1 layout is a plain mapping of names to values, as found in
//! the camera driver's `default.yaml`. In both layouts nested mappings are
//! flattened with `/`, so the example above yields `gige/mtu_size`.

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::value::ParameterValue;
use crate::{Error, Result};

const ROS_PARAMETERS_KEY: &str = "ros__parameters";

/// Load parameter overrides from a YAML file for the given node.
pub fn load_parameter_file(
    path: &Path,
    node_fqn: &str,
) -> Result<HashMap<String, ParameterValue>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_parameter_string(&content, node_fqn)
}

/// Parse a YAML string and extract parameter overrides for the given node.
pub fn load_parameter_string(
    yaml: &str,
    node_fqn: &str,
) -> Result<HashMap<String, ParameterValue>> {
    let doc: Value = serde_yaml::from_str(yaml)?;

    let mut result = HashMap::new();
    let mapping = match doc {
        Value::Mapping(mapping) => mapping,
        // An empty file parses as null
        Value::Null => return Ok(result),
        _ => {
            return Err(Error::InvalidParameterFile(
                "YAML root must be a mapping".to_string(),
            ));
        }
    };

    if !is_node_scoped(&mapping) {
        flatten_into(&mapping, "", &mut result)?;
        return Ok(result);
    }

    for (key, node_val) in &mapping {
        let selector = key.as_str().ok_or_else(|| {
            Error::InvalidParameterFile("node selectors must be strings".to_string())
        })?;

        if !matches_node(selector, node_fqn) {
            continue;
        }

        let node_map = node_val.as_mapping().ok_or_else(|| {
            Error::InvalidParameterFile(format!("value for '{}' must be a mapping", selector))
        })?;

        if let Some(params) = node_map.get(ROS_PARAMETERS_KEY) {
            let params_map = params.as_mapping().ok_or_else(|| {
                Error::InvalidParameterFile(format!("{} must be a mapping", ROS_PARAMETERS_KEY))
            })?;
            // Later blocks override earlier ones
            flatten_into(params_map, "", &mut result)?;
        }
    }

    Ok(result)
}

/// A file is node scoped when any top-level entry carries `ros__parameters`.
fn is_node_scoped(mapping: &Mapping) -> bool {
    mapping.values().any(|v| {
        v.as_mapping()
            .is_some_and(|m| m.contains_key(ROS_PARAMETERS_KEY))
    })
}

fn flatten_into(
    mapping: &Mapping,
    prefix: &str,
    out: &mut HashMap<String, ParameterValue>,
) -> Result<()> {
    for (pname, pval) in mapping {
        let name = pname.as_str().ok_or_else(|| {
            Error::InvalidParameterFile("parameter names must be strings".to_string())
        })?;
        let full_name = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        };

        if let Value::Mapping(nested) = pval {
            flatten_into(nested, &full_name, out)?;
            continue;
        }

        match yaml_value_to_parameter(pval) {
            Some(value) => {
                out.insert(full_name, value);
            }
            None => warn!(
                "[PARAMS] skipping '{}': only scalar parameter values are supported",
                full_name
            ),
        }
    }
    Ok(())
}

/// Check whether a node selector matches the given fully-qualified node name.
///
/// Selectors:
/// - `/**` matches any node
/// - `/some_ns/**` matches any node nested below `/some_ns`, at any depth;
///   `/some_ns_other/node` and `/some_ns` itself do not match
/// - `/some_ns/*` matches direct children of `/some_ns` only
/// - `/node_name`, `/ns/node_name` exact match
fn matches_node(selector: &str, node_fqn: &str) -> bool {
    if selector == "/**" || selector == "**" {
        return true;
    }

    if let Some(prefix) = selector.strip_suffix("/**") {
        return node_fqn
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|rest| !rest.is_empty());
    }

    if let Some(prefix) = selector.strip_suffix("/*") {
        let Some(rest) = node_fqn
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return false;
        };
        return !rest.is_empty() && !rest.contains('/');
    }

    selector == node_fqn
}

/// Convert a scalar YAML value to a ParameterValue.
///
/// Integers stay integers and floats become doubles; readers that want a
/// double accept either.
pub(crate) fn yaml_value_to_parameter(val: &Value) -> Option<ParameterValue> {
    match val {
        Value::Bool(b) => Some(ParameterValue::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(ParameterValue::Integer)
            .or_else(|| n.as_f64().map(ParameterValue::Double)),
        Value::String(s) => Some(ParameterValue::String(s.clone())),
        Value::Null => Some(ParameterValue::NotSet),
        Value::Tagged(tagged) => yaml_value_to_parameter(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
