//! `name:=value` parameter override rules.
//!
//! Values are parsed as YAML scalars, so `exposure:=5000` yields an integer,
//! `gain:=0.5` a double, `exposure_auto:=false` a bool and
//! `shutter_mode:=rolling` a string.

use serde_yaml::Value;

use crate::value::ParameterValue;
use crate::yaml::yaml_value_to_parameter;
use crate::{Error, Result};

const ASSIGNMENT: &str = ":=";

/// Parse a single `name:=value` rule.
pub fn parse_param_rule(rule: &str) -> Result<(String, ParameterValue)> {
    let invalid = || Error::InvalidParamRule(rule.to_string());

    let (name, raw) = rule.split_once(ASSIGNMENT).ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) || raw.contains(ASSIGNMENT) {
        return Err(invalid());
    }

    let value = if raw.is_empty() {
        ParameterValue::String(String::new())
    } else {
        let parsed: Value = serde_yaml::from_str(raw).map_err(|_| invalid())?;
        yaml_value_to_parameter(&parsed).ok_or_else(invalid)?
    };

    Ok((name.to_string(), value))
}

/// Parse every rule, failing on the first malformed one.
pub fn parse_param_rules<I, S>(rules: I) -> Result<Vec<(String, ParameterValue)>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    rules
        .into_iter()
        .map(|rule| parse_param_rule(rule.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_types() {
        assert_eq!(
            parse_param_rule("exposure:=5000").unwrap(),
            ("exposure".to_string(), ParameterValue::Integer(5000))
        );
        assert_eq!(
            parse_param_rule("gain:=0.5").unwrap().1,
            ParameterValue::Double(0.5)
        );
        assert_eq!(
            parse_param_rule("exposure_auto:=false").unwrap().1,
            ParameterValue::Bool(false)
        );
        assert_eq!(
            parse_param_rule("shutter_mode:=global_reset").unwrap().1,
            ParameterValue::String("global_reset".to_string())
        );
    }

    #[test]
    fn test_namespaced_name() {
        let (name, value) = parse_param_rule("gige/mtu_size:=1500").unwrap();
        assert_eq!(name, "gige/mtu_size");
        assert_eq!(value, ParameterValue::Integer(1500));
    }

    #[test]
    fn test_empty_value_is_empty_string() {
        assert_eq!(
            parse_param_rule("device_user_id:=").unwrap().1,
            ParameterValue::String(String::new())
        );
    }

    #[test]
    fn test_negative_frame_rate() {
        assert_eq!(
            parse_param_rule("frame_rate:=-1").unwrap().1,
            ParameterValue::Integer(-1)
        );
    }

    #[test]
    fn test_malformed_rules() {
        for rule in ["exposure", ":=5", "a b:=1", "a:=1:=2", "roi:=[1, 2]"] {
            assert!(
                matches!(parse_param_rule(rule), Err(Error::InvalidParamRule(_))),
                "rule {rule:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_many_stops_at_first_error() {
        assert_eq!(parse_param_rules(["binning:=2", "gamma:=1.2"]).unwrap().len(), 2);
        assert!(parse_param_rules(["binning:=2", "bogus"]).is_err());
    }
}
