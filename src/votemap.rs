use serde::{Deserialize, Serialize};

/// Vote-map settings as reported by `get_votemap_config`.
///
/// Every field is optional on the wire; missing keys take their zero value
/// and unknown keys are ignored so newer consoles keep working. The settings
/// page stores numbers as strings and may leave text fields `null`, so each
/// field decodes leniently and a malformed value never hides `enabled`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteMapConfig {
    /// Map voting is active; the rotation is then driven by votes and
    /// cannot be edited
    #[serde(deserialize_with = "lenient::flag")]
    pub enabled: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub default_method: String,
    #[serde(deserialize_with = "lenient::count")]
    pub num_warfare_options: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub num_offensive_options: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub num_skirmish_control_options: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub number_last_played_to_exclude: u32,
    #[serde(deserialize_with = "lenient::flag")]
    pub consider_offensive_same_map: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub consider_skirmishes_as_same_map: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_consecutive_offensives: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_consecutive_offensives_opposite_sides: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_consecutive_skirmishes: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_default_to_offensive: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_default_to_skirmish: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub instruction_text: String,
    #[serde(deserialize_with = "lenient::text")]
    pub thank_you_text: String,
    #[serde(deserialize_with = "lenient::text")]
    pub help_text: String,
    #[serde(deserialize_with = "lenient::count")]
    pub reminder_frequency_minutes: u32,
    #[serde(deserialize_with = "lenient::flag")]
    pub allow_opt_out: bool,
}

impl VoteMapConfig {
    /// Number of maps offered in each vote
    pub fn total_options(&self) -> u32 {
        self.num_warfare_options
            .saturating_add(self.num_offensive_options)
            .saturating_add(self.num_skirmish_control_options)
    }

    /// Whether manual rotation edits are currently allowed
    pub fn allows_rotation_edits(&self) -> bool {
        !self.enabled
    }
}

/// Field decoders that fall back to the zero value instead of failing
mod lenient {
    use serde::{de::IgnoredAny, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(u64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    /// Numbers, numeric strings, and floats; anything else is 0
    pub(super) fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => u32::try_from(n).unwrap_or(u32::MAX),
            Raw::Float(f) if f.is_finite() && f > 0.0 => f.min(u32::MAX as f64) as u32,
            Raw::Text(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        })
    }

    /// Booleans, `"true"`/`"false"`, and 0/1
    pub(super) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(n) => n != 0,
            Raw::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    /// Strings; `null` and other types become empty
    pub(super) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            _ => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payload_uses_defaults() {
        let config: VoteMapConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.total_options(), 0);
        assert_eq!(config.instruction_text, "");
        assert!(!config.allows_rotation_edits());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{
            "enabled": false,
            "num_warfare_options": 4,
            "num_offensive_options": 2,
            "num_skirmish_control_options": 1,
            "default_method": "least_played_from_suggestions",
            "some_future_flag": [1, 2, 3]
        }"#;
        let config: VoteMapConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.total_options(), 7);
        assert_eq!(config.default_method, "least_played_from_suggestions");
        assert!(config.allows_rotation_edits());
    }

    #[test]
    fn test_string_counts_keep_enabled() {
        let json = r#"{
            "enabled": true,
            "num_warfare_options": "4",
            "num_offensive_options": 2,
            "reminder_frequency_minutes": " 15 ",
            "number_last_played_to_exclude": "lots"
        }"#;
        let config: VoteMapConfig = serde_json::from_str(json).unwrap();
        assert!(config.enabled);
        assert_eq!(config.num_warfare_options, 4);
        assert_eq!(config.total_options(), 6);
        assert_eq!(config.reminder_frequency_minutes, 15);
        assert_eq!(config.number_last_played_to_exclude, 0);
    }

    #[test]
    fn test_null_text_keeps_enabled() {
        let json = r#"{
            "enabled": true,
            "instruction_text": null,
            "thank_you_text": null,
            "help_text": "Type !votemap",
            "default_method": 3
        }"#;
        let config: VoteMapConfig = serde_json::from_str(json).unwrap();
        assert!(config.enabled);
        assert_eq!(config.instruction_text, "");
        assert_eq!(config.thank_you_text, "");
        assert_eq!(config.help_text, "Type !votemap");
        assert_eq!(config.default_method, "");
    }

    #[test]
    fn test_odd_flag_encodings() {
        let config: VoteMapConfig =
            serde_json::from_str(r#"{"enabled": "true", "allow_opt_out": 1, "allow_consecutive_skirmishes": null}"#)
                .unwrap();
        assert!(config.enabled);
        assert!(config.allow_opt_out);
        assert!(!config.allow_consecutive_skirmishes);
    }

    #[test]
    fn test_total_options_saturates() {
        let config = VoteMapConfig {
            num_warfare_options: u32::MAX,
            num_offensive_options: 1,
            num_skirmish_control_options: 7,
            ..VoteMapConfig::default()
        };
        assert_eq!(config.total_options(), u32::MAX);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: VoteMapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, VoteMapConfig::default());
    }
}
