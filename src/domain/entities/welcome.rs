//! Welcome message configuration and room matching

use serde::{Deserialize, Serialize};

/// Setting id under which the configuration JSON is stored
pub const WELCOME_SETTING_ID: &str = "welcome_bot_configuration_json";

/// Configuration shipped as the setting's package value
pub const DEFAULT_WELCOME_CONFIGURATION: &str = r####"{"WelcomeMessages":[{"ChannelName":"channel-0, channel-A","Message":["### Welcome {{USERNAME}} to the Channel #{{CHANNEL_NAME}}!"," Other channel of interest: #channel-1"]}]}"####;

/// Wire shape of the configuration setting
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RawConfiguration {
    #[serde(rename = "WelcomeMessages")]
    welcome_messages: Vec<RawRule>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct RawRule {
    #[serde(rename = "ChannelName")]
    channel_name: String,
    #[serde(rename = "Message")]
    message: Vec<String>,
}

/// One configured welcome message and the rooms it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeRule {
    channel_names: Vec<String>,
    message_lines: Vec<String>,
}

impl WelcomeRule {
    /// Build a rule from the raw comma-separated room list.
    /// Entries are not trimmed: `"a, b"` lists `"a"` and `" b"`.
    pub fn new(channel_name: &str, message_lines: Vec<String>) -> Self {
        Self {
            channel_names: channel_name.split(',').map(str::to_string).collect(),
            message_lines,
        }
    }

    #[cfg(test)]
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    #[cfg(test)]
    pub fn message_lines(&self) -> &[String] {
        &self.message_lines
    }

    pub fn matches(&self, room_name: &str) -> bool {
        self.channel_names.iter().any(|name| name == room_name)
    }

    /// Message template, lines joined with newlines
    pub fn template(&self) -> String {
        self.message_lines.join("\n")
    }
}

/// Ordered welcome rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WelcomeConfiguration {
    rules: Vec<WelcomeRule>,
}

impl WelcomeConfiguration {
    #[cfg(test)]
    pub fn new(rules: Vec<WelcomeRule>) -> Self {
        Self { rules }
    }

    /// Parse the setting value. Anything not matching the expected shape is rejected.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawConfiguration = serde_json::from_str(json)?;
        let rules = raw
            .welcome_messages
            .into_iter()
            .map(|r| WelcomeRule::new(&r.channel_name, r.message))
            .collect();
        Ok(Self { rules })
    }

    #[cfg(test)]
    pub fn rules(&self) -> &[WelcomeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule listing `room_name` exactly, if any
    pub fn find_rule(&self, room_name: &str) -> Option<&WelcomeRule> {
        self.rules.iter().find(|rule| rule.matches(room_name))
    }
}
