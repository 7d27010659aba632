//! Placeholder renderer - Fills `{{KEY}}` markers in welcome templates

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

pub const USERNAME_KEY: &str = "USERNAME";
pub const CHANNEL_NAME_KEY: &str = "CHANNEL_NAME";
pub const UNKNOWN_PLACEHOLDER: &str = "UNKNOWN_PLACEHOLDER_KEY";

/// Values available to a template
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub room_name: &'a str,
    pub user_name: &'a str,
}

impl<'a> RenderContext<'a> {
    pub fn new(room_name: &'a str, user_name: &'a str) -> Self {
        Self { room_name, user_name }
    }

    fn value(&self, key: &str) -> &'a str {
        match key {
            USERNAME_KEY => self.user_name,
            CHANNEL_NAME_KEY => self.room_name,
            _ => UNKNOWN_PLACEHOLDER,
        }
    }

    /// Substitute placeholders until no `{{ .. }}` pair is left.
    ///
    /// Each pass takes the first `{{` and the first `}}` of the whole string and
    /// stops once either is missing or the `}}` comes first. After every
    /// replacement the scan restarts at the beginning, so substituted values
    /// that contain markers are expanded again.
    ///
    /// There is no pass limit: a value that reproduces its own marker (a
    /// username of `{{USERNAME}}x`) never terminates and keeps the calling
    /// task busy.
    pub fn render(&self, template: &str) -> String {
        let mut msg = template.to_string();
        loop {
            let (Some(open), Some(close)) = (msg.find(OPEN), msg.find(CLOSE)) else {
                break;
            };
            if close <= open {
                break;
            }
            let value = self.value(&msg[open + OPEN.len()..close]);
            msg.replace_range(open..close + CLOSE.len(), value);
        }
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, room_name: &str, user_name: &str) -> String {
        RenderContext::new(room_name, user_name).render(template)
    }

    #[test]
    fn test_username() {
        assert_eq!(render("Hello {{USERNAME}}", "room1", "alice"), "Hello alice");
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(render("#{{CHANNEL_NAME}} says hi", "general", "bob"), "#general says hi");
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(render("{{FOO}}", "r", "u"), "UNKNOWN_PLACEHOLDER_KEY");
        assert_eq!(render("[{{}}]", "r", "u"), "[UNKNOWN_PLACEHOLDER_KEY]");
        assert_eq!(render("{{username}}", "r", "u"), "UNKNOWN_PLACEHOLDER_KEY");
    }

    #[test]
    fn test_no_placeholders_is_unchanged() {
        assert_eq!(render("no placeholders here", "r", "u"), "no placeholders here");
        assert_eq!(render("", "r", "u"), "");
    }

    #[test]
    fn test_close_before_open_is_unchanged() {
        assert_eq!(render("}}{{", "r", "u"), "}}{{");
        assert_eq!(render("}} then {{USERNAME}}", "r", "u"), "}} then {{USERNAME}}");
    }

    #[test]
    fn test_unterminated_marker_is_unchanged() {
        assert_eq!(render("Hi {{USERNAME", "r", "u"), "Hi {{USERNAME");
        assert_eq!(render("Hi USERNAME}}", "r", "u"), "Hi USERNAME}}");
    }

    #[test]
    fn test_multiple_placeholders() {
        let out = render(
            "### Welcome {{USERNAME}} to the Channel #{{CHANNEL_NAME}}!\n Other channel of interest: #channel-1",
            "channel-0",
            "alice",
        );
        assert_eq!(out, "### Welcome alice to the Channel #channel-0!\n Other channel of interest: #channel-1");
    }

    #[test]
    fn test_stops_at_first_stray_close() {
        // The first "}}" of the string decides, even when a later pair is well formed.
        assert_eq!(render("{{USERNAME}} }} {{USERNAME}}", "r", "u"), "u }} {{USERNAME}}");
    }

    #[test]
    fn test_replacement_is_rescanned() {
        assert_eq!(render("{{USERNAME}}", "general", "{{CHANNEL_NAME}}"), "general");
        assert_eq!(render("{{USERNAME}}!", "r", "{{X}}"), "UNKNOWN_PLACEHOLDER_KEY!");
    }

    #[test]
    fn test_replacement_can_complete_a_marker() {
        // The value opens a marker that the rest of the template closes.
        assert_eq!(render("{{USERNAME}}NAME}}", "lobby", "{{CHANNEL_"), "lobby");
    }
}
