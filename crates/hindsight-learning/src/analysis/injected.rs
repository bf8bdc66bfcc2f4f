//! Harness-injected user turns.
//!
//! The upstream logger records slash-command echoes, local command output and
//! reminders as user-role entries. None of them is something the user typed
//! in response to the assistant.

const INJECTED_TAGS: &[&str] = &[
    "<command-name>",
    "<command-message>",
    "<command-args>",
    "<local-command-stdout>",
    "<local-command-stderr>",
    "<system-reminder>",
    "<user-prompt-submit-hook>",
    "<bash-input>",
    "<bash-stdout>",
    "<bash-stderr>",
];

const CAVEAT_PREFIX: &str = "Caveat:";

/// True when `text` is harness markup rather than user words.
pub fn is_injected(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with(CAVEAT_PREFIX) || INJECTED_TAGS.iter().any(|tag| trimmed.starts_with(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_echoes_are_injected() {
        assert!(is_injected(
            "<command-name>/clear</command-name>\n<command-message>clear</command-message>"
        ));
        assert!(is_injected("  <local-command-stdout>done</local-command-stdout>"));
        assert!(is_injected(
            "Caveat: The messages below were generated by the user while running local commands."
        ));
    }

    #[test]
    fn typed_text_is_not_injected() {
        assert!(!is_injected("No, don't do that"));
        assert!(!is_injected("use <div> instead of <span>"));
        assert!(!is_injected(""));
    }
}
