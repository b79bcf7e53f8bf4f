/// Extract a command from a finalized transcript.
///
/// Returns the remainder after the trigger phrase when the transcript starts
/// with it (case-insensitive exact prefix, no fuzzy matching) and the trimmed
/// remainder is non-empty. Anything else, including malformed or blank
/// transcripts, yields `None`.
pub fn extract_command(transcript: &str, trigger_word: &str) -> Option<String> {
    let transcript = transcript.trim().to_lowercase();
    let trigger = trigger_word.trim().to_lowercase();

    if trigger.is_empty() {
        return None;
    }

    let remainder = transcript.strip_prefix(&trigger)?;
    let command = remainder.trim();

    if command.is_empty() {
        return None;
    }

    Some(command.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_command_after_trigger() {
        assert_eq!(
            extract_command(
                "hey assistant add a dentist appointment tomorrow at 3pm",
                "hey assistant"
            ),
            Some(String::from("add a dentist appointment tomorrow at 3pm"))
        );
    }

    #[test]
    fn match_is_case_insensitive() {
        assert_eq!(
            extract_command("Hey Assistant what's on today", "HEY ASSISTANT"),
            Some(String::from("what's on today"))
        );
    }

    #[test]
    fn no_match_without_trigger_prefix() {
        assert_eq!(extract_command("add a meeting tomorrow", "hey assistant"), None);
        // Trigger elsewhere in the utterance is not a prefix
        assert_eq!(
            extract_command("please hey assistant do something", "hey assistant"),
            None
        );
    }

    #[test]
    fn bare_trigger_yields_nothing() {
        assert_eq!(extract_command("hey assistant", "hey assistant"), None);
        assert_eq!(extract_command("hey assistant   ", "hey assistant"), None);
    }

    #[test]
    fn blank_inputs_are_no_ops() {
        assert_eq!(extract_command("", "hey assistant"), None);
        assert_eq!(extract_command("   ", "hey assistant"), None);
        assert_eq!(extract_command("hey assistant do it", ""), None);
    }
}
