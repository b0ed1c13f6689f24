//! Response Parser
//!
//! Extracts executable instruction blocks from free-form model text. Models
//! wrap instructions in fenced code blocks, usually with a language tag and
//! often interleaved with prose analysis.
//!
//! When a response contains several fenced blocks they are concatenated in
//! document order: models tend to emit incremental commented steps, and
//! dropping later blocks loses actions. No block at all is a normal outcome
//! ("no action this cycle"), never an error.

use regex::Regex;

/// Extract the instruction block from a raw model response.
///
/// Returns `None` when the response contains no fenced block, or only
/// blank ones.
pub fn extract_instruction_block(response: &str) -> Option<String> {
    let fence = Regex::new(r"(?s)```[a-zA-Z0-9_+\-]*[ \t]*\r?\n(.*?)```")
        .expect("fence regex is valid");

    let blocks: Vec<&str> = fence
        .captures_iter(response)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim_end_matches(['\r', '\n']))
        .filter(|block| !block.trim().is_empty())
        .collect();

    if blocks.is_empty() {
        return None;
    }
    Some(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_is_returned_verbatim() {
        let response = "Here is what I'll do next:\n```\ntap e\nwait 0.5\nclick left\n```\nDone.";
        assert_eq!(
            extract_instruction_block(response).as_deref(),
            Some("tap e\nwait 0.5\nclick left")
        );
    }

    #[test]
    fn language_tag_is_stripped() {
        let response = "```actions\nmove up 2\n```";
        assert_eq!(
            extract_instruction_block(response).as_deref(),
            Some("move up 2")
        );
    }

    #[test]
    fn no_block_means_no_action() {
        assert_eq!(extract_instruction_block("Just analysis, no commands."), None);
        assert_eq!(extract_instruction_block(""), None);
    }

    #[test]
    fn multiple_blocks_concatenate_in_document_order() {
        let response = concat!(
            "First, move to the crops:\n",
            "```\nmove up 1.5\n```\n",
            "Then water them:\n",
            "```\ntap 3\nclick left\n```\n",
        );
        assert_eq!(
            extract_instruction_block(response).as_deref(),
            Some("move up 1.5\ntap 3\nclick left")
        );
    }

    #[test]
    fn blank_blocks_are_ignored() {
        assert_eq!(extract_instruction_block("```\n\n```"), None);
        let mixed = "```\n\n```\nthen\n```\ntap e\n```";
        assert_eq!(extract_instruction_block(mixed).as_deref(), Some("tap e"));
    }

    #[test]
    fn unterminated_fence_yields_nothing() {
        assert_eq!(extract_instruction_block("```\ntap e\n"), None);
    }

    #[test]
    fn crlf_responses_parse() {
        let response = "```\r\ntap e\r\n```";
        assert_eq!(extract_instruction_block(response).as_deref(), Some("tap e"));
    }
}
