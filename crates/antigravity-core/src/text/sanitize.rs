//! Model output sanitizer.

use std::sync::LazyLock;

use regex::Regex;

/// Returned in place of a reply that sanitizes to nothing.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "...";

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("invalid think-block regex"));

/// Markup delimiters removed from replies. Longer tokens come first.
const MARKUP_TOKENS: [&str; 6] = ["**", "__", "~~", "*", "_", "`"];

/// Turn raw model text into display text.
///
/// Strips `<think>` blocks and markdown delimiters, trims, and substitutes
/// [`EMPTY_REPLY_PLACEHOLDER`] for an empty result. Passes repeat until the
/// text stops changing, so `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = strip_once(&text);
        if next == text {
            break;
        }
        text = next;
    }

    if text.is_empty() {
        EMPTY_REPLY_PLACEHOLDER.to_string()
    } else {
        text
    }
}

fn strip_once(text: &str) -> String {
    let mut out = THINK_BLOCK.replace_all(text, "").into_owned();
    for token in MARKUP_TOKENS {
        out = out.replace(token, "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_think_blocks_across_lines() {
        assert_eq!(
            sanitize("<think>\nplan the answer\n</think>\nXin chào!"),
            "Xin chào!"
        );
        assert_eq!(sanitize("<think>a</think>B<think>c</think>D"), "BD");
    }

    #[test]
    fn removes_markup_but_keeps_text() {
        assert_eq!(sanitize("**đậm** và *nghiêng* `code` ~~gạch~~ __x__"), "đậm và nghiêng code gạch x");
    }

    #[test]
    fn empty_results_become_placeholder() {
        assert_eq!(sanitize(""), "...");
        assert_eq!(sanitize("   \n\t"), "...");
        assert_eq!(sanitize("<think>only thoughts</think>"), "...");
        assert_eq!(sanitize("****"), "...");
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        let inputs = [
            "",
            "  ",
            "...",
            "<th*ink>hidden</think>visible",
            "~~~",
            "snake_case_name",
            "<think>unterminated",
            "  **  padded  **  ",
            "a ` b",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn marker_exposed_by_markup_removal_is_removed() {
        assert_eq!(sanitize("<th*ink>hidden</think>visible"), "visible");
    }
}
