//! Scrubbing of remote text before it reaches the terminal.
//!
//! Replies come from a remote service and are displayed verbatim, so escape
//! sequences (cursor movement, OSC 52 clipboard writes, title changes) and
//! other control characters are removed. Newlines are kept and tabs expand
//! to spaces.

const TAB_WIDTH: usize = 4;

pub fn strip_control_sequences(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => output.push('\n'),
            '\t' => output.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    output.push('\n');
                }
            }
            '\u{1b}' => match chars.next() {
                // CSI: parameters then a final byte in @..~
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC/DCS/APC/PM: terminated by BEL or ST (ESC \)
                Some(']' | 'P' | '_' | '^') => {
                    while let Some(next) = chars.next() {
                        if next == '\u{7}' {
                            break;
                        }
                        if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_control() => {}
            c => output.push(c),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        let text = "Xin chào! **bold** and `code`\nsecond line";
        assert_eq!(strip_control_sequences(text), text);
    }

    #[test]
    fn removes_csi_sequences() {
        assert_eq!(
            strip_control_sequences("\u{1b}[31mred\u{1b}[0m text\u{1b}[2J"),
            "red text"
        );
    }

    #[test]
    fn removes_osc_sequences_with_either_terminator() {
        let clipboard = "before\u{1b}]52;c;aGVsbG8=\u{7}after";
        assert_eq!(strip_control_sequences(clipboard), "beforeafter");

        let title = "a\u{1b}]0;pwned\u{1b}\\b";
        assert_eq!(strip_control_sequences(title), "ab");
    }

    #[test]
    fn normalizes_line_endings_and_tabs() {
        assert_eq!(strip_control_sequences("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(strip_control_sequences("\tx"), "    x");
    }

    #[test]
    fn drops_other_control_characters() {
        assert_eq!(strip_control_sequences("be\u{7}ll\u{0}\u{9b}"), "bell");
    }
}
