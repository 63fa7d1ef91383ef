// Compound selector decomposition.
//
// A selector string is split at combinator boundaries (whitespace, '>', '+',
// '~'), then each compound is scanned for '.'-class and '#'-id simple
// selectors. Tag names, attribute matchers and pseudo suffixes never produce
// tokens. Name characters follow the same identifier alphabet the rewriters
// use for whole-token matching, so everything extracted here can be replaced
// textually later without corrupting neighbours.

/// Ordered class tokens of one selector string, each '.'-prefixed.
/// Duplicates within the selector are kept.
pub fn class_tokens(selector: &str) -> Vec<String> {
    sigil_tokens(selector, '.')
}

/// Ordered id tokens of one selector string, each '#'-prefixed.
pub fn id_tokens(selector: &str) -> Vec<String> {
    sigil_tokens(selector, '#')
}

pub(crate) fn sigil_tokens(selector: &str, sigil: char) -> Vec<String> {
    let mut tokens = Vec::new();
    for compound in selector.split(is_combinator) {
        if !compound.is_empty() {
            scan_compound(compound, sigil, &mut tokens);
        }
    }
    tokens
}

fn is_combinator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '>' | '+' | '~')
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn scan_compound(compound: &str, sigil: char, tokens: &mut Vec<String>) {
    let mut chars = compound.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '.' | '#' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !is_name_char(next) {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if ch == sigil && !name.is_empty() {
                    tokens.push(format!("{}{}", sigil, name));
                }
            }
            '[' => {
                // Attribute matchers never contribute rename targets; skip
                // to the closing bracket.
                for inner in chars.by_ref() {
                    if inner == ']' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
}
