/// Escape LaTeX special characters in a single pass.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Greedy word wrap where `width` counts the indent prefixed to each line.
///
/// Runs of whitespace collapse to a single space. Hyphenated words may break
/// after a hyphen. A piece that does not fit on an empty line is split across
/// as many lines as it needs.
pub fn wrap(text: &str, width: usize, indent: &str) -> Vec<String> {
    let available = width.saturating_sub(indent.chars().count()).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        for (index, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let separator = usize::from(index == 0);
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + separator + piece_len <= available {
                if separator == 1 {
                    current.push(' ');
                }
                current.push_str(piece);
                current_len += separator + piece_len;
                continue;
            }
            if current_len > 0 {
                lines.push(format!("{indent}{current}"));
                current.clear();
                current_len = 0;
            }
            if piece_len <= available {
                current.push_str(piece);
                current_len = piece_len;
                continue;
            }
            let chars: Vec<char> = piece.chars().collect();
            let mut chunks = chars.chunks(available).peekable();
            while let Some(chunk) = chunks.next() {
                let part: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(format!("{indent}{part}"));
                } else {
                    current_len = chunk.len();
                    current = part;
                }
            }
        }
    }
    if current_len > 0 {
        lines.push(format!("{indent}{current}"));
    }
    lines
}

/// Split `word` after hyphens that sit between letters, as in `well-known`.
///
/// A break needs two letters before the hyphen and a letter pair (or a
/// letter, hyphen, letter run) after it, so `-v`, `x-1` and `--flag` stay
/// whole.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let letter = |i: usize| chars.get(i).is_some_and(|(_, c)| c.is_alphabetic());
    let hyphen = |i: usize| chars.get(i).is_some_and(|(_, c)| *c == '-');

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (i, (offset, ch)) in chars.iter().enumerate() {
        if *ch != '-' || i < 2 {
            continue;
        }
        let before = letter(i - 2) && letter(i - 1);
        let after = letter(i + 1) && (letter(i + 2) || (hyphen(i + 2) && letter(i + 3)));
        if before && after {
            let end = offset + ch.len_utf8();
            pieces.push(&word[start..end]);
            start = end;
        }
    }
    pieces.push(&word[start..]);
    pieces
}
