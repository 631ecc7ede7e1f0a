//! Length-limited splitting of outbound text.
//!
//! Chat platforms cap message length, so every outbound text is cut into
//! fragments of at most `limit` characters. Whole lines are packed greedily;
//! only a line that is longer than `limit` on its own is cut, and then only
//! on `char` boundaries.

/// Split `text` into fragments of at most `limit` characters.
pub fn split_with_limit(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let limit = limit.max(1);
    let mut fragments = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if let Some((buf, len)) = current.as_mut()
            && *len + 1 + line_len <= limit
        {
            buf.push('\n');
            buf.push_str(line);
            *len += 1 + line_len;
            continue;
        }
        if let Some((buf, _)) = current.take() {
            fragments.push(buf);
        }
        if line_len <= limit {
            current = Some((line.to_string(), line_len));
            continue;
        }
        let chars: Vec<char> = line.chars().collect();
        let mut pieces = chars.chunks(limit).map(|c| c.iter().collect::<String>());
        let mut last = pieces.next();
        for piece in pieces {
            if let Some(full) = last.replace(piece) {
                fragments.push(full);
            }
        }
        current = last.map(|tail| {
            let len = tail.chars().count();
            (tail, len)
        });
    }
    if let Some((buf, _)) = current {
        fragments.push(buf);
    }
    fragments
}

/// Build a listing: `header` (if any) followed by one line per entry, split
/// so that no fragment exceeds `limit`.
pub fn chunk_lines<I, S>(header: &str, lines: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = header.to_string();
    for line in lines {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line.as_ref());
    }
    split_with_limit(&text, limit)
}
