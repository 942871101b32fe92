/// Converts a 1-based line and column, as reported by the JSON decoder, into a byte offset
/// in `source`. Columns count bytes from the start of the line. Positions past the end of a
/// line or of the source are clamped.
pub fn get_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for _ in 1..line.max(1) {
        match source[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return source.len(),
        }
    }
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);
    let mut offset = (line_start + column.saturating_sub(1)).min(line_end);
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Byte length of the character starting at `offset`, or 0 at the end of the source.
pub fn char_len_at(source: &str, offset: usize) -> usize {
    source
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8)
}
