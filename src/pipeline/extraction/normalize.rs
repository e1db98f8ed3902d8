/// Split raw OCR output into trimmed, non-empty lines.
///
/// Control characters other than whitespace are dropped first; OCR engines
/// occasionally emit stray NULs inside words. Line order is preserved because
/// later stages look ahead to the following line.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            line.chars()
                .filter(|c| !c.is_control() || c.is_whitespace())
                .collect::<String>()
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
