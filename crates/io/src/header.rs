// Header shape validation

/// Number of true header cells, or `None` if the header is malformed.
///
/// True cells are the contiguous non-empty block starting at column 0. Any
/// cells after that block must be empty (trailing `|` separators are fine).
/// A header whose first cell is empty has no key column and is rejected.
pub fn true_header_len(cells: &[&str]) -> Option<usize> {
    let len = cells.iter().take_while(|c| !c.is_empty()).count();
    if len == 0 {
        return None;
    }
    if cells[len..].iter().all(|c| c.is_empty()) {
        Some(len)
    } else {
        None
    }
}

/// Validate a raw header line. Returns the true header cells.
pub fn verify_header(line: &str) -> Option<Vec<String>> {
    let cells: Vec<&str> = line.split('|').collect();
    let len = true_header_len(&cells)?;
    Some(cells[..len].iter().map(|c| c.to_string()).collect())
}
