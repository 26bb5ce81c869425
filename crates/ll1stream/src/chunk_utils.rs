use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks without
/// breaking UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Split `payload` at the character offsets derived from `splits`.
///
/// Each split picks the size of the next chunk, from one character up to
/// whatever is left; the remainder, if any, becomes the last chunk. Every
/// non-empty `payload` yields only non-empty chunks, and concatenating them
/// gives `payload` back.
#[must_use]
pub fn partition_chars<'a>(payload: &'a str, splits: &[usize]) -> Vec<&'a str> {
    let bounds: Vec<usize> = payload
        .char_indices()
        .map(|(i, _)| i)
        .chain(core::iter::once(payload.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut chunks = Vec::new();
    let mut idx = 0;
    for &s in splits {
        let remaining = total - idx;
        if remaining == 0 {
            break;
        }
        let end = idx + 1 + s % remaining;
        chunks.push(&payload[bounds[idx]..bounds[end]]);
        idx = end;
    }
    if idx < total {
        chunks.push(&payload[bounds[idx]..]);
    }
    chunks
}
