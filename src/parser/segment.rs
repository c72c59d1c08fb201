/// Every subplot chunk opens with a line starting with this marker.
pub const SUBPLOT_MARKER: &str = "תת חלקה";
/// Closes the data region of the extract.
pub const END_OF_DATA: &str = "סוף נתונים";

fn is_subplot_start<T: AsRef<str>>(line: &T) -> bool {
    line.as_ref().starts_with(SUBPLOT_MARKER)
}

/// Cut the line stream into one contiguous chunk per subplot.
///
/// The data region runs from the first marker line up to (not including) the
/// first end-of-data line after it, or to the end of input. Returns an empty
/// vec when no marker exists. Chunks borrow from `lines`, so concatenating
/// them gives back exactly the data region.
pub fn split_subplots<T: AsRef<str>>(lines: &[T]) -> Vec<&[T]> {
    let Some(first) = lines.iter().position(is_subplot_start) else {
        return Vec::new();
    };
    let end = lines[first..]
        .iter()
        .position(|l| l.as_ref() == END_OF_DATA)
        .map_or(lines.len(), |offset| first + offset);
    let region = &lines[first..end];

    let mut chunks = Vec::new();
    let mut start = 0;
    for (i, line) in region.iter().enumerate().skip(1) {
        if is_subplot_start(line) {
            chunks.push(&region[start..i]);
            start = i;
        }
    }
    chunks.push(&region[start..]);
    chunks
}
