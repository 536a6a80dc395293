// Section extraction.
//
// A section opens on its exact header line and closes on the first line
// that is exactly `end` (trailing whitespace and `\r` tolerated). Nested
// `config … end` pairs inside entries are indented, so they never match.
// Repeated sections, e.g. one per VDOM, accumulate.

pub const INTERFACE_SECTION: &str = "config system interface";
pub const VIRTUAL_SWITCH_SECTION: &str = "config system virtual-switch";

const SECTION_END: &str = "end";

/// Collect the body lines of each requested section.
///
/// The result is index-aligned with `headers`; a section that never
/// appears yields an empty list.
pub fn extract_sections<'a, const N: usize>(
    text: &'a str,
    headers: [&str; N],
) -> [Vec<&'a str>; N] {
    let mut sections: [Vec<&'a str>; N] = std::array::from_fn(|_| Vec::new());
    let mut open: Option<usize> = None;

    for line in text.lines() {
        let line = line.trim_end();
        match open {
            Some(_) if line == SECTION_END => open = None,
            Some(idx) => {
                if let Some(section) = sections.get_mut(idx) {
                    section.push(line);
                }
            }
            None => open = headers.iter().position(|h| *h == line),
        }
    }

    sections
}
