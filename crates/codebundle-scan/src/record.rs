//! Record layout of the output artifact.
//!
//! Each bundled file becomes one record:
//!
//! ```text
//! ### File: <relative-path> ###
//! <verbatim content>
//! <blank line>
//! ```

use std::io::{self, Write};
use std::path::Path;

/// Text before the relative path in a record header.
pub const HEADER_PREFIX: &str = "### File: ";
/// Text after the relative path in a record header.
pub const HEADER_SUFFIX: &str = " ###";
/// Separator written after each record's content.
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Format the header line for a file, without the trailing newline.
pub fn header_line(relative: &Path) -> String {
    format!("{HEADER_PREFIX}{}{HEADER_SUFFIX}", relative.display())
}

/// Write one record and return the number of bytes it occupies.
pub fn write_record<W: Write>(writer: &mut W, relative: &Path, content: &str) -> io::Result<u64> {
    let header = header_line(relative);
    writer.write_all(header.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.write_all(content.as_bytes())?;
    writer.write_all(RECORD_SEPARATOR.as_bytes())?;
    Ok((header.len() + 1 + content.len() + RECORD_SEPARATOR.len()) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line() {
        assert_eq!(header_line(Path::new("a.py")), "### File: a.py ###");
        assert_eq!(
            header_line(&Path::new("src").join("lib.js")),
            format!("### File: src{}lib.js ###", std::path::MAIN_SEPARATOR)
        );
    }

    #[test]
    fn test_write_record_layout() {
        let mut out = Vec::new();
        let written = write_record(&mut out, Path::new("a.py"), "x").unwrap();
        assert_eq!(out, b"### File: a.py ###\nx\n\n");
        assert_eq!(written, out.len() as u64);
    }

    #[test]
    fn test_records_concatenate() {
        let mut out = Vec::new();
        write_record(&mut out, Path::new("one.md"), "# One\n").unwrap();
        write_record(&mut out, Path::new("two.md"), "").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "### File: one.md ###\n# One\n\n\n### File: two.md ###\n\n\n"
        );
    }
}
