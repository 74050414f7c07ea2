/// The accumulated tag list and the sorted tags-file writer.
use std::io::Write;

use crate::types::Tag;

/// Header telling editors the records below are sorted by name.
pub const SORTED_HEADER: &str = "!_TAG_FILE_SORTED\t1\t";

/// Append-only list of formatted tag lines for one run. Duplicates are kept.
#[derive(Debug, Default)]
pub struct TagList {
    /// Formatted records; the formatted line is also the sort key.
    lines: Vec<String>,
}

/// A tag list that has been sorted and can only be written out.
#[derive(Debug)]
pub struct SortedTags {
    /// Records in ascending byte order.
    lines: Vec<String>,
}

impl TagList {
    /// Append one file's tags, keeping their order.
    pub fn extend<I: IntoIterator<Item = Tag>>(&mut self, tags: I) {
        self.lines.extend(tags.into_iter().map(|tag| return tag.to_string()));
    }

    /// Number of records collected so far.
    pub fn len(&self) -> usize {
        return self.lines.len();
    }

    /// Sort once, byte-wise lexicographic over the whole line.
    pub fn into_sorted(mut self) -> SortedTags {
        self.lines.sort_unstable();
        return SortedTags { lines: self.lines };
    }
}

impl SortedTags {
    /// Write the header line followed by every record.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the writer fails.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), crate::error::Error> {
        writeln!(out, "{SORTED_HEADER}")?;
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        return Ok(());
    }
}
