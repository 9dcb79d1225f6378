//! Section tracking for line-oriented manifest scans
//!
//! The editor and the reader both need to know whether a given line sits
//! inside `[package]`. They share this one state machine so they can never
//! disagree about where the section starts and ends.

/// Header of the only section whose `version` key is recognized
pub const PACKAGE_SECTION: &str = "package";

/// One physical line, split from its terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
  /// Content without the terminator
  pub body: &'a str,
  /// `"\r\n"`, `"\n"`, or `""` for an unterminated final line
  pub ending: &'a str,
}

/// Split a document into lines, keeping each terminator intact
pub fn lines(doc: &str) -> impl Iterator<Item = Line<'_>> {
  doc.split_inclusive('\n').map(|raw| {
    let body_len = raw
      .strip_suffix("\r\n")
      .or_else(|| raw.strip_suffix('\n'))
      .map_or(raw.len(), str::len);
    Line {
      body: &raw[..body_len],
      ending: &raw[body_len..],
    }
  })
}

/// Tracks whether the scan is inside one named `[section]`
///
/// A header is a line whose trimmed text is `[...]`. The named header turns
/// tracking on; any other header (including `[[array]]` tables and dotted
/// `[package.metadata]` tables) turns it off.
#[derive(Debug, Clone)]
pub struct SectionTracker {
  header: String,
  inside: bool,
  seen: bool,
}

impl SectionTracker {
  pub fn new(section: &str) -> Self {
    Self {
      header: format!("[{}]", section),
      inside: false,
      seen: false,
    }
  }

  /// Tracker for `[package]`
  pub fn package() -> Self {
    Self::new(PACKAGE_SECTION)
  }

  /// Feed the next line body; returns whether that line is inside the section
  pub fn observe(&mut self, body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
      self.inside = trimmed == self.header;
      self.seen |= self.inside;
    }
    self.inside
  }

  /// Whether the section header has appeared so far
  pub fn seen(&self) -> bool {
    self.seen
  }
}
