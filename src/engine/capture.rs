//! Content-capture stack.
//!
//! `ReplaceContents` rules need the text between an opening tag and the
//! closing tag that matches it. The engine pushes the offset just past every
//! opening occurrence and pops it when a closing occurrence of the same name
//! is seen:
//!
//! ```text
//! <p>AAA<p>BBB</p>CCC</p>
//!    ▲      ▲   │      │
//!    │      └───┘ pop (inner: "BBB")
//!    └─────────────────┘ pop (outer: "AAA<p>BBB</p>CCC")
//! ```
//!
//! Only the top entry is considered; a closing tag whose name differs from
//! the top entry leaves the stack alone.
//!
//! Offsets are absolute byte positions in the rewrite buffer. Every entry
//! lies before the scan cursor and all splices happen at or after the cursor,
//! so entries stay valid while the buffer grows or shrinks behind them.

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    start: usize,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct CaptureStack {
    entries: Vec<Entry>,
}

impl CaptureStack {
    pub(crate) fn push(&mut self, name: &str, start: usize) {
        self.entries.push(Entry { name: name.to_string(), start });
    }

    /// Pop the top entry if it was opened by a tag named `name`, returning its
    /// start offset.
    pub(crate) fn pop_if_top(&mut self, name: &str) -> Option<usize> {
        if self.entries.last()?.name != name {
            return None;
        }
        self.entries.pop().map(|e| e.start)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
