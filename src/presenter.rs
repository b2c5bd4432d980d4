//! Presentation seam for search results
//!
//! The controller hands every successful result set to a [`Presenter`] as a
//! full replacement. Whatever renders the results (a grid of images, a
//! terminal listing) only needs to show exactly that sequence.

use crate::types::SearchRecord;
use std::io::Write;

pub trait Presenter: Send {
    /// Replace everything currently shown with `records`, in order.
    fn replace_all(&mut self, records: &[SearchRecord]);
}

impl<F> Presenter for F
where
    F: FnMut(&[SearchRecord]) + Send,
{
    fn replace_all(&mut self, records: &[SearchRecord]) {
        self(records)
    }
}

/// Renders results as a plain text grid, one cell per photo.
pub struct GridPresenter<W: Write + Send> {
    out: W,
    columns: usize,
}

impl<W: Write + Send> GridPresenter<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, records: &[SearchRecord]) -> std::io::Result<()> {
        writeln!(self.out, "--- {} photos ---", records.len())?;
        for row in records.chunks(self.columns) {
            let cells: Vec<String> = row
                .iter()
                .map(|record| format!("[{}] {}", record.id, record.image_url))
                .collect();
            writeln!(self.out, "{}", cells.join("  |  "))?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Presenter for GridPresenter<W> {
    fn replace_all(&mut self, records: &[SearchRecord]) {
        if let Err(e) = self.render(records) {
            log::warn!("Failed to render results: {}", e);
        }
    }
}
