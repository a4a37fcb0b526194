//! Document producers backed by qpdf
//!
//! Merge, split, reorder, delete, rotate and compress using the qpdf crate
//! (vendored FFI). Every function takes PDF bytes and returns new PDF bytes
//! ready to be opened in a preview session.

use crate::error::{Error, Result};
use crate::pdf::pages::{parse_page_order, parse_page_ranges};
use qpdf::{ObjectStreamMode, QPdf};

/// Wrapper for qpdf operations via FFI
pub struct QpdfWrapper;

/// Helper: open a QPdf from memory
fn open_qpdf(data: &[u8]) -> Result<QPdf> {
    QPdf::read_from_memory(data).map_err(map_qpdf_error)
}

/// Map qpdf crate errors to our error types
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    match e.error_code() {
        qpdf::QPdfErrorCode::InvalidPassword => Error::PasswordRequired,
        _ => Error::QpdfError {
            reason: e.to_string(),
        },
    }
}

/// Append `pages` (1-indexed, in order) of `source` to `dest`
fn append_pages(dest: &QPdf, source: &QPdf, pages: &[u32]) -> Result<()> {
    let total = source.get_num_pages().map_err(map_qpdf_error)?;
    for &page_num in pages {
        let page = source
            .get_page(page_num - 1)
            .ok_or(Error::PageOutOfBounds {
                page: page_num,
                total,
            })?;
        let copied = dest.copy_from_foreign(&page);
        dest.add_page(&copied, false).map_err(map_qpdf_error)?;
    }
    Ok(())
}

/// Serialize a produced document without carrying over encryption
fn write_document(dest: &QPdf) -> Result<Vec<u8>> {
    let mut writer = dest.writer();
    writer.preserve_encryption(false);
    writer.write_to_memory().map_err(map_qpdf_error)
}

/// Copy `pages` (1-indexed, in order) from `source` into a new document
fn copy_pages(source: &QPdf, pages: &[u32]) -> Result<Vec<u8>> {
    let dest = QPdf::empty();
    append_pages(&dest, source, pages)?;
    write_document(&dest)
}

impl QpdfWrapper {
    /// Concatenate `inputs` into one document, pages in input order.
    ///
    /// A merge takes at least two documents.
    pub fn merge(inputs: &[&[u8]]) -> Result<Vec<u8>> {
        if inputs.len() < 2 {
            return Err(Error::NotEnoughInputs {
                count: inputs.len(),
            });
        }

        let dest = QPdf::empty();
        for (index, data) in inputs.iter().enumerate() {
            let (source, count) = open_qpdf(data)
                .and_then(|source| {
                    let count = source.get_num_pages().map_err(map_qpdf_error)?;
                    Ok((source, count))
                })
                .map_err(|e| match e {
                    Error::QpdfError { reason } => Error::DocumentOpen {
                        reason: format!("merge input {}: {}", index + 1, reason),
                    },
                    other => other,
                })?;
            let pages: Vec<u32> = (1..=count).collect();
            append_pages(&dest, &source, &pages)?;
        }

        tracing::debug!(inputs = inputs.len(), "merged documents");
        write_document(&dest)
    }

    /// Split a PDF after `split_page` into two documents.
    ///
    /// The first holds pages `1..=split_page`, the second the rest, so
    /// `split_page` must lie in `1..page_count`.
    pub fn split_at(input_data: &[u8], split_page: u32) -> Result<(Vec<u8>, Vec<u8>)> {
        let source = open_qpdf(input_data)?;
        let num_pages = source.get_num_pages().map_err(map_qpdf_error)?;

        if split_page < 1 || split_page >= num_pages {
            return Err(Error::InvalidSplitPoint {
                page: split_page,
                max: num_pages.saturating_sub(1),
            });
        }

        let first: Vec<u32> = (1..=split_page).collect();
        let second: Vec<u32> = (split_page + 1..=num_pages).collect();

        Ok((copy_pages(&source, &first)?, copy_pages(&source, &second)?))
    }

    /// Build a new PDF from the pages named by `order` (e.g. "3,1-2"), in
    /// that order
    pub fn select_pages(input_data: &[u8], order: &str) -> Result<Vec<u8>> {
        let source = open_qpdf(input_data)?;
        let num_pages = source.get_num_pages().map_err(map_qpdf_error)?;
        let pages = parse_page_order(order, num_pages)?;
        copy_pages(&source, &pages)
    }

    /// Remove the pages named by `ranges` (e.g. "2,5-7")
    pub fn delete_pages(input_data: &[u8], ranges: &str) -> Result<Vec<u8>> {
        let source = open_qpdf(input_data)?;
        let num_pages = source.get_num_pages().map_err(map_qpdf_error)?;
        let removed = parse_page_ranges(ranges, num_pages)?;

        let kept: Vec<u32> = (1..=num_pages)
            .filter(|page| removed.binary_search(page).is_err())
            .collect();
        if kept.is_empty() {
            return Err(Error::InvalidPageRange {
                range: format!("{} removes every page", ranges),
            });
        }

        copy_pages(&source, &kept)
    }

    /// Set the rotation of every page to `angle` degrees.
    ///
    /// `angle` must be a multiple of 90; negative and large values are
    /// normalized into `0..360`.
    pub fn rotate(input_data: &[u8], angle: i32) -> Result<Vec<u8>> {
        if angle % 90 != 0 {
            return Err(Error::InvalidRotation { angle });
        }
        let normalized = angle.rem_euclid(360);

        let qpdf = open_qpdf(input_data)?;
        for page in qpdf.get_pages().map_err(map_qpdf_error)? {
            page.set("/Rotate", qpdf.new_integer(i64::from(normalized)));
        }

        let mut writer = qpdf.writer();
        writer.preserve_encryption(false);
        writer.write_to_memory().map_err(map_qpdf_error)
    }

    /// Compress a PDF by optimizing streams and removing redundancy
    pub fn compress(input_data: &[u8]) -> Result<Vec<u8>> {
        let qpdf = open_qpdf(input_data)?;

        let mut writer = qpdf.writer();
        writer
            .object_stream_mode(ObjectStreamMode::Generate)
            .compress_streams(true)
            .normalize_content(true)
            .preserve_unreferenced_objects(false)
            .preserve_encryption(false);
        writer.write_to_memory().map_err(map_qpdf_error)
    }

    /// Get the page count of a PDF
    pub fn get_page_count(input_data: &[u8]) -> Result<u32> {
        let qpdf = open_qpdf(input_data)?;
        qpdf.get_num_pages().map_err(map_qpdf_error)
    }
}
