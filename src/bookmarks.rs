//! PDF bookmarks for the recorded section outline, added with `lopdf` after rendering.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::tracking::OutlineEntry;

/// Errors raised while embedding bookmarks into a rendered PDF.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("failed to process PDF bytes")]
    Pdf(#[from] lopdf::Error),
    /// Writing the updated document failed.
    #[error("failed to serialise PDF")]
    Io(#[from] std::io::Error),
    /// The trailer has no usable `/Root` catalog.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object is not a dictionary.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A heading points at a page the document does not have.
    #[error("heading {title:?} refers to missing page {page}")]
    MissingPage { title: String, page: usize },
}

struct Bookmark {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

/// Adds a flat `/Outlines` tree with one `/Dest [page /Fit]` entry per heading.
///
/// Returns the input unchanged when `outline` is empty.
pub fn apply_outline(pdf_bytes: &[u8], outline: &[OutlineEntry]) -> Result<Vec<u8>, BookmarkError> {
    if outline.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let bookmarks = collect_bookmarks(&mut document, outline, &pages)?;

    let outlines_id = document.new_object_id();
    link_bookmarks(outlines_id, &mut document, &bookmarks);
    insert_outlines_root(outlines_id, &mut document, &bookmarks)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    log::debug!("embedded {} bookmarks", bookmarks.len());
    Ok(buffer)
}

fn collect_bookmarks(
    document: &mut Document,
    outline: &[OutlineEntry],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<Bookmark>, BookmarkError> {
    outline
        .iter()
        .map(|entry| {
            let page_ref = u32::try_from(entry.page)
                .ok()
                .and_then(|page| pages.get(&page).copied())
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: entry.title.clone(),
                    page: entry.page,
                })?;
            Ok(Bookmark {
                object_id: document.new_object_id(),
                page_ref,
                title: entry.title.clone(),
            })
        })
        .collect()
}

fn link_bookmarks(outlines_id: ObjectId, document: &mut Document, bookmarks: &[Bookmark]) {
    for (index, bookmark) in bookmarks.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(bookmark.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(bookmark.page_ref),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        if let Some(previous) = index.checked_sub(1).and_then(|i| bookmarks.get(i)) {
            dictionary.set("Prev", Object::Reference(previous.object_id));
        }
        if let Some(next) = bookmarks.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }
        document
            .objects
            .insert(bookmark.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    bookmarks: &[Bookmark],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name(b"Outlines".to_vec()));
    dictionary.set("Count", Object::Integer(bookmarks.len() as i64));
    if let Some(first) = bookmarks.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = bookmarks.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outline_leaves_bytes_untouched() {
        let bytes = b"not even a pdf".to_vec();
        assert_eq!(apply_outline(&bytes, &[]).expect("no-op"), bytes);
    }

    #[test]
    fn garbage_input_is_a_pdf_error() {
        let outline = [OutlineEntry {
            title: "1. Platform Status".into(),
            page: 1,
        }];
        let err = apply_outline(b"not a pdf", &outline).err().expect("parse error");
        assert!(matches!(err, BookmarkError::Pdf(_) | BookmarkError::Io(_)));
    }
}
