//! Namespace-aware sitemap XML parsing.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::types::RecipeRecord;

/// Namespace of the sitemaps.org protocol.
pub(crate) const SITEMAP_NS: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

/// A parsed sitemap document.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SitemapDocument {
    /// `<sitemapindex>`: `<loc>` of every listed sub-sitemap, in order.
    Index(Vec<String>),
    /// `<urlset>`: the page entries, in order.
    UrlSet(Vec<RecipeRecord>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Entry {
    Sitemap,
    Url,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    LastMod,
}

/// Parse a sitemap document.
///
/// Only elements bound to [`SITEMAP_NS`] count. Entries are the direct
/// children of the root element; the document is an index as soon as one
/// `<sitemap>` entry is present.
///
/// # Errors
///
/// Returns the underlying [`quick_xml::Error`] for malformed XML.
pub(crate) fn parse_sitemap(xml: &str) -> Result<SitemapDocument, quick_xml::Error> {
    let mut reader = NsReader::from_str(xml);

    let mut depth = 0usize;
    let mut saw_sitemap_entry = false;
    let mut entry: Option<Entry> = None;
    let mut field: Option<Field> = None;
    let mut loc = String::new();
    let mut lastmod = String::new();

    let mut sitemap_locs = Vec::new();
    let mut records = Vec::new();

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                depth += 1;
                let in_ns = matches!(ns, ResolveResult::Bound(Namespace(n)) if n == SITEMAP_NS);
                let local = e.local_name();
                match (depth, local.as_ref()) {
                    (2, b"sitemap") if in_ns => {
                        saw_sitemap_entry = true;
                        entry = Some(Entry::Sitemap);
                        loc.clear();
                        lastmod.clear();
                    }
                    (2, b"url") if in_ns => {
                        entry = Some(Entry::Url);
                        loc.clear();
                        lastmod.clear();
                    }
                    (3, b"loc") if in_ns && entry.is_some() => field = Some(Field::Loc),
                    (3, b"lastmod") if in_ns && entry.is_some() => field = Some(Field::LastMod),
                    _ => {}
                }
            }
            Ok((_, Event::End(_))) => {
                match depth {
                    3 => field = None,
                    2 => {
                        let loc_value = loc.trim();
                        match entry.take() {
                            Some(Entry::Sitemap) if !loc_value.is_empty() => {
                                sitemap_locs.push(loc_value.to_string());
                            }
                            Some(Entry::Url) if !loc_value.is_empty() => {
                                let lastmod_value = lastmod.trim();
                                records.push(RecipeRecord {
                                    url: loc_value.to_string(),
                                    last_modified: (!lastmod_value.is_empty())
                                        .then(|| lastmod_value.to_string()),
                                });
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok((_, Event::Text(e))) => {
                if let Some(target) = field {
                    let text = e.unescape().unwrap_or_default();
                    push_field(target, &text, &mut loc, &mut lastmod);
                }
            }
            Ok((_, Event::CData(e))) => {
                if let Some(target) = field {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    push_field(target, &text, &mut loc, &mut lastmod);
                }
            }
            Ok((_, Event::Eof)) => break,
            Err(e) => return Err(e),
            _ => {}
        }
    }

    if saw_sitemap_entry {
        Ok(SitemapDocument::Index(sitemap_locs))
    } else {
        Ok(SitemapDocument::UrlSet(records))
    }
}

fn push_field(target: Field, text: &str, loc: &mut String, lastmod: &mut String) {
    match target {
        Field::Loc => loc.push_str(text),
        Field::LastMod => lastmod.push_str(text),
    }
}
