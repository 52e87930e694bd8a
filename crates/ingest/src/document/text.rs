use pagewise_core::Page;

use super::split_form_feeds;

/// Plain text and markdown. Form feeds, as left by `pdftotext` and similar
/// exporters, start a new page; without them the whole file is page 1.
pub fn extract_plain(bytes: &[u8]) -> Vec<Page> {
    split_form_feeds(&String::from_utf8_lossy(bytes))
}

/// ATX headings (`# Title`) in page order, without their markers.
pub fn markdown_headings(pages: &[Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.text.lines())
        .map(str::trim_start)
        .filter_map(|line| line.strip_prefix('#'))
        .map(|rest| rest.trim_start_matches('#').trim())
        .filter(|heading| !heading.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_file_is_one_trimmed_page() {
        let pages = extract_plain(b"  \n  Hello, world!\nSecond line.  \n");
        assert_eq!(pages, vec![Page::new(1, "Hello, world!\nSecond line.")]);
    }

    #[test]
    fn form_feeds_split_pages() {
        let pages = extract_plain(b"One.\x0CTwo.");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], Page::new(2, "Two."));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let pages = extract_plain(b"ok \xFF done");
        assert_eq!(pages[0].text, "ok \u{FFFD} done");
    }

    #[test]
    fn empty_file_is_one_blank_page() {
        let pages = extract_plain(b"");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_blank());
    }

    #[test]
    fn headings_across_pages() {
        let pages = extract_plain(b"# Title\n\nSome text.\n## Section 1\x0C### Sub\n#\nBody #tag");
        assert_eq!(markdown_headings(&pages), vec!["Title", "Section 1", "Sub"]);
    }

    #[test]
    fn no_headings_in_plain_prose() {
        let pages = extract_plain(b"Just plain text without any headings.");
        assert!(markdown_headings(&pages).is_empty());
    }
}
