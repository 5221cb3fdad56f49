use log::{debug, warn};
use scraper::{Html, Selector};
use url::Url;

use crate::labels::LabelMatcher;

/// Host used to absolutize relative document links.
pub const DOCUMENT_HOST: &str = "https://www.ftc.gov";

/// One row on a results page.
#[derive(Debug, Clone)]
pub struct ResultEntry {
    pub title: String,
    pub url: Url,
}

#[derive(Debug, Clone)]
pub struct ResultsPage {
    pub entries: Vec<ResultEntry>,
    /// Highest numeric pagination item, or 1 when no pagination control
    /// is present.
    pub total_pages: u32,
}

/// A labeled document link found on a case-detail page.
#[derive(Debug, Clone)]
pub struct CaseDocument {
    pub label: String,
    pub url: Url,
}

/// True for result titles that represent real case matches.
pub fn is_case_title(title: &str) -> bool {
    title.contains('|') || title.contains("In the Matter of")
}

/// Extracts result entries and the pagination bound from a rendered
/// results page. Absent structural markers yield empty results, not an
/// error: the upstream's markup is not contractually guaranteed.
pub fn parse_results_page(html: &str) -> ResultsPage {
    let document = Html::parse_document(html);
    let item_selector = Selector::parse(
        r#"div.grid-container.result.search-result-item[data-testid="gridContainer"]"#,
    )
    .unwrap();
    let title_selector = Selector::parse("h2.result-title-label").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut entries = Vec::new();
    for item in document.select(&item_selector) {
        let Some(heading) = item.select(&title_selector).next() else {
            debug!("result item without a title heading, skipping");
            continue;
        };
        let title = heading.text().collect::<String>().trim().to_string();
        let Some(href) = heading
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            debug!("result item {title:?} has no link, skipping");
            continue;
        };
        match absolutize(href) {
            Some(url) => entries.push(ResultEntry { title, url }),
            None => warn!("unparseable result link {href:?}, skipping"),
        }
    }

    ResultsPage {
        entries,
        total_pages: parse_total_pages(&document),
    }
}

fn parse_total_pages(document: &Html) -> u32 {
    let page_selector =
        Selector::parse("li.usa-pagination__item.usa-pagination__page-no").unwrap();
    document
        .select(&page_selector)
        .filter_map(|item| item.text().collect::<String>().trim().parse::<u32>().ok())
        .max()
        .unwrap_or(1)
}

/// Collects every anchor on a case-detail page whose visible text
/// exactly equals an accepted document label.
pub fn parse_case_page(html: &str, matcher: &LabelMatcher) -> Vec<CaseDocument> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a").unwrap();

    let mut documents = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let label: String = anchor.text().collect();
        if !matcher.matches(&label) {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match absolutize(href) {
            Some(url) => documents.push(CaseDocument { label, url }),
            None => warn!("unparseable document link {href:?} under label {label:?}"),
        }
    }
    documents
}

fn absolutize(href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(DOCUMENT_HOST).ok()?.join(href).ok()
        }
        Err(_) => None,
    }
}
