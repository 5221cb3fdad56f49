use log::{debug, warn};

use crate::core::{CrawlEvent, EventSink};
use crate::parse::{is_case_title, parse_results_page};
use crate::stats::RunStats;

use super::CaseProcessor;

/// Processes one rendered results page: filters entries by title and
/// drives the case processor for each match, sequentially on the shared
/// renderer session.
pub struct ResultPageProcessor<'a> {
    case_processor: CaseProcessor<'a>,
    sink: &'a dyn EventSink,
}

impl<'a> ResultPageProcessor<'a> {
    pub fn new(case_processor: CaseProcessor<'a>, sink: &'a dyn EventSink) -> Self {
        Self {
            case_processor,
            sink,
        }
    }

    /// Returns how many entries matched the title filter. One entry's
    /// failure is recorded against that entry and iteration continues;
    /// a bad case must not sink the whole page.
    pub async fn process(&self, html: &str, stats: &RunStats) -> usize {
        let page = parse_results_page(html);
        let mut matched = 0;

        for entry in page.entries {
            if !is_case_title(&entry.title) {
                debug!("dropping result {:?}: title filter", entry.title);
                continue;
            }
            matched += 1;
            stats.record_case_matched();
            self.sink.emit(CrawlEvent::CaseMatched(entry.url.clone()));

            match self.case_processor.process(&entry.url, stats).await {
                Ok(outcome) => debug!(
                    "case {} finished: {} saved, {} failed",
                    entry.url, outcome.saved, outcome.failed
                ),
                Err(err) => {
                    warn!("case {} failed: {err}", entry.url);
                    stats.record_case_failure(&entry.url, err.to_string());
                }
            }
        }
        matched
    }
}
