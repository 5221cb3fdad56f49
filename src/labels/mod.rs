use std::collections::HashSet;

/// Labels the index uses to tag dispositive documents. The list is
/// maintained configuration, not crawl logic; callers may supply their
/// own through [`LabelMatcher::new`].
pub const DISPOSITIVE_LABELS: &[&str] = &[
    "Order",
    "Complaint",
    "Administrative Complaint",
    "Administrative Complaint [Redacted Public Version]",
    "Final Order",
    "Decision and Order",
    "Decision of Chief Administrative Law Judge",
    "Regarding Potential Criminal Violations of",
    "Provisionally Redacted Public Version",
    "Stipulated Order for Civil Penalty, Monetary Judgment and Injunctive Relief",
    "Stipulated Order for Permanent Injunction and Monetary Judgment",
    "Complaint for Civil Penalties, Injunction, and Other Relief",
    "Complaint for Permanent Injunction, Monetary Relief, Civil Penalties, and Other Relief",
    "Complaint for Permanent Injunction, Other Equitable Relief, and Civil Penalties",
    "Complaint for Permanent Injunction and Other Equitable Relief",
    "Complaint for Permanent Injunction and Other Equitable Relief [Seal Lifted]",
    "Complaint for Permanent Injunction and Civil Penalties",
    "[Redacted] Complaint for Permanent Injunction and Other Equitable Relief",
    "Order for Permanent Injunction and Civil Penalty Judgment [Entered by the Court]",
    "Commission Final Order",
    "Consent Decree",
    "Administrative Part 1 Complaint",
    "Administrative Part 2 Complaint",
    "Administrative Part 3 Complaint",
    "Administrative Part 4 Complaint",
];

/// Decides whether a document's visible label marks it as dispositive.
/// Membership is exact string equality, case-sensitive, no substring or
/// fuzzy matching.
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    labels: HashSet<String>,
}

impl Default for LabelMatcher {
    fn default() -> Self {
        Self::new(DISPOSITIVE_LABELS.iter().copied())
    }
}

impl LabelMatcher {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_members_only() {
        let matcher = LabelMatcher::default();
        assert!(matcher.matches("Order"));
        assert!(matcher.matches("Decision and Order"));
        assert!(matcher.matches("Administrative Part 4 Complaint"));
        assert!(!matcher.matches("Press Release"));
    }

    #[test]
    fn no_partial_matches() {
        let matcher = LabelMatcher::default();
        assert!(!matcher.matches("Order Form"));
        assert!(!matcher.matches("Final Order "));
        assert!(!matcher.matches("Complaint for"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let matcher = LabelMatcher::default();
        assert!(!matcher.matches("order"));
        assert!(!matcher.matches("FINAL ORDER"));
    }

    #[test]
    fn caller_supplied_list_replaces_the_default() {
        let matcher = LabelMatcher::new(["Judgment"]);
        assert!(matcher.matches("Judgment"));
        assert!(!matcher.matches("Order"));
    }
}
