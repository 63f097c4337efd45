//! Field-name prefix stripping.

use uncased::UncasedStr;

/// Result of matching a field name against the configured prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stripped {
    /// A prefix matched and was removed; carries the remainder.
    Removed(String),
    /// No prefix applies; the name is used as is.
    Unchanged,
    /// Prefixes are configured, none matched, and matching is mandatory.
    Rejected,
}

/// Prefixes removed from field names before accessor naming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixPolicy {
    /// Candidate prefixes, tried in order.
    pub prefixes: Vec<String>,
    /// Compare prefixes case-sensitively.
    pub case_sensitive: bool,
    /// Reject names that match no prefix.
    pub must_match: bool,
}

impl PrefixPolicy {
    /// Policy with prefixes and the default strict matching.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            case_sensitive: true,
            must_match: true,
        }
    }

    /// Matches `name` against the prefixes.
    ///
    /// A prefix ending in a letter only matches when the next character is
    /// not lowercase, so `m` strips `mName` but leaves `many` alone. An empty
    /// prefix matches every name unchanged.
    ///
    /// ```
    /// use member_synth::naming::{PrefixPolicy, Stripped};
    ///
    /// let policy = PrefixPolicy::new(["m"]);
    /// assert_eq!(policy.strip("mPrefixed"), Stripped::Removed("Prefixed".to_owned()));
    /// assert_eq!(policy.strip("other"), Stripped::Rejected);
    /// ```
    #[must_use]
    pub fn strip(&self, name: &str) -> Stripped {
        if self.prefixes.is_empty() {
            return Stripped::Unchanged;
        }
        for prefix in &self.prefixes {
            if prefix.is_empty() {
                return Stripped::Unchanged;
            }
            if let Some(rest) = self.remainder(name, prefix) {
                return Stripped::Removed(rest.to_owned());
            }
        }
        if self.must_match {
            Stripped::Rejected
        } else {
            Stripped::Unchanged
        }
    }

    fn remainder<'n>(&self, name: &'n str, prefix: &str) -> Option<&'n str> {
        if name.len() <= prefix.len() {
            return None;
        }
        let head = name.get(..prefix.len())?;
        let rest = name.get(prefix.len()..)?;
        let matches = if self.case_sensitive {
            head == prefix
        } else {
            UncasedStr::new(head) == UncasedStr::new(prefix)
        };
        if !matches {
            return None;
        }
        let ends_in_letter = prefix.chars().last().is_some_and(char::is_alphabetic);
        let next_is_lower = rest.chars().next().is_some_and(char::is_lowercase);
        (!(ends_in_letter && next_is_lower)).then_some(rest)
    }

    /// Base name for accessor naming, or `None` when rejected.
    #[must_use]
    pub fn base_name(&self, name: &str) -> Option<String> {
        match self.strip(name) {
            Stripped::Removed(rest) => Some(rest),
            Stripped::Unchanged => Some(name.to_owned()),
            Stripped::Rejected => None,
        }
    }

    /// Like [`Self::base_name`] but never rejects.
    #[must_use]
    pub fn lenient_base_name(&self, name: &str) -> String {
        match self.strip(name) {
            Stripped::Removed(rest) => rest,
            Stripped::Unchanged | Stripped::Rejected => name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["m"], "mPrefixed", Stripped::Removed("Prefixed".to_owned()))]
    #[case(&["m"], "many", Stripped::Rejected)]
    #[case(&["m"], "other", Stripped::Rejected)]
    #[case(&["m"], "m", Stripped::Rejected)]
    #[case(&["f", "m"], "mValue", Stripped::Removed("Value".to_owned()))]
    #[case(&["_"], "_count", Stripped::Removed("count".to_owned()))]
    #[case(&["m", ""], "plain", Stripped::Unchanged)]
    #[case(&[], "plain", Stripped::Unchanged)]
    fn strips_strictly(
        #[case] prefixes: &[&str],
        #[case] name: &str,
        #[case] expected: Stripped,
    ) {
        let policy = PrefixPolicy::new(prefixes.iter().copied());
        assert_eq!(policy.strip(name), expected);
    }

    #[test]
    fn lenient_policy_keeps_unmatched_names() {
        let policy = PrefixPolicy {
            must_match: false,
            ..PrefixPolicy::new(["m"])
        };
        assert_eq!(policy.strip("other"), Stripped::Unchanged);
        assert_eq!(policy.base_name("other").as_deref(), Some("other"));
    }

    #[test]
    fn case_insensitive_prefixes_use_uncased_comparison() {
        let policy = PrefixPolicy {
            case_sensitive: false,
            ..PrefixPolicy::new(["m"])
        };
        assert_eq!(policy.strip("MValue"), Stripped::Removed("Value".to_owned()));
        let strict = PrefixPolicy::new(["m"]);
        assert_eq!(strict.strip("MValue"), Stripped::Rejected);
    }

    #[test]
    fn lenient_base_never_rejects() {
        let policy = PrefixPolicy::new(["m"]);
        assert_eq!(policy.lenient_base_name("other"), "other");
        assert_eq!(policy.lenient_base_name("mOther"), "Other");
    }
}
