//! external-dns domain filters
//!
//! Two modes, mirroring external-dns:
//! - **plain**: include/exclude lists of domain suffixes
//! - **regex**: an include regex plus an optional exclusion regex
//!
//! A non-empty include regex switches the filter to regex mode and the plain lists are ignored.

use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Decides which DNS names this provider may list and modify.
#[derive(Debug, Clone, Default)]
pub struct DomainFilter {
    filters: Vec<String>,
    exclusions: Vec<String>,
    regex: Option<Regex>,
    regex_exclusion: Option<Regex>,
}

impl DomainFilter {
    /// A filter that lets every domain through.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Plain include/exclude filter. Entries are trimmed, lowercased and stripped of
    /// a trailing dot; empty entries are dropped.
    pub fn new<I, E, S, T>(filters: I, exclusions: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            filters: prepare_filters(filters),
            exclusions: prepare_filters(exclusions),
            regex: None,
            regex_exclusion: None,
        }
    }

    /// Regex filter. An empty exclusion pattern means "exclude nothing".
    pub fn with_regex(regex: Regex, regex_exclusion: Option<Regex>) -> Self {
        Self {
            filters: Vec::new(),
            exclusions: Vec::new(),
            regex: Some(regex),
            regex_exclusion: regex_exclusion.filter(|r| !r.as_str().is_empty()),
        }
    }

    /// Whether any include or exclude rule is set.
    pub fn is_configured(&self) -> bool {
        self.regex.is_some() || !self.filters.is_empty() || !self.exclusions.is_empty()
    }

    /// Checks a DNS name against the filter.
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);

        if let Some(regex) = &self.regex {
            if self
                .regex_exclusion
                .as_ref()
                .is_some_and(|ex| ex.is_match(&domain))
            {
                return false;
            }
            return regex.is_match(&domain);
        }

        match_filters(&self.filters, &domain, true) && !match_filters(&self.exclusions, &domain, false)
    }
}

/// 去掉域名末尾的点并转为小写
fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

fn prepare_filters<I, S>(filters: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filters
        .into_iter()
        .map(|f| normalize_domain(f.as_ref()))
        .filter(|f| !f.is_empty())
        .collect()
}

/// `empty_value` is returned when no filter is set: include lists accept everything,
/// exclude lists reject nothing.
fn match_filters(filters: &[String], domain: &str, empty_value: bool) -> bool {
    if filters.is_empty() {
        return empty_value;
    }

    filters.iter().any(|filter| {
        if filter.starts_with('.') {
            domain.ends_with(filter.as_str())
        } else if domain.matches('.').count() == filter.matches('.').count() {
            domain == filter
        } else {
            domain.ends_with(&format!(".{filter}"))
        }
    })
}

impl std::fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(regex) = &self.regex {
            write!(f, "regexp domain filter: '{}'", regex.as_str())?;
            if let Some(ex) = &self.regex_exclusion {
                write!(f, ", with exclusion: '{}'", ex.as_str())?;
            }
            return Ok(());
        }

        let mut parts = Vec::new();
        if !self.filters.is_empty() {
            parts.push(format!("domain filter: '{}'", self.filters.join(",")));
        }
        if !self.exclusions.is_empty() {
            parts.push(format!("exclude domain filter: '{}'", self.exclusions.join(",")));
        }
        if parts.is_empty() {
            f.write_str("no kind of domain filters")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Serializes to the shape external-dns expects during webhook negotiation.
impl Serialize for DomainFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DomainFilter", 4)?;
        if self.filters.is_empty() {
            state.skip_field("include")?;
        } else {
            state.serialize_field("include", &self.filters)?;
        }
        if self.exclusions.is_empty() {
            state.skip_field("exclude")?;
        } else {
            state.serialize_field("exclude", &self.exclusions)?;
        }
        match &self.regex {
            Some(regex) => state.serialize_field("regexInclude", regex.as_str())?,
            None => state.skip_field("regexInclude")?,
        }
        match &self.regex_exclusion {
            Some(regex) => state.serialize_field("regexExclude", regex.as_str())?,
            None => state.skip_field("regexExclude")?,
        }
        state.end()
    }
}
