//! Rule-based post-correction markers, compiled once
//! at module load, in a "build a `Vec<Regex>` from pattern strings
//! once, then match many times" shape.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Name/occupation/age self-disclosure statements ("my name is...", "I'm a
/// software engineer", "I'm 28 years old").
static IDENTITY_MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\bmy name is\b",
        r"(?i)\bi'?m (?:a|an)\s+\w+",
        r"(?i)\bi work as\b",
        r"(?i)\bi'?m \d{1,3} years old\b",
        r"(?i)\bi am \d{1,3} years old\b",
        r"(?i)\bcall me\b",
    ])
    .expect("identity marker patterns are valid regexes")
});

/// Assistant pledges and standing commitments ("I will always...", "I
/// promise...", "from now on I'll...").
static COMMITMENT_MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\bi will always\b",
        r"(?i)\bi promise\b",
        r"(?i)\bi'?ll always\b",
        r"(?i)\bfrom now on i'?ll\b",
        r"(?i)\bi'?ll make sure to always\b",
    ])
    .expect("commitment marker patterns are valid regexes")
});

/// Concrete, actionable advice ("you should...", "I recommend...", "try
/// ...ing").
static ADVICE_MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\byou should\b",
        r"(?i)\bi recommend\b",
        r"(?i)\btry\s+\w+ing\b",
        r"(?i)\bconsider\s+\w+ing\b",
        r"(?i)\byou could try\b",
    ])
    .expect("advice marker patterns are valid regexes")
});

/// Emotional-support language ("I'm sorry to hear", "that sounds really
/// hard", "I'm here for you").
static SUPPORT_MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\bi'?m sorry to hear\b",
        r"(?i)\bthat sounds (?:really\s+)?(?:hard|tough|difficult)\b",
        r"(?i)\bi'?m here for you\b",
        r"(?i)\bthat must be (?:really\s+)?(?:hard|difficult)\b",
    ])
    .expect("support marker patterns are valid regexes")
});

/// User quoting or referencing an earlier assistant statement ("you said
/// earlier...", "like you mentioned...", "you told me...").
static QUOTATION_MARKERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)\byou said (?:earlier\s+)?that\b",
        r"(?i)\byou mentioned\b",
        r"(?i)\byou told me\b",
        r"(?i)\blike you said\b",
    ])
    .expect("quotation marker patterns are valid regexes")
});

#[must_use]
pub fn matches_identity(text: &str) -> bool {
    IDENTITY_MARKERS.is_match(text)
}

#[must_use]
pub fn matches_commitment(text: &str) -> bool {
    COMMITMENT_MARKERS.is_match(text)
}

#[must_use]
pub fn matches_advice(text: &str) -> bool {
    ADVICE_MARKERS.is_match(text)
}

#[must_use]
pub fn matches_support(text: &str) -> bool {
    SUPPORT_MARKERS.is_match(text)
}

#[must_use]
pub fn matches_quotation(text: &str) -> bool {
    QUOTATION_MARKERS.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_statement_matches() {
        assert!(matches_identity("Hi, my name is Alice and I'm a teacher."));
        assert!(!matches_identity("It's raining today."));
    }

    #[test]
    fn commitment_statement_matches() {
        assert!(matches_commitment("I promise to check in every week."));
        assert!(!matches_commitment("Sure, I can help with that."));
    }

    #[test]
    fn advice_statement_matches() {
        assert!(matches_advice("You should try meditating before bed."));
        assert!(!matches_advice("That's an interesting question."));
    }

    #[test]
    fn support_statement_matches() {
        assert!(matches_support("I'm sorry to hear that, that sounds really hard."));
        assert!(!matches_support("Great, glad that worked out."));
    }

    #[test]
    fn quotation_statement_matches() {
        assert!(matches_quotation("Like you said, I should start small."));
        assert!(!matches_quotation("I think I'll start small."));
    }
}
