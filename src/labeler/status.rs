use crate::document::{Document, Section};

/// Top-level section titles that can hold a limitations discussion.
pub const ELIGIBLE_TOP_LEVEL_KEYWORDS: &[&str] =
    &["discussion", "conclusion", "limitation", "weakness"];

const LIMITATION_KEYWORDS: &[&str] = &["limitation", "weakness"];
const STRENGTH_KEYWORD: &str = "strength";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    None,
    LimitOnly,
    Both,
}

impl SectionStatus {
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if !contains_any(&title, LIMITATION_KEYWORDS) {
            return Self::None;
        }
        if title.contains(STRENGTH_KEYWORD) {
            Self::Both
        } else {
            Self::LimitOnly
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LimitOnly => "limit_only",
            Self::Both => "both",
        }
    }
}

/// Untitled sections never carry a status.
pub fn section_status(document: &Document, section: &Section) -> SectionStatus {
    document
        .title_of(section)
        .map(SectionStatus::from_title)
        .unwrap_or(SectionStatus::None)
}

pub fn passes_top_level_gate(title: &str) -> bool {
    contains_any(&title.to_lowercase(), ELIGIBLE_TOP_LEVEL_KEYWORDS)
}

pub(crate) fn mentions_limitation(lowercase_text: &str) -> bool {
    contains_any(lowercase_text, LIMITATION_KEYWORDS)
}

pub(crate) fn mentions_strength(lowercase_text: &str) -> bool {
    lowercase_text.contains(STRENGTH_KEYWORD)
}

/// Byte positions of the strength and limitation keywords in a lowercased
/// title. "weakness" stands in when "limitation" is absent.
pub(crate) fn keyword_positions(lowercase_title: &str) -> (Option<usize>, Option<usize>) {
    let strength = lowercase_title.find(STRENGTH_KEYWORD);
    let limitation = LIMITATION_KEYWORDS
        .iter()
        .find_map(|keyword| lowercase_title.find(keyword));
    (strength, limitation)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::{SectionStatus, keyword_positions, passes_top_level_gate};

    #[test]
    fn status_follows_title_keywords() {
        assert_eq!(SectionStatus::from_title("Limitations"), SectionStatus::LimitOnly);
        assert_eq!(
            SectionStatus::from_title("Study weaknesses"),
            SectionStatus::LimitOnly
        );
        assert_eq!(
            SectionStatus::from_title("Strengths and Limitations"),
            SectionStatus::Both
        );
        assert_eq!(SectionStatus::from_title("Strengths"), SectionStatus::None);
        assert_eq!(SectionStatus::from_title("Methods"), SectionStatus::None);
    }

    #[test]
    fn top_level_gate_accepts_discussion_like_titles() {
        assert!(passes_top_level_gate("4. Discussion"));
        assert!(passes_top_level_gate("Conclusions"));
        assert!(passes_top_level_gate("Limitations of the study"));
        assert!(!passes_top_level_gate("Methods"));
        assert!(!passes_top_level_gate(""));
    }

    #[test]
    fn keyword_positions_fall_back_to_weakness() {
        assert_eq!(
            keyword_positions("strengths and weaknesses"),
            (Some(0), Some(14))
        );
        assert_eq!(keyword_positions("limitations and strengths"), (Some(16), Some(0)));
        assert_eq!(keyword_positions("methods"), (None, None));
    }
}
