//! Report presentation fields: title, keywords, hashtags, audience and category labels.

use crate::constants::{DEFAULT_AUDIENCE, DEFAULT_CATEGORY, PROFESSIONAL_AUDIENCE, TITLE_MAX_CHARS};
use crate::submission::UserPreferences;
use taxonomy::{CategoryRule, ContentType, Hashtag, HashtagCues, KeywordCues, PlatformProfile};

/// First sentence, whitespace-collapsed, capitalised and cut on a word boundary.
pub fn title(text: &str, content_type: ContentType) -> String {
    let sentence = first_sentence(text);
    let collapsed = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut title = capitalise(&collapsed);

    let chars: Vec<char> = title.chars().collect();
    if chars.len() > TITLE_MAX_CHARS {
        let mut cut: String = chars[..TITLE_MAX_CHARS].iter().collect();
        // Only back off to a word boundary when the cut lands mid-word.
        if !chars[TITLE_MAX_CHARS].is_whitespace() {
            if let Some(idx) = cut.rfind(' ').filter(|idx| *idx > 0) {
                cut.truncate(idx);
            }
        }
        let cut = cut.trim_end_matches(|c: char| {
            matches!(c, ',' | ';' | ':' | ' ' | '-' | '\u{2013}' | '\u{2014}')
        });
        title = format!("{cut}...");
    }

    match content_type {
        ContentType::HealthTip => format!("Health Tip: {title}"),
        _ => title,
    }
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary && idx > 0 {
                return &text[..idx];
            }
        }
    }
    text
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalise)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Vocabulary terms found in the text, then specialty terms, de-duplicated and capped.
pub fn keywords(text_lower: &str, specialty: Option<&str>, cues: &KeywordCues) -> Vec<String> {
    let mut candidates: Vec<String> = cues
        .vocabulary
        .matching(text_lower)
        .map(str::to_string)
        .collect();

    if let Some(specialty) = specialty {
        candidates.push(specialty.trim().to_lowercase());
        if let Some(terms) = cues.specialty_terms(specialty) {
            candidates.extend(terms.iter().map(str::to_string));
        }
        candidates.extend(cues.specialty_common.iter().map(str::to_string));
    }

    let mut out: Vec<String> = Vec::new();
    for keyword in candidates {
        if out.len() == cues.max_keywords {
            break;
        }
        if !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}

/// Locale tags first, then specialty, keyword and channel tags.
///
/// Capped at the channel's hashtag ceiling, but never below the number of locale tags.
pub fn hashtags(
    keywords: &[String],
    specialty: Option<&str>,
    profile: &PlatformProfile,
    cues: &HashtagCues,
) -> Vec<String> {
    let cap = profile.max_hashtags.max(cues.locale.len());

    let candidates = cues
        .locale
        .iter()
        .cloned()
        .chain(specialty.and_then(Hashtag::from_phrase))
        .chain(keywords.iter().filter_map(|k| Hashtag::from_phrase(k)))
        .chain(profile.extra_hashtags.iter().cloned());

    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for tag in candidates {
        if out.len() == cap {
            break;
        }
        let key = tag.body().to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(tag.to_string());
    }
    out
}

pub fn audience(
    preferences: &UserPreferences,
    profile: &PlatformProfile,
    specialty: Option<&str>,
) -> String {
    if let Some(audience) = preferences
        .target_audience
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        return audience.to_string();
    }
    if profile.professional {
        return PROFESSIONAL_AUDIENCE.to_string();
    }
    match specialty {
        Some(specialty) => format!("Patients seeking {} care", specialty.trim().to_lowercase()),
        None => DEFAULT_AUDIENCE.to_string(),
    }
}

pub fn category(text_lower: &str, specialty: Option<&str>, rules: &[CategoryRule]) -> String {
    if let Some(rule) = rules.iter().find(|r| r.terms.matches_any(text_lower)) {
        return rule.label.clone();
    }
    match specialty {
        Some(specialty) => title_case(specialty),
        None => DEFAULT_CATEGORY.to_string(),
    }
}
