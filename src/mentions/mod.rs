/**
 * Mention Resolver
 *
 * Scans free text for `@username` tokens and resolves them to user records
 * for notification fan-out. The resolver never creates notifications
 * itself; it returns the resolved stubs to the caller.
 *
 * Exclusions: the acting user's own username (never self-notify), and
 * optionally an already-notified author so the same event does not notify
 * the same person twice through two paths. Tokens that match no stored
 * username are silently dropped; free text is full of `@` that is not a
 * real user.
 */

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use sqlx::PgPool;

use crate::auth::users::{self, UserStub};

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("mention regex is valid"))
}

/// Extract distinct mentioned usernames in first-seen order
pub fn parse_mentions(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    mention_regex()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|username| seen.insert(username.clone()))
        .collect()
}

/// Resolve mentions in `text` to user stubs
///
/// `acting_username` is always excluded; `excluded_username` covers an
/// author who already receives a notification for the same event through a
/// different path. Case-sensitive on the stored username.
pub async fn resolve_mentions(
    pool: &PgPool,
    text: &str,
    acting_username: &str,
    excluded_username: Option<&str>,
) -> Result<Vec<UserStub>, sqlx::Error> {
    let usernames: Vec<String> = parse_mentions(text)
        .into_iter()
        .filter(|u| u != acting_username)
        .filter(|u| excluded_username != Some(u.as_str()))
        .collect();

    if usernames.is_empty() {
        return Ok(Vec::new());
    }

    users::get_user_stubs_by_usernames(pool, &usernames).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_single_mention() {
        assert_eq!(parse_mentions("hello @bea!"), vec!["bea"]);
    }

    #[test]
    fn test_parse_deduplicates_preserving_order() {
        assert_eq!(
            parse_mentions("@bea hi @carl, again @bea"),
            vec!["bea", "carl"]
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(parse_mentions("@Bea and @bea"), vec!["Bea", "bea"]);
    }

    #[test]
    fn test_parse_ignores_bare_at() {
        assert!(parse_mentions("meet @ noon").is_empty());
        assert!(parse_mentions("no mentions here").is_empty());
    }

    #[test]
    fn test_parse_stops_at_punctuation() {
        assert_eq!(parse_mentions("thanks @bea, @carl."), vec!["bea", "carl"]);
    }

    proptest! {
        #[test]
        fn test_parsed_mentions_are_distinct(text in ".*") {
            let mentions = parse_mentions(&text);
            let unique: HashSet<_> = mentions.iter().collect();
            prop_assert_eq!(unique.len(), mentions.len());
        }

        #[test]
        fn test_parsed_mentions_appear_in_text(text in ".*") {
            for username in parse_mentions(&text) {
                let needle = format!("@{}", username);
                prop_assert!(text.contains(&needle));
            }
        }
    }
}
