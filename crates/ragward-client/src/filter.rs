// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fuzzy text filter for admin listings.
//!
//! A query matches when its characters appear in order, not necessarily
//! adjacent, in the candidate text. Matching ignores case and whitespace in
//! the query.

/// Returns true if `query` is a case-insensitive subsequence of `text`.
pub fn fuzzy_match(query: &str, text: &str) -> bool {
	let mut haystack = text.chars().flat_map(char::to_lowercase);
	query
		.chars()
		.filter(|c| !c.is_whitespace())
		.flat_map(char::to_lowercase)
		.all(|needle| haystack.any(|c| c == needle))
}

/// Keeps the items whose key matches `query`. A blank query keeps everything.
pub fn fuzzy_filter<'a, T, K>(items: &'a [T], query: &str, key: K) -> Vec<&'a T>
where
	K: Fn(&T) -> String,
{
	if query.trim().is_empty() {
		return items.iter().collect();
	}
	items.iter().filter(|item| fuzzy_match(query, &key(item))).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn subsequence_matches() {
		assert!(fuzzy_match("eng", "Engineering"));
		assert!(fuzzy_match("egr", "Engineering"));
		assert!(fuzzy_match("ENG", "engineering"));
		assert!(!fuzzy_match("gne", "Engineering"));
		assert!(!fuzzy_match("sales", "Engineering"));
	}

	#[test]
	fn blank_query_matches_everything() {
		assert!(fuzzy_match("", "anything"));
		assert!(fuzzy_match("  ", ""));
	}

	#[test]
	fn query_whitespace_is_ignored() {
		assert!(fuzzy_match("eng docs", "Engineering Docs"));
		assert!(fuzzy_match("e d", "EngDocs"));
	}

	#[test]
	fn filter_uses_key() {
		let groups = vec!["Administrators", "Users", "Sales", "Support"];
		let hits = fuzzy_filter(&groups, "rs", |g| g.to_string());
		assert_eq!(hits, vec![&"Administrators", &"Users"]);
		assert_eq!(fuzzy_filter(&groups, " ", |g| g.to_string()).len(), 4);
	}

	proptest! {
		#[test]
		fn text_matches_itself(text in "[a-zA-Z0-9 _-]{0,24}") {
			prop_assert!(fuzzy_match(&text, &text));
		}

		#[test]
		fn any_subsequence_matches(text in "[a-z]{1,24}", mask in proptest::collection::vec(any::<bool>(), 24)) {
			let query: String = text
				.chars()
				.zip(mask.iter())
				.filter(|(_, keep)| **keep)
				.map(|(c, _)| c.to_ascii_uppercase())
				.collect();
			prop_assert!(fuzzy_match(&query, &text));
		}
	}
}
