/// Strips query, fragment and trailing slashes; the root stays `/`.
pub fn normalize_path(path: &str) -> &str {
	let path = path.split(['?', '#']).next().unwrap_or("");
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() { "/" } else { trimmed }
}

/// Whether a side-nav item configured for `item_path` is the active one for
/// `current`.
///
/// Exact matches always win. Otherwise the item's path must be a whole-segment
/// prefix of the current path, and the root never prefix-matches.
pub fn is_nav_active(current: &str, item_path: &str) -> bool {
	let (current, item) = (normalize_path(current), normalize_path(item_path));
	if current == item {
		return true;
	}
	if item == "/" {
		return false;
	}
	current
		.strip_prefix(item)
		.is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_match() {
		assert!(is_nav_active("/network", "/network"));
		assert!(is_nav_active("/", "/"));
		assert!(is_nav_active("/network/", "/network"));
	}

	#[test]
	fn prefix_match_on_segments() {
		assert!(is_nav_active("/evidence/42", "/evidence"));
		assert!(is_nav_active("/evidence/42/edit?tab=files", "/evidence"));
		assert!(!is_nav_active("/evidence-board", "/evidence"));
	}

	#[test]
	fn root_does_not_claim_every_route() {
		assert!(!is_nav_active("/network", "/"));
		assert!(!is_nav_active("/timeline/3", "/"));
	}

	#[test]
	fn normalizes_queries_and_fragments() {
		assert_eq!(normalize_path("/files/?page=2"), "/files");
		assert_eq!(normalize_path("#top"), "/");
	}
}
