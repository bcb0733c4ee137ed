//! `Bug-Url:` trailers and revert detection in commit messages.

use std::sync::LazyLock;

use regex::Regex;

static BUG_URL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\s*Bug-Url:\s*(\S+)\s*$").expect("valid bug url pattern")
});

static BUG_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]id=|/)(\d+)/?$").expect("valid bug id pattern")
});

static REVERTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^This reverts commit ([[:xdigit:]]+)\.?\s*$").expect("valid revert pattern")
});

/// Every `Bug-Url:` trailer in `message` that points at `bz_server`.
///
/// `bz_server` may carry a scheme and trailing slash
/// (`https://bugzilla.redhat.com/`); only the host is compared.
#[must_use]
pub fn bug_urls(message: &str, bz_server: &str) -> Vec<String> {
    let host = host_of(bz_server);
    BUG_URL_LINE
        .captures_iter(message)
        .map(|caps| caps[1].to_string())
        .filter(|url| host_of(url).eq_ignore_ascii_case(host))
        .collect()
}

/// Bug id of a `show_bug.cgi?id=N` or `<server>/N` url.
#[must_use]
pub fn bug_id(url: &str) -> Option<u64> {
    BUG_ID.captures(url).and_then(|caps| caps[1].parse().ok())
}

/// Bug ids of `urls`, first occurrence order, duplicates dropped.
#[must_use]
pub fn bug_ids(urls: &[String]) -> Vec<u64> {
    let mut ids = Vec::new();
    for id in urls.iter().filter_map(|url| bug_id(url)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// The sha named by a `This reverts commit <sha>` line.
#[must_use]
pub fn reverted_commit(message: &str) -> Option<&str> {
    REVERTS
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|sha| sha.as_str())
}

fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}
