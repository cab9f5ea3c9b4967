use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Current instant as an ISO-8601 string, the timestamp format the backend
/// stamps resources with.
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Local calendar date as `YYYY-MM-DD`. Memos are addressed by this key.
pub fn today_iso_date() -> String {
    // Use system local timezone (browser runtime).
    let d = js_sys::Date::new_0();
    let y = d.get_full_year();
    let m = d.get_month() + 1;
    let day = d.get_date();
    format!("{:04}-{:02}-{:02}", y, m, day)
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    counter.hash(&mut hasher);
    hasher.finish()
}

/// Id for resources created locally before the server has seen them.
/// The prefix must never appear in server-issued ids.
pub(crate) fn local_id(prefix: &str) -> String {
    format!("{prefix}-{}", generate_hash())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_are_prefixed_and_unique() {
        let a = local_id("guest");
        let b = local_id("guest");
        assert!(a.starts_with("guest-"));
        assert_ne!(a, b);
    }
}
