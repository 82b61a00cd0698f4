use std::env;

/// Empty values count as unset.
pub fn opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Names of the keys `lookup` has no value for, in the given order.
pub fn missing<'k, F>(keys: &[&'k str], lookup: F) -> Vec<&'k str>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().copied().filter(|key| lookup(key).is_none()).collect()
}
