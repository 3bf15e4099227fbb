//! Equality on a chosen subset of fields.
//!
//! Records decoded from the remote carry server-assigned values (ids,
//! timestamps) a caller cannot predict. Comparing through an explicit
//! projection keeps the fields under test visible at the call site:
//!
//! ```
//! use whmcs_core::matching::contains_matching;
//! use whmcs_core::ContactList;
//!
//! let found = vec![ContactList { email: "a@x".into(), status: "Active".into(), ..Default::default() }];
//! let expected = ContactList { email: "a@x".into(), status: "Active".into(), phone: "n/a".into(), ..Default::default() };
//! assert!(contains_matching(&found, &expected, |c| (c.email.clone(), c.status.clone())));
//! ```

/// First item whose projection equals the projection of `expected`.
pub fn find_matching<'a, T, K, F>(items: &'a [T], expected: &T, key: F) -> Option<&'a T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let wanted = key(expected);
    items.iter().find(|item| key(*item) == wanted)
}

pub fn contains_matching<T, K, F>(items: &[T], expected: &T, key: F) -> bool
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    find_matching(items, expected, key).is_some()
}
