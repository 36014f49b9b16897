//! Expo push address grammar.

const TOKEN_PREFIXES: [&str; 2] = ["ExponentPushToken[", "ExpoPushToken["];
const TOKEN_SUFFIX: char = ']';

/// Group lengths of the bare `8-4-4-4-12` device id form.
const DEVICE_ID_GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Returns true if `address` is a syntactically valid Expo push token.
///
/// Accepts `ExponentPushToken[..]`, `ExpoPushToken[..]` and bare
/// `8-4-4-4-12` ids made of ASCII letters and digits.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    let bracketed = TOKEN_PREFIXES
        .iter()
        .any(|prefix| address.starts_with(prefix))
        && address.ends_with(TOKEN_SUFFIX);

    bracketed || is_device_id(address)
}

fn is_device_id(address: &str) -> bool {
    let groups: Vec<&str> = address.split('-').collect();
    groups.len() == DEVICE_ID_GROUPS.len()
        && groups.iter().zip(DEVICE_ID_GROUPS).all(|(group, len)| {
            group.len() == len && group.bytes().all(|b| b.is_ascii_alphanumeric())
        })
}
