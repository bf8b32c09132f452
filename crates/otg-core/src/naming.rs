use heck::ToLowerCamelCase;

/// Canonical, identifier-safe type name for a schema key.
///
/// Every run of non-alphanumeric characters is a word boundary; the first
/// character of each word is upper-cased and the rest is kept as written, so
/// acronyms survive (`HTTPError` stays `HTTPError`). Pure: the same input
/// always yields the same name.
pub fn type_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut at_word_start = true;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                result.extend(ch.to_uppercase());
            } else {
                result.push(ch);
            }
            at_word_start = false;
        } else {
            at_word_start = true;
        }
    }

    if result.is_empty() {
        return "Unnamed".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// camelCase form of a property key (`user_name` → `userName`).
pub fn camel_case(name: &str) -> String {
    let converted = name.to_lower_camel_case();
    if converted.is_empty() {
        name.to_string()
    } else {
        converted
    }
}

/// Map a `$ref` value to the canonical name of the type it points at.
///
/// - `#/components/schemas/Foo`, `#/definitions/Foo`, `#/any/path/Foo` → `Foo`
/// - `https://host/doc.json#/Foo` → `Foo`
/// - an external address without a fragment, or a relative file reference → `None`
pub fn ref_type_name(ref_path: &str) -> Option<String> {
    let fragment = if is_external_ref(ref_path) {
        let (_, fragment) = ref_path.split_once('#')?;
        fragment
    } else {
        ref_path.strip_prefix('#')?
    };
    let last = fragment
        .strip_prefix('/')?
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())?;
    Some(type_name(&unescape_pointer_token(last)))
}

/// True if the reference points into a document fetched over HTTP(S).
pub fn is_external_ref(ref_path: &str) -> bool {
    ref_path.starts_with("http://") || ref_path.starts_with("https://")
}

/// The document address of a reference, fragment removed.
pub fn base_address(ref_path: &str) -> &str {
    ref_path
        .split_once('#')
        .map_or(ref_path, |(base, _)| base)
}

fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
