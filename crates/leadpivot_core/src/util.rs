use std::borrow::Cow;
use std::collections::BTreeSet;

use csv::StringRecord;

////////////////////////////////////////////////////////////////////////////////
// #region TextDecoding

/// Decode ISO-8859-1 bytes; every byte maps to the code point of equal value.
pub(crate) fn decode_latin1(v_bytes: &[u8]) -> Cow<'_, str> {
    encoding_rs::mem::decode_latin1(v_bytes)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderNormalization

/// Name blank header cells `Unnamed: <position>`, then suffix repeated names
/// with `.1`, `.2`, ... so every column is addressable.
pub(crate) fn derive_unique_header_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let l_names: Vec<String> = names
        .into_iter()
        .enumerate()
        .map(|(n_idx_col, c_name)| {
            if c_name.is_empty() {
                format!("Unnamed: {n_idx_col}")
            } else {
                c_name.to_string()
            }
        })
        .collect();
    let mut set_taken: BTreeSet<String> = BTreeSet::new();
    let mut l_unique = Vec::with_capacity(l_names.len());

    for c_name in l_names {
        if set_taken.insert(c_name.clone()) {
            l_unique.push(c_name);
            continue;
        }

        let mut n_suffix = 1usize;
        let c_candidate = loop {
            let c_candidate = format!("{c_name}.{n_suffix}");
            if !set_taken.contains(&c_candidate) {
                break c_candidate;
            }
            n_suffix += 1;
        };
        set_taken.insert(c_candidate.clone());
        l_unique.push(c_candidate);
    }

    l_unique
}

/// A line holding nothing (no delimiter, no text).
pub(crate) fn is_blank_record(record: &StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record.get(0).is_some_and(str::is_empty))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
