/// Cell spellings read as "no value", the same set spreadsheet exports and
/// pandas treat as NA by default.
static NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 1) Map a raw cell to `None` when it spells a null.
pub fn clean_cell(raw: &str) -> Option<String> {
    if is_null(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

pub fn is_null(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw)
}

/// 2) Parse a numeric cell, tolerating surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// 3) Boolean spellings a spreadsheet column may hold instead of numbers.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}
