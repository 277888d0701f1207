//! Wide-format column vocabulary
//!
//! The flag columns of the two wide-format sources are a fixed vocabulary,
//! not something to re-derive from file layout at run time. Color flag
//! columns are mapped to canonical color names by a configuration-time
//! table; subject flag columns canonicalize mechanically (underscores
//! expanded, title-cased).

/// Known color flag columns and the canonical color name each stands for.
///
/// Link-time matching consults this table before falling back to substring
/// containment against the resolved color names.
pub const COLOR_COLUMNS: [(&str, &str); 18] = [
    ("Alizarin_Crimson", "Alizarin Crimson"),
    ("Black_Gesso", "Black Gesso"),
    ("Bright_Red", "Bright Red"),
    ("Burnt_Umber", "Burnt Umber"),
    ("Cadmium_Yellow", "Cadmium Yellow"),
    ("Dark_Sienna", "Dark Sienna"),
    ("Indian_Red", "Indian Red"),
    ("Indian_Yellow", "Indian Yellow"),
    ("Liquid_Black", "Liquid Black"),
    ("Liquid_Clear", "Liquid Clear"),
    ("Midnight_Black", "Midnight Black"),
    ("Phthalo_Blue", "Phthalo Blue"),
    ("Phthalo_Green", "Phthalo Green"),
    ("Prussian_Blue", "Prussian Blue"),
    ("Sap_Green", "Sap Green"),
    ("Titanium_White", "Titanium White"),
    ("Van_Dyke_Brown", "Van Dyke Brown"),
    ("Yellow_Ochre", "Yellow Ochre"),
];

/// Canonical color name for a wide-format flag column, if the column is in
/// the configured vocabulary
pub fn mapped_color_name(column: &str) -> Option<&'static str> {
    COLOR_COLUMNS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, canonical)| *canonical)
}

/// Underscore-expanded form of a flag column name, used for substring
/// matching when the column is outside the configured vocabulary
pub fn expanded_column_name(column: &str) -> String {
    column.replace('_', " ")
}

/// Canonical subject name: trimmed, underscores expanded, title-cased
pub fn canonical_subject_name(column: &str) -> String {
    title_case(&expanded_column_name(column.trim()))
}

/// Title-case a name: the first letter of each alphabetic run is
/// uppercased, the rest lowercased.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;

    for c in name.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_color_columns_map_to_canonical_names() {
        assert_eq!(mapped_color_name("Alizarin_Crimson"), Some("Alizarin Crimson"));
        assert_eq!(mapped_color_name("Van_Dyke_Brown"), Some("Van Dyke Brown"));
        assert_eq!(mapped_color_name("Not_A_Color"), None);
    }

    #[test]
    fn subject_canonicalization() {
        assert_eq!(canonical_subject_name("AURORA_BOREALIS"), "Aurora Borealis");
        assert_eq!(canonical_subject_name("CIRRUS"), "Cirrus");
        assert_eq!(canonical_subject_name("mount_rushmore"), "Mount Rushmore");
    }

    #[test]
    fn title_case_handles_mixed_runs() {
        assert_eq!(title_case("dark sienna"), "Dark Sienna");
        assert_eq!(title_case("SNOW-COVERED"), "Snow-Covered");
    }
}
