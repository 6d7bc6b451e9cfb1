pub const NO_MAPS_PLACEHOLDER: &str = "(no maps)";

/// `DM` in any case, then `-` or an uppercase letter: covers both
/// `DM-Deck16` and `DMDeck16` style names.
pub fn is_deathmatch_map(name: &str) -> bool {
    let mut chars = name.chars();
    let prefix_matches = matches!(
        (chars.next(), chars.next()),
        (Some(d), Some(m)) if d.eq_ignore_ascii_case(&'d') && m.eq_ignore_ascii_case(&'m')
    );
    prefix_matches && matches!(chars.next(), Some(c) if c == '-' || c.is_ascii_uppercase())
}

pub fn deathmatch_maps(names: &[String]) -> Vec<String> {
    let mut maps: Vec<String> = names
        .iter()
        .filter(|name| is_deathmatch_map(name))
        .cloned()
        .collect();
    maps.sort();
    maps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rules() {
        assert!(is_deathmatch_map("DM-Deck16]["));
        assert!(is_deathmatch_map("dm-Morpheus"));
        assert!(is_deathmatch_map("DMCurse"));
        assert!(!is_deathmatch_map("DMcurse"));
        assert!(!is_deathmatch_map("CTF-Face"));
        assert!(!is_deathmatch_map("DM"));
        assert!(!is_deathmatch_map(""));
    }

    #[test]
    fn filtered_list_is_sorted() {
        let names: Vec<String> = ["DM-Tempest", "CTF-Face", "DM-Codex", "Entry", "DMAriza"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            deathmatch_maps(&names),
            vec!["DM-Codex", "DM-Tempest", "DMAriza"]
        );
    }
}
