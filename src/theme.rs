const PALETTE: [(&str, &str); 4] = [
    ("blue", "#4F8EF7"),
    ("purple", "#8A2BE2"),
    ("green", "#00C851"),
    ("orange", "#FF8800"),
];

pub fn theme_hex(color: &str) -> &'static str {
    PALETTE
        .iter()
        .find(|(name, _)| *name == color)
        .map_or(PALETTE[0].1, |(_, hex)| *hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_tags() {
        assert_eq!(theme_hex("green"), "#00C851");
        assert_eq!(theme_hex("teal"), "#4F8EF7");
    }
}
