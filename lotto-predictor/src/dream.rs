/// Dictionnaire des rêves : mot-clé → numéros associés.
pub const DREAM_LEXICON: &[(&str, &[u8])] = &[
    ("꿈", &[1, 10, 20]),
    ("돼지", &[8, 12, 45]),
    ("조상", &[1, 3, 5]),
    ("불", &[7, 14, 21]),
    ("물", &[2, 11, 22]),
    ("돈", &[10, 25, 40]),
    ("똥", &[15, 30, 45]),
    ("뱀", &[4, 13, 31]),
    ("용", &[5, 14, 23]),
    ("호랑이", &[3, 12, 21]),
    ("죽음", &[4, 44]),
    ("보석", &[10, 11, 12]),
    ("하늘", &[6, 16, 26]),
    ("바다", &[2, 12, 22, 32, 42]),
];

/// Mots-clés du lexique présents dans le texte (sous-chaîne exacte, sensible à la casse).
pub fn matched_keywords(text: &str) -> Vec<&'static str> {
    if text.is_empty() {
        return Vec::new();
    }
    DREAM_LEXICON
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(keyword, _)| *keyword)
        .collect()
}

/// Union sans doublon des numéros associés aux mots-clés trouvés, dans l'ordre du lexique.
pub fn analyze_dream(text: &str) -> Vec<u8> {
    let mut numbers: Vec<u8> = Vec::new();
    if text.is_empty() {
        return numbers;
    }
    for (keyword, associated) in DREAM_LEXICON {
        if !text.contains(keyword) {
            continue;
        }
        for &n in associated.iter() {
            if !numbers.contains(&n) {
                numbers.push(n);
            }
        }
    }
    numbers
}
