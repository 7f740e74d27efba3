use lexicon::normalize::for_matching;

#[test]
fn blank_input_maps_to_empty() {
    assert_eq!(for_matching(""), "");
    assert_eq!(for_matching("   "), "");
    assert_eq!(for_matching("\t\n  \r\n"), "");
}

#[test]
fn lowercases_with_turkish_casing() {
    assert_eq!(for_matching("TRAFİK"), "trafik");
    // ASCII capital I lowers to dotless ı, which the fold maps back to i.
    assert_eq!(for_matching("TRAFIK"), "trafik");
    assert_eq!(for_matching("İnternet"), "internet");
}

#[test]
fn folds_exactly_the_six_pairs() {
    assert_eq!(for_matching("çöp kutusu"), "cop kutusu");
    assert_eq!(for_matching("bağlantı"), "baglanti");
    assert_eq!(for_matching("yeşil ışık"), "yesil isik");
    assert_eq!(for_matching("ülkü öğün"), "ulku ogun");
    // Non-Turkish diacritics are not stripped; they lowercase and survive.
    assert_eq!(for_matching("café"), "café");
}

#[test]
fn punctuation_becomes_single_spaces() {
    assert_eq!(for_matching("yol, çukur!"), "yol cukur");
    assert_eq!(for_matching("wi-fi"), "wi fi");
    assert_eq!(for_matching("pm2.5"), "pm2 5");
    assert_eq!(for_matching("(hız)=[akış]"), "hiz akis");
}

#[test]
fn whitespace_collapses_and_trims() {
    assert_eq!(for_matching("  çok   yavaş \t internet \n"), "cok yavas internet");
}

#[test]
fn idempotent_on_fixed_inputs() {
    let samples = [
        "İnternet çok yavaş, wifi bağlantısı sürekli kopuyor.",
        "Parkta çöpler toplanmıyor, çok kirli.",
        "Cadde üzerinde derin çukurlar var, yol bozuk.",
        "!!!",
        "pm2.5 & smog",
        "  spaced   out  ",
    ];
    for s in samples {
        let once = for_matching(s);
        assert_eq!(for_matching(&once), once, "not idempotent for {s:?}");
    }
}

#[test]
fn idempotent_on_random_inputs() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Mixed pool: Turkish letters, ASCII, punctuation, whitespace, emoji.
    let pool: Vec<char> = "abcçdefgğhıijklmnoöprsştuüvyzABCÇDEFGĞHIİJKLMNOÖPRSŞTUÜVYZ0123456789 \t\n.,;:!?()-_/🙂☂"
        .chars()
        .collect();
    let mut rng = StdRng::seed_from_u64(0xC1A551F1);
    for _ in 0..200 {
        let len = rng.gen_range(0..80);
        let s: String = (0..len).map(|_| pool[rng.gen_range(0..pool.len())]).collect();
        let once = for_matching(&s);
        assert_eq!(for_matching(&once), once, "not idempotent for {s:?}");
        // Output alphabet: word characters separated by single spaces.
        assert!(!once.starts_with(' ') && !once.ends_with(' '));
        assert!(!once.contains("  "));
    }
}
