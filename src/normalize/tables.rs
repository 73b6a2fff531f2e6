//! Character fold tables.
//!
//! One ordered list of fold attempts, first success wins; `fold_single`
//! fixes the order. Tables are match arms rather than data files so the
//! compiler checks exhaustiveness of ranges and overlaps stay visible in
//! review.

// ===== Voicing marks =====

/// Dakuten variants: combining, spacing, half-width.
pub fn is_dakuten(c: char) -> bool {
    matches!(c, '\u{3099}' | '\u{309B}' | '\u{FF9E}')
}

/// Handakuten variants: combining, spacing, half-width.
pub fn is_handakuten(c: char) -> bool {
    matches!(c, '\u{309A}' | '\u{309C}' | '\u{FF9F}')
}

/// Compose a kana base with a (han)dakuten into its canonical glyph.
///
/// Returns the precomposed scalar where Unicode has one (が, ヴ, ぱ, ...);
/// for bases without a precomposed form (ゐ, ゑ, small kana) the canonical
/// combining sequence `base + U+3099/U+309A`. Returns `None` when the base
/// takes no voicing mark, in which case the caller falls back to folding
/// the base alone.
pub fn compose_voiced(base: char, handakuten: bool) -> Option<String> {
    // Half-width bases compose through their full-width form.
    let base = halfwidth_to_katakana(base).unwrap_or(base);

    if handakuten {
        let composed = match base {
            'は' => 'ぱ',
            'ひ' => 'ぴ',
            'ふ' => 'ぷ',
            'へ' => 'ぺ',
            'ほ' => 'ぽ',
            'ハ' => 'パ',
            'ヒ' => 'ピ',
            'フ' => 'プ',
            'ヘ' => 'ペ',
            'ホ' => 'ポ',
            _ => {
                return is_kana(base).then(|| format!("{}\u{309A}", to_hiragana_scalar(base)));
            }
        };
        return Some(composed.to_string());
    }

    let composed = match base {
        'か' => 'が',
        'き' => 'ぎ',
        'く' => 'ぐ',
        'け' => 'げ',
        'こ' => 'ご',
        'さ' => 'ざ',
        'し' => 'じ',
        'す' => 'ず',
        'せ' => 'ぜ',
        'そ' => 'ぞ',
        'た' => 'だ',
        'ち' => 'ぢ',
        'つ' => 'づ',
        'て' => 'で',
        'と' => 'ど',
        'は' => 'ば',
        'ひ' => 'び',
        'ふ' => 'ぶ',
        'へ' => 'べ',
        'ほ' => 'ぼ',
        'う' => 'ゔ',
        'カ' => 'ガ',
        'キ' => 'ギ',
        'ク' => 'グ',
        'ケ' => 'ゲ',
        'コ' => 'ゴ',
        'サ' => 'ザ',
        'シ' => 'ジ',
        'ス' => 'ズ',
        'セ' => 'ゼ',
        'ソ' => 'ゾ',
        'タ' => 'ダ',
        'チ' => 'ヂ',
        'ツ' => 'ヅ',
        'テ' => 'デ',
        'ト' => 'ド',
        'ハ' => 'バ',
        'ヒ' => 'ビ',
        'フ' => 'ブ',
        'ヘ' => 'ベ',
        'ホ' => 'ボ',
        'ウ' => 'ヴ',
        'ワ' => 'ヷ',
        'ヰ' => 'ヸ',
        'ヱ' => 'ヹ',
        'ヲ' => 'ヺ',
        _ => {
            return is_kana(base).then(|| format!("{}\u{3099}", to_hiragana_scalar(base)));
        }
    };
    Some(composed.to_string())
}

fn is_kana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{3096}' | '\u{30A1}'..='\u{30FA}')
}

/// Katakana scalar to its hiragana counterpart where one exists.
fn to_hiragana_scalar(c: char) -> char {
    if ('\u{30A1}'..='\u{30F6}').contains(&c) {
        char::from_u32(c as u32 - 0x60).expect("offset stays in hiragana block")
    } else {
        c
    }
}

// ===== Width and script folds =====

/// Half-width katakana (U+FF66..U+FF9D) to full-width, marks excluded.
pub fn halfwidth_to_katakana(c: char) -> Option<char> {
    let folded = match c {
        'ｦ' => 'ヲ',
        'ｧ' => 'ァ',
        'ｨ' => 'ィ',
        'ｩ' => 'ゥ',
        'ｪ' => 'ェ',
        'ｫ' => 'ォ',
        'ｬ' => 'ャ',
        'ｭ' => 'ュ',
        'ｮ' => 'ョ',
        'ｯ' => 'ッ',
        'ｱ' => 'ア',
        'ｲ' => 'イ',
        'ｳ' => 'ウ',
        'ｴ' => 'エ',
        'ｵ' => 'オ',
        'ｶ' => 'カ',
        'ｷ' => 'キ',
        'ｸ' => 'ク',
        'ｹ' => 'ケ',
        'ｺ' => 'コ',
        'ｻ' => 'サ',
        'ｼ' => 'シ',
        'ｽ' => 'ス',
        'ｾ' => 'セ',
        'ｿ' => 'ソ',
        'ﾀ' => 'タ',
        'ﾁ' => 'チ',
        'ﾂ' => 'ツ',
        'ﾃ' => 'テ',
        'ﾄ' => 'ト',
        'ﾅ' => 'ナ',
        'ﾆ' => 'ニ',
        'ﾇ' => 'ヌ',
        'ﾈ' => 'ネ',
        'ﾉ' => 'ノ',
        'ﾊ' => 'ハ',
        'ﾋ' => 'ヒ',
        'ﾌ' => 'フ',
        'ﾍ' => 'ヘ',
        'ﾎ' => 'ホ',
        'ﾏ' => 'マ',
        'ﾐ' => 'ミ',
        'ﾑ' => 'ム',
        'ﾒ' => 'メ',
        'ﾓ' => 'モ',
        'ﾔ' => 'ヤ',
        'ﾕ' => 'ユ',
        'ﾖ' => 'ヨ',
        'ﾗ' => 'ラ',
        'ﾘ' => 'リ',
        'ﾙ' => 'ル',
        'ﾚ' => 'レ',
        'ﾛ' => 'ロ',
        'ﾜ' => 'ワ',
        'ﾝ' => 'ン',
        _ => return None,
    };
    Some(folded)
}

/// Katakana to hiragana, including the voiced W-row which has no
/// precomposed hiragana (those fold to a combining sequence).
fn fold_kana(c: char) -> Option<String> {
    // Full-width katakana block maps by fixed offset.
    if ('\u{30A1}'..='\u{30F6}').contains(&c) {
        let shifted = char::from_u32(c as u32 - 0x60).expect("offset stays in hiragana block");
        return Some(shifted.to_string());
    }
    match c {
        'ヷ' => Some("わ\u{3099}".to_string()),
        'ヸ' => Some("ゐ\u{3099}".to_string()),
        'ヹ' => Some("ゑ\u{3099}".to_string()),
        'ヺ' => Some("を\u{3099}".to_string()),
        'ｰ' => Some("-".to_string()),
        _ => halfwidth_to_katakana(c).and_then(fold_kana),
    }
}

/// Full-width ASCII letters to ASCII lowercase.
fn fold_fullwidth_letter(c: char) -> Option<char> {
    match c {
        '\u{FF21}'..='\u{FF3A}' => char::from_u32(c as u32 - 0xFF21 + 'a' as u32),
        '\u{FF41}'..='\u{FF5A}' => char::from_u32(c as u32 - 0xFF41 + 'a' as u32),
        _ => None,
    }
}

/// Full-width digits to ASCII digits.
pub fn fold_fullwidth_digit(c: char) -> Option<char> {
    match c {
        '\u{FF10}'..='\u{FF19}' => char::from_u32(c as u32 - 0xFF10 + '0' as u32),
        _ => None,
    }
}

/// Superscript, subscript, circled and parenthesized numerals to their
/// decimal digit strings.
fn fold_numeral(c: char) -> Option<&'static str> {
    const ONE_TO_TWENTY: [&str; 20] = [
        "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16",
        "17", "18", "19", "20",
    ];
    let folded = match c {
        '⁰' => "0",
        '¹' => "1",
        '²' => "2",
        '³' => "3",
        '⁴' => "4",
        '⁵' => "5",
        '⁶' => "6",
        '⁷' => "7",
        '⁸' => "8",
        '⁹' => "9",
        '₀' => "0",
        '₁' => "1",
        '₂' => "2",
        '₃' => "3",
        '₄' => "4",
        '₅' => "5",
        '₆' => "6",
        '₇' => "7",
        '₈' => "8",
        '₉' => "9",
        '⓪' | '〇' => "0",
        // Circled ①..⑳ and parenthesized ⑴..⒇ share the 1..20 sequence.
        '\u{2460}'..='\u{2473}' => ONE_TO_TWENTY[c as usize - 0x2460],
        '\u{2474}'..='\u{2487}' => ONE_TO_TWENTY[c as usize - 0x2474],
        _ => return None,
    };
    Some(folded)
}

/// CJK punctuation, full-width symbols and typographic marks to ASCII.
fn fold_symbol(c: char) -> Option<&'static str> {
    let folded = match c {
        // Long-sound mark and the dash family.
        'ー' | '－' => "-",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => "-",
        '−' => "-",
        '～' | '〜' => "~",
        // Full-width ASCII symbols.
        '／' => "/",
        '＼' => "\\",
        '：' => ":",
        '；' => ";",
        '，' => ",",
        '．' => ".",
        '！' => "!",
        '？' => "?",
        '＂' => "\"",
        '＇' => "'",
        '｀' => "`",
        '＾' => "^",
        '＿' => "_",
        '＝' => "=",
        '＋' => "+",
        '＊' => "*",
        '＃' => "#",
        '＄' => "$",
        '％' => "%",
        '＆' => "&",
        '＠' => "@",
        '｜' => "|",
        '＜' => "<",
        '＞' => ">",
        '（' => "(",
        '）' => ")",
        '［' => "[",
        '］' => "]",
        '｛' => "{",
        '｝' => "}",
        // CJK punctuation.
        '、' => ",",
        '。' => ".",
        '・' => ".",
        '「' | '」' | '『' | '』' => "\"",
        '【' => "[",
        '】' => "]",
        '〈' | '《' => "<",
        '〉' | '》' => ">",
        // Typographic quotes.
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        // Spaces.
        '\u{3000}' | '\u{00A0}' => " ",
        _ => return None,
    };
    Some(folded)
}

/// Accented Latin letters, lowercased and stripped or substituted.
///
/// German umlauts and sharp s expand to their substitution spellings so
/// `ae`/`oe`/`ue`/`ss` queries find them; everything else folds to the
/// bare base letter.
fn fold_accented(c: char) -> Option<&'static str> {
    let folded = match c {
        // German substitution spellings.
        'ä' | 'Ä' => "ae",
        'ö' | 'Ö' => "oe",
        'ü' | 'Ü' => "ue",
        'ß' | 'ẞ' => "ss",
        // Ligatures and Scandinavian.
        'œ' | 'Œ' => "oe",
        'æ' | 'Æ' => "ae",
        'å' | 'Å' => "a",
        'ø' | 'Ø' => "o",
        // French.
        'à' | 'À' | 'â' | 'Â' => "a",
        'é' | 'É' | 'è' | 'È' | 'ê' | 'Ê' | 'ë' | 'Ë' => "e",
        'î' | 'Î' | 'ï' | 'Ï' => "i",
        'ô' | 'Ô' => "o",
        'ù' | 'Ù' | 'û' | 'Û' => "u",
        'ç' | 'Ç' => "c",
        'ÿ' | 'Ÿ' => "y",
        // Iberian and Italian.
        'á' | 'Á' => "a",
        'í' | 'Í' => "i",
        'ó' | 'Ó' => "o",
        'ú' | 'Ú' => "u",
        'ñ' | 'Ñ' => "n",
        'ã' | 'Ã' => "a",
        'õ' | 'Õ' => "o",
        'ì' | 'Ì' => "i",
        'ò' | 'Ò' => "o",
        // Czech and Slovak.
        'č' | 'Č' => "c",
        'š' | 'Š' => "s",
        'ž' | 'Ž' => "z",
        'ř' | 'Ř' => "r",
        'ď' | 'Ď' => "d",
        'ť' | 'Ť' => "t",
        'ň' | 'Ň' => "n",
        'ě' | 'Ě' => "e",
        'ů' | 'Ů' => "u",
        'ý' | 'Ý' => "y",
        'ĺ' | 'Ĺ' | 'ľ' | 'Ľ' => "l",
        // Polish.
        'ą' | 'Ą' => "a",
        'ć' | 'Ć' => "c",
        'ę' | 'Ę' => "e",
        'ł' | 'Ł' => "l",
        'ń' | 'Ń' => "n",
        'ś' | 'Ś' => "s",
        'ź' | 'Ź' | 'ż' | 'Ż' => "z",
        // Romanian.
        'ă' | 'Ă' => "a",
        'ș' | 'Ș' | 'ş' | 'Ş' => "s",
        'ț' | 'Ț' | 'ţ' | 'Ţ' => "t",
        _ => return None,
    };
    Some(folded)
}

/// Letters whose fold has a multi-codepoint substitution spelling.
///
/// A query containing any of these is taken as an explicit spelling and is
/// not expanded further.
pub fn has_substitution_expansion(c: char) -> bool {
    matches!(
        c,
        'ä' | 'Ä' | 'ö' | 'Ö' | 'ü' | 'Ü' | 'ß' | 'ẞ' | 'œ' | 'Œ' | 'æ' | 'Æ'
    )
}

// ===== The ordered fold =====

/// Apply the first matching single-codepoint fold, if any.
///
/// Order is load-bearing and fixed here: full-width letters, full-width
/// digits, numeral glyphs, kana, symbols, ASCII case, accented Latin.
pub fn fold_single(c: char) -> Option<String> {
    if let Some(letter) = fold_fullwidth_letter(c) {
        return Some(letter.to_string());
    }
    if let Some(digit) = fold_fullwidth_digit(c) {
        return Some(digit.to_string());
    }
    if let Some(digits) = fold_numeral(c) {
        return Some(digits.to_string());
    }
    if let Some(kana) = fold_kana(c) {
        return Some(kana);
    }
    if let Some(symbol) = fold_symbol(c) {
        return Some(symbol.to_string());
    }
    if c.is_ascii_uppercase() {
        return Some(c.to_ascii_lowercase().to_string());
    }
    fold_accented(c).map(str::to_string)
}

// ===== Tests =====
