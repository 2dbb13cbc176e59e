/// Longest accepted chirp, in characters.
pub const MAX_CHIRP_LEN: usize = 140;

const BANNED: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Mask banned words. Words are split on single spaces and compared
/// case-insensitively; anything with punctuation attached is left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if BANNED.contains(&lowered.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_too_long(body: &str) -> bool {
    body.chars().count() > MAX_CHIRP_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_banned_words_any_case() {
        assert_eq!(
            clean_body("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(clean_body("Sharbert and FORNAX"), "**** and ****");
    }

    #[test]
    fn leaves_punctuated_words_and_spacing() {
        assert_eq!(clean_body("Sharbert! is  fine"), "Sharbert! is  fine");
    }

    #[test]
    fn length_counts_characters() {
        assert!(!is_too_long(&"a".repeat(MAX_CHIRP_LEN)));
        assert!(is_too_long(&"a".repeat(MAX_CHIRP_LEN + 1)));
        assert!(!is_too_long(&"é".repeat(MAX_CHIRP_LEN)));
    }
}
