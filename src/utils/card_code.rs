use rand::Rng;

const CODE_LEN: usize = 8;
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789"; // no 0/O/1/I

/// Generates a card code like "QC-7KX2M9PA". Uniqueness is enforced by the
/// database index; callers retry on collision.
pub fn generate_card_code() -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("QC-{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_card_code_format() {
        let code = generate_card_code();
        assert_eq!(code.len(), 3 + CODE_LEN);
        assert!(code.starts_with("QC-"));
        assert!(code[3..]
            .bytes()
            .all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_codes_avoid_ambiguous_chars() {
        for _ in 0..100 {
            let code = generate_card_code();
            assert!(!code[3..].contains(['0', 'O', '1', 'I']));
        }
    }
}
