//! OTP generation.
//!
//! Codes are drawn from a configurable alphabet with the thread-local CSPRNG;
//! the same generator serves the alphanumeric reset codes and the digits-only
//! verification codes.

use rand::Rng;

/// Character set an OTP is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Lower/upper alphanumeric, the default for password-reset codes.
    pub fn alphanumeric() -> Self {
        let chars = ('0' ..= '9').chain('A' ..= 'Z').chain('a' ..= 'z').collect();
        Self(chars)
    }

    /// Decimal digits, the default for email-verification codes.
    pub fn digits() -> Self {
        Self(('0' ..= '9').collect())
    }

    /// Custom alphabet from the configured character string. Duplicate
    /// characters are dropped so they cannot skew the distribution.
    pub fn custom(chars: &str) -> Option<Self> {
        let mut seen = Vec::new();
        for c in chars.chars() {
            if !seen.contains(&c) {
                seen.push(c);
            }
        }
        if seen.is_empty() {
            None
        }
        else {
            Some(Self(seen))
        }
    }

    /// Whether the code uses only characters of this alphabet.
    pub fn spans(&self, code: &str) -> bool {
        code.chars().all(|c| self.0.contains(&c))
    }

    fn chars(&self) -> &[char] {
        &self.0
    }
}

/// Generate a random OTP of exactly `length` characters drawn uniformly from
/// `alphabet`.
///
/// Uses the thread-local CSPRNG; suitable for secrets.
pub fn generate(length: usize, alphabet: &Alphabet) -> String {
    let chars = alphabet.chars();
    let mut rng = rand::rng();

    (0 .. length).map(|_| chars[rng.random_range(0 .. chars.len())]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_exact_length() {
        let alphabet = Alphabet::alphanumeric();
        for length in [1, 6, 8, 21, 64] {
            assert_eq!(generate(length, &alphabet).chars().count(), length);
        }
    }

    #[test]
    fn test_digits_otp_uses_only_digits() {
        let alphabet = Alphabet::digits();
        for _ in 0 .. 200 {
            let code = generate(6, &alphabet);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "bad code: {code}");
        }
    }

    #[test]
    fn test_generate_is_not_deterministic() {
        let alphabet = Alphabet::alphanumeric();
        let codes: std::collections::HashSet<String> = (0 .. 10_000).map(|_| generate(21, &alphabet)).collect();
        // 21 alphanumeric chars: collisions across 10k draws would indicate a
        // broken random source.
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn test_custom_alphabet() {
        let alphabet = Alphabet::custom("abc123").unwrap();
        let code = generate(32, &alphabet);
        assert!(alphabet.spans(&code));
        assert!(!Alphabet::digits().spans("12a4"));
    }

    #[test]
    fn test_custom_alphabet_dedupes() {
        let alphabet = Alphabet::custom("aaab").unwrap();
        assert_eq!(alphabet, Alphabet::custom("ab").unwrap());
    }

    #[test]
    fn test_empty_custom_alphabet_rejected() {
        assert!(Alphabet::custom("").is_none());
    }
}
