use chrono::Utc;
use rand::Rng;

const REFERRAL_PREFIX: &str = "REENT";
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `REENT` + base-36 millisecond timestamp + 6 random base-36 characters.
/// Uniqueness is left to the store's unique index on `referral_code`.
pub fn generate_referral_code() -> String {
    let timestamp = to_base36(Utc::now().timestamp_millis().max(0) as u64);

    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| BASE36_DIGITS[rng.random_range(0..BASE36_DIGITS.len())] as char)
        .collect();

    format!("{}{}{}", REFERRAL_PREFIX, timestamp, suffix).to_uppercase()
}

pub fn generate_referral_link(base_url: &str, code: &str) -> String {
    format!("{}/ref/{}", base_url.trim_end_matches('/'), code)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}

/// Privacy mask for leaderboard names, e.g. "Paul Gamaliel" -> "Paul Gam*****".
/// Middle names are dropped.
pub fn mask_user_name(full_name: &str) -> String {
    let names: Vec<&str> = full_name.split_whitespace().collect();

    match names.as_slice() {
        [] => String::new(),
        [name] => {
            let len = name.chars().count();
            if len <= 3 {
                return name.to_string();
            }
            format!("{}{}", take_chars(name, 3), "*".repeat(len - 3))
        }
        [first_name, .., last_name] => {
            let len = last_name.chars().count();
            if len <= 2 {
                return format!("{} {}", first_name, last_name);
            }
            format!(
                "{} {}{}",
                first_name,
                take_chars(last_name, 3),
                "*".repeat(len.saturating_sub(3).max(1))
            )
        }
    }
}

fn take_chars(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_single_names() {
        assert_eq!(mask_user_name("Al"), "Al");
        assert_eq!(mask_user_name("Ada"), "Ada");
        assert_eq!(mask_user_name("Alexander"), "Ale******");
    }

    #[test]
    fn test_mask_full_names() {
        assert_eq!(mask_user_name("Paul Gamaliel"), "Paul Gam*****");
        assert_eq!(mask_user_name("Jo Li"), "Jo Li");
        assert_eq!(mask_user_name("Ada Obi"), "Ada Obi*");
        assert_eq!(mask_user_name("Ngozi Adaeze Okonjo"), "Ngozi Oko***");
    }

    #[test]
    fn test_mask_blank_and_padded_names() {
        assert_eq!(mask_user_name(""), "");
        assert_eq!(mask_user_name("   "), "");
        assert_eq!(mask_user_name("  Paul   Gamaliel "), "Paul Gam*****");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        assert_eq!(mask_user_name("Ọlámídé"), "Ọlá****");
    }

    #[test]
    fn test_referral_code_shape() {
        let code = generate_referral_code();

        assert!(code.starts_with("REENT"));
        assert_eq!(code, code.to_uppercase());
        assert!(code[5..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(code.len(), 5 + 8 + 6);
    }

    #[test]
    fn test_referral_codes_differ() {
        assert_ne!(generate_referral_code(), generate_referral_code());
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_referral_link() {
        assert_eq!(
            generate_referral_link("https://reent.com/", "REENTABC"),
            "https://reent.com/ref/REENTABC"
        );
    }
}
