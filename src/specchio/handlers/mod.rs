pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_confirm;
pub use self::user_confirm::confirm;

pub mod user_resend_code;
pub use self::user_resend_code::resend_code;

pub mod user_login;
pub use self::user_login::login;

pub mod user_delete;
pub use self::user_delete::delete_user;

// common functions for the handlers
use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("a@x.com"));
        assert!(valid_email("alice+tag@sub.example.org"));
        assert!(!valid_email("alice"));
        assert!(!valid_email("alice@"));
        assert!(!valid_email("a lice@x.com"));
        assert!(!valid_email("alice@x"));
        assert!(!valid_email(""));
    }
}
