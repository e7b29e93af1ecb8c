use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 学校代码、科目代码、学号、工号
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_/-]*$").expect("Invalid code regex"));

// 功能开关键：小写字母开头
static FLAG_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_.-]{1,63}$").expect("Invalid flag key regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 -]{5,19}$").expect("Invalid phone regex"));

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "welcome1",
    "school123",
];

/// 必填字符串：去除首尾空白后不能为空
pub fn require_non_blank(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !(3..=32).contains(&username.chars().count()) {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may only contain letters, digits, '.', '_' or '-'");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_code(field: &str, code: &str) -> Result<(), String> {
    if code.len() > 32 || !CODE_RE.is_match(code) {
        return Err(format!(
            "{field} must be 1-32 characters of letters, digits, '_', '-' or '/'"
        ));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_flag_key(key: &str) -> Result<(), &'static str> {
    if !FLAG_KEY_RE.is_match(key) {
        return Err("Feature flag key must be 2-64 lowercase letters, digits, '_', '.' or '-'");
    }
    Ok(())
}

/// 密码策略：至少 8 位，包含大小写字母和数字，且不是常见弱密码
pub fn validate_password(password: &str) -> Result<(), String> {
    let checks: [(bool, &str); 4] = [
        (
            password.chars().count() >= 8,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
    ];

    let mut errors: Vec<&str> = checks
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| *msg)
        .collect();

    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("j.doe").is_ok());
        assert!(validate_username("teacher_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("-leading").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("admin@school.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_codes_and_phones() {
        assert!(validate_code("code", "GHS-01").is_ok());
        assert!(validate_code("code", "2024/A-17").is_ok());
        assert!(validate_code("code", "bad code").is_err());
        assert!(validate_phone("+44 20 7946 0958").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_flag_keys() {
        assert!(validate_flag_key("new_gradebook").is_ok());
        assert!(validate_flag_key("sms.reminders-v2").is_ok());
        assert!(validate_flag_key("NewGradebook").is_err());
        assert!(validate_flag_key("9lives").is_err());
        assert!(validate_flag_key("x").is_err());
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(require_non_blank("name", "  Hill ").unwrap(), "Hill");
        assert_eq!(
            require_non_blank("name", "   ").unwrap_err(),
            "name is required"
        );
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());
        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
        assert!(validate_password("Password1").unwrap_err().contains("too common"));
    }
}
