use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const COMMON_PASSWORDS: [&str; 9] = [
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "abcd1234",
    "letmein1",
    "welcome1",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 邮箱统一去空白、转小写后存储与比较
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 密码策略：至少 8 位，包含大小写字母和数字，且不在常见弱密码表中
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut errors: Vec<&str> = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
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

/// 必填文本：去除首尾空白后非空且不超过 max_chars，返回去空白后的值
pub fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!("{field} must be at most {max_chars} characters"));
    }
    Ok(trimmed.to_string())
}

/// 可选文本：空白视为未填写
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 分数范围 0..=100
pub fn validate_score(score: Option<f64>) -> Result<(), &'static str> {
    match score {
        Some(s) if !s.is_finite() || !(0.0..=100.0).contains(&s) => {
            Err("Score must be between 0 and 100")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("parent@school.org").is_ok());
        assert!(validate_email("a.b+c@sub.example.co").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("x@y").is_err());
        assert_eq!(normalize_email("  Mom@Example.COM "), "mom@example.com");
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());

        let err = validate_password("abc").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
        assert!(err.contains("digit"));

        let err = validate_password("Password1").unwrap_err();
        assert!(err.contains("too common"));
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("Name", "  Ann ", 50).unwrap(), "Ann");
        assert_eq!(
            required_text("Content", "   ", 50).unwrap_err(),
            "Content is required"
        );
        assert!(required_text("Title", "abcdef", 5).is_err());
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" 3A ".to_string())).as_deref(), Some("3A"));
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score(None).is_ok());
        assert!(validate_score(Some(0.0)).is_ok());
        assert!(validate_score(Some(100.0)).is_ok());
        assert!(validate_score(Some(100.5)).is_err());
        assert!(validate_score(Some(-1.0)).is_err());
        assert!(validate_score(Some(f64::NAN)).is_err());
    }
}
