use rand::Rng;
use rand::distr::Alphanumeric;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

/// URL 安全的随机令牌（字母数字）
pub fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 随机初始密码，保证包含大小写字母和数字
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..length.max(8))
            .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
            .collect();
        if crate::utils::validate::validate_password(&candidate).is_ok() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token(48);
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token(48));
    }

    #[test]
    fn test_generated_password_passes_policy() {
        let password = generate_password(16);
        assert_eq!(password.len(), 16);
        assert!(crate::utils::validate::validate_password(&password).is_ok());
    }
}
