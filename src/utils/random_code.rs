use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的字母数字随机串
pub fn generate_random_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机密码（用于初始管理员账号）
pub fn generate_password(length: usize) -> String {
    let length = length.max(12);
    loop {
        let candidate = generate_random_code(length);
        if crate::utils::validate::validate_password(&candidate).is_ok() {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_length_and_charset() {
        let code = generate_random_code(16);
        assert_eq!(code.len(), 16);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_password_passes_policy() {
        let password = generate_password(8);
        assert_eq!(password.len(), 12);
        assert!(crate::utils::validate::validate_password(&password).is_ok());
    }
}
