//! # 비밀번호 해싱 서비스
//!
//! Argon2id로 비밀번호를 해싱/검증합니다.
//! 해시 문자열(PHC 포맷)에 알고리즘, 파라미터, 솔트가 모두 들어 있으므로
//! 별도의 솔트 컬럼이 필요 없습니다.
//!
//! 예: `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// 평문 비밀번호를 Argon2id PHC 문자열로 해싱합니다.
///
/// 호출할 때마다 새 솔트를 생성하므로 같은 비밀번호라도 결과가 매번 다릅니다.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}

/// 평문 비밀번호가 저장된 해시와 일치하는지 확인합니다.
///
/// # 반환값
/// - `Ok(true)` / `Ok(false)`: 일치 여부
/// - `Err(AppError::Internal)`: 저장된 해시가 PHC 포맷이 아닌 경우
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("123456").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let err = verify_password("secret", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
