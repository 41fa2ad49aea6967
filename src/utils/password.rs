use bcrypt::{DEFAULT_COST, hash, verify};

/// Hash un mot de passe avec bcrypt (cost 12).
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Vérifie un mot de passe contre un hash bcrypt stocké.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, stored_hash)
}

/// Politique de mot de passe: minimum 8 caractères, au moins une majuscule,
/// un chiffre et un symbole.
pub fn is_strong_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Abc123!@").unwrap();

        assert!(verify_password("Abc123!@", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("Abc123!@").unwrap();
        let h2 = hash_password("Abc123!@").unwrap();

        assert_ne!(h1, h2);
    }

    #[test]
    fn test_password_policy() {
        assert!(is_strong_password("Abc123!@"));
        assert!(is_strong_password("Sup3r$ecret"));

        // trop court
        assert!(!is_strong_password("Ab1!"));
        // pas de majuscule
        assert!(!is_strong_password("abc123!@"));
        // pas de chiffre
        assert!(!is_strong_password("Abcdef!@"));
        // pas de symbole
        assert!(!is_strong_password("Abc12345"));
    }
}
