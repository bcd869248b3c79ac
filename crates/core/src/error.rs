// Error types shared by collaborator traits

use thiserror::Error;

/// Why a registration could not be completed.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another account already uses this email.
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// Storage or hashing failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            RegistrationError::EmailAlreadyExists.to_string(),
            "Email already exists"
        );
        let other = RegistrationError::from(anyhow::anyhow!("disk full"));
        assert_eq!(other.to_string(), "disk full");
    }
}
