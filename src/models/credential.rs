// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login credentials.

use serde::{Deserialize, Serialize};

/// Password login for one account.
///
/// Stored at: `credentials/{email}` so an email can be registered only once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Normalized email (document ID)
    pub email: String,
    /// Account the credential signs in as
    pub user_id: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Canonical form used as the credential key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Priya@Example.COM "), "priya@example.com");
    }
}
