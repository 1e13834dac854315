//! Input validation for signup and login

use common::validation::{ValidationErrors, normalize_optional, validate_email};

use crate::models::{LoginCredentials, NewUser, SignupRequest};

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 128;
const NAME_MAX_CHARS: usize = 255;

/// Validate display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    let length = name.chars().count();
    if length < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }

    if length > NAME_MAX_CHARS {
        return Err(format!(
            "Name must be at most {NAME_MAX_CHARS} characters long"
        ));
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();
    if length < PASSWORD_MIN_CHARS {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters long"
        ));
    }

    if length > PASSWORD_MAX_CHARS {
        return Err(format!(
            "Password must be at most {PASSWORD_MAX_CHARS} characters long"
        ));
    }

    Ok(())
}

/// Emails are compared trimmed and lowercased
pub fn normalize_email(email: Option<String>) -> String {
    normalize_optional(email)
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

pub fn validate_signup(request: SignupRequest) -> Result<NewUser, ValidationErrors> {
    let name = normalize_optional(request.name).unwrap_or_default();
    let email = normalize_email(request.email);
    // Passwords are taken verbatim
    let password = request.password.unwrap_or_default();

    let mut errors = ValidationErrors::new();
    errors.check("name", validate_name(&name));
    errors.check("email", validate_email(&email));
    errors.check("password", validate_password(&password));

    errors.finish(NewUser {
        name,
        email,
        password,
    })
}

/// Shape check only; wrong credentials are reported by the login handler
pub fn validate_login(credentials: LoginCredentials) -> Result<(String, String), ValidationErrors> {
    let email = normalize_email(credentials.email);
    let password = credentials.password.unwrap_or_default();

    let mut errors = ValidationErrors::new();
    errors.check("email", validate_email(&email));
    if password.is_empty() {
        errors.add("password", "Password is required");
    }

    errors.finish((email, password))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password1").is_ok());
        assert!(validate_password(&"a".repeat(128)).is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name("A").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"n".repeat(255)).is_ok());
        assert!(validate_name(&"n".repeat(256)).is_err());
    }

    #[test]
    fn test_signup_normalizes_input() {
        let user = validate_signup(signup("  Alex Doe ", " Alex@X.com ", "hunter2hunter2")).unwrap();

        assert_eq!(user.name, "Alex Doe");
        assert_eq!(user.email, "alex@x.com");
        assert_eq!(user.password, "hunter2hunter2");
    }

    #[test]
    fn test_signup_reports_every_field() {
        let errors = validate_signup(signup(" A ", "nope", "123")).unwrap_err();

        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("password"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = validate_login(LoginCredentials::default()).unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("password"));

        let (email, password) = validate_login(LoginCredentials {
            email: Some("ALEX@x.com".to_string()),
            password: Some("whatever".to_string()),
        })
        .unwrap();
        assert_eq!(email, "alex@x.com");
        assert_eq!(password, "whatever");
    }
}
