//! Phone + password login decision for both roles.

/// What the store returns for a phone lookup at login time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAccount<Id> {
    pub id: Id,
    pub name: String,
    pub password_hash: String,
    pub approved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    UnknownPhone,
    InvalidPassword,
    PendingApproval,
}

impl LoginError {
    /// Flash message shown on the wholesaler login page.
    pub fn wholesaler_message(&self) -> &'static str {
        match self {
            LoginError::UnknownPhone => "Phone number not found. Please register first.",
            LoginError::InvalidPassword => "Invalid password. Please try again.",
            LoginError::PendingApproval => "Your application is still pending approval.",
        }
    }

    /// Flash message shown on the vendor login page.
    ///
    /// Vendors are not told whether the phone or the password was wrong.
    pub fn vendor_message(&self) -> &'static str {
        match self {
            LoginError::UnknownPhone | LoginError::InvalidPassword => "Invalid phone or password.",
            LoginError::PendingApproval => "Your account is pending approval.",
        }
    }
}

/// Decide a login attempt.
///
/// Checks run in order: account exists, password matches, account approved.
/// `password_matches` is only called when an account exists.
pub fn evaluate_login<Id>(
    account: Option<LoginAccount<Id>>,
    password_matches: impl FnOnce(&str) -> bool,
) -> Result<LoginAccount<Id>, LoginError> {
    let account = account.ok_or(LoginError::UnknownPhone)?;
    if !password_matches(&account.password_hash) {
        return Err(LoginError::InvalidPassword);
    }
    if !account.approved {
        return Err(LoginError::PendingApproval);
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(approved: bool) -> LoginAccount<u32> {
        LoginAccount {
            id: 7,
            name: "Mumbai Fresh Mart".into(),
            password_hash: "hash".into(),
            approved,
        }
    }

    #[test]
    fn unknown_phone_never_checks_password() {
        let err = evaluate_login::<u32>(None, |_| panic!("must not be called")).unwrap_err();
        assert_eq!(err, LoginError::UnknownPhone);
    }

    #[test]
    fn wrong_password_is_reported_before_pending_approval() {
        let err = evaluate_login(Some(account(false)), |_| false).unwrap_err();
        assert_eq!(err, LoginError::InvalidPassword);
    }

    #[test]
    fn unapproved_account_cannot_log_in() {
        let err = evaluate_login(Some(account(false)), |h| h == "hash").unwrap_err();
        assert_eq!(err, LoginError::PendingApproval);
    }

    #[test]
    fn approving_makes_login_succeed() {
        let ok = evaluate_login(Some(account(true)), |h| h == "hash").unwrap();
        assert_eq!(ok.id, 7);
    }

    #[test]
    fn vendor_messages_do_not_leak_which_field_was_wrong() {
        assert_eq!(
            LoginError::UnknownPhone.vendor_message(),
            LoginError::InvalidPassword.vendor_message()
        );
        assert_ne!(
            LoginError::UnknownPhone.wholesaler_message(),
            LoginError::InvalidPassword.wholesaler_message()
        );
    }
}
