/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::sasl_diag::{DiagnosticDelegate, DiagnosticsSender, UnsubscribeHandle};
use crate::sasl_mechanism::Mechanism;

/// The legacy LOGIN SASL mechanism (draft-murchison-sasl-login-00).
///
/// Two single field turns: the username in reply to the first server
/// challenge and the password in reply to the second. The challenge
/// texts themselves are ignored. The authorization identity is not
/// carried by this mechanism.
pub struct Login
{
    diag: DiagnosticsSender,

    /// The text to provide the server after the first challenge
    username: String,

    /// The text to provide the server after the second challenge
    password: String,

    /// Counts the challenges the server has given so far
    num_challenges: usize,
}

impl Login
{
    pub
    fn new() -> Self
    {
        return
            Self
            {
                diag: DiagnosticsSender::new("Login"),
                username: String::new(),
                password: String::new(),
                num_challenges: 0,
            };
    }
}

impl Mechanism for Login
{
    fn subscribe_to_diagnostics(
        &mut self,
        delegate: DiagnosticDelegate,
        min_level: usize
    ) -> UnsubscribeHandle
    {
        return self.diag.subscribe(delegate, min_level);
    }

    fn set_credentials(
        &mut self,
        credentials: &str,
        authentication_identity: &str,
        _authorization_identity: &str
    )
    {
        self.username = authentication_identity.to_string();
        self.password = credentials.to_string();
        self.num_challenges = 0;
    }

    fn get_initial_response(&mut self) -> String
    {
        self.diag.send(0, "C: AUTH LOGIN");

        return String::new();
    }

    fn proceed(&mut self, _message: &str) -> String
    {
        self.num_challenges += 1;

        match self.num_challenges
        {
            1 =>
            {
                self.diag.send(0, &format!("C: {}", self.username));

                return self.username.clone();
            },
            2 =>
            {
                self.diag.send(0, "C: *******");

                return self.password.clone();
            },
            _ => return String::new(),
        }
    }

    fn succeeded(&self) -> bool
    {
        return false;
    }

    fn faulted(&self) -> bool
    {
        return false;
    }

    fn reset(&mut self)
    {
        self.num_challenges = 0;
    }

    fn mechanism_name(&self) -> &'static str
    {
        return "LOGIN";
    }
}

#[cfg(test)]
mod tests
{
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn no_initial_response()
    {
        let mut mech = Login::new();
        mech.set_credentials("hunter2", "bob", "");

        assert_eq!(mech.get_initial_response().as_str(), "");
    }

    #[test]
    fn username_then_password_then_nothing()
    {
        let mut mech = Login::new();
        mech.set_credentials("hunter2", "bob", "");

        assert_eq!(mech.proceed("Username:").as_str(), "bob");
        assert_eq!(mech.proceed("Password:").as_str(), "hunter2");
        assert_eq!(mech.proceed("").as_str(), "");
        assert_eq!(mech.proceed("anything").as_str(), "");
    }

    #[test]
    fn challenge_text_is_ignored()
    {
        let mut mech = Login::new();
        mech.set_credentials("hunter2", "bob", "");

        assert_eq!(mech.proceed("whatever the server says").as_str(), "bob");
        assert_eq!(mech.proceed("").as_str(), "hunter2");
    }

    #[test]
    fn reset_restarts_the_sequence()
    {
        let mut mech = Login::new();
        mech.set_credentials("hunter2", "bob", "");

        let _ = mech.proceed("Username:");
        let _ = mech.proceed("Password:");

        mech.reset();

        assert_eq!(mech.proceed("Username:").as_str(), "bob");
    }

    #[test]
    fn mechanism_cannot_determine_success()
    {
        let mut mech = Login::new();
        mech.set_credentials("hunter2", "bob", "");

        assert_eq!(mech.succeeded(), false);
        let _ = mech.proceed("Username:");
        let _ = mech.proceed("Password:");
        assert_eq!(mech.succeeded(), false);
        assert_eq!(mech.faulted(), false);
    }

    #[test]
    fn diagnostics_print_username_and_redact_password()
    {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_w = log.clone();

        let mut mech = Login::new();
        let _sub =
            mech.subscribe_to_diagnostics(
                Rc::new(move |_name: &str, _level: usize, message: &str|
                    log_w.borrow_mut().push(message.to_string())
                ),
                0
            );

        mech.set_credentials("hunter2", "bob", "");
        let _ = mech.get_initial_response();
        let _ = mech.proceed("Username:");
        let _ = mech.proceed("Password:");

        assert_eq!(
            log.borrow().as_slice(),
            &[
                "C: AUTH LOGIN".to_string(),
                "C: bob".to_string(),
                "C: *******".to_string(),
            ]
        );
    }
}
