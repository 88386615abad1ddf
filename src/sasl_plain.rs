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

/// The PLAIN SASL mechanism (RFC 4616).
///
/// The whole exchange is one record `authzid NUL authcid NUL passwd`
/// which is sent either as the initial response or in reply to the
/// first (empty) server challenge, whichever the outer protocol allows.
pub struct Plain
{
    diag: DiagnosticsSender,

    /// The credentials record to provide to the server
    encoded_credentials: String,

    /// Same record with the password replaced for diagnostics
    redacted_credentials: String,

    /// Whether the record was already sent via [Mechanism::proceed]
    credentials_sent: bool,
}

impl Plain
{
    pub
    fn new() -> Self
    {
        return
            Self
            {
                diag: DiagnosticsSender::new("Plain"),
                encoded_credentials: String::new(),
                redacted_credentials: String::new(),
                credentials_sent: false,
            };
    }
}

impl Mechanism for Plain
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
        authorization_identity: &str
    )
    {
        self.encoded_credentials =
            [
                authorization_identity,
                "\0",
                authentication_identity,
                "\0",
                credentials,
            ].concat();

        self.redacted_credentials =
            [
                authorization_identity,
                "\\0",
                authentication_identity,
                "\\0",
                "*******",
            ].concat();

        self.credentials_sent = false;
    }

    fn get_initial_response(&mut self) -> String
    {
        self.diag.send(0, &format!("C: AUTH PLAIN {}", self.redacted_credentials));

        return self.encoded_credentials.clone();
    }

    fn proceed(&mut self, _message: &str) -> String
    {
        if self.credentials_sent == true
        {
            return String::new();
        }
        else
        {
            self.credentials_sent = true;

            return self.encoded_credentials.clone();
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
        self.credentials_sent = false;
    }

    fn mechanism_name(&self) -> &'static str
    {
        return "PLAIN";
    }
}

#[cfg(test)]
mod tests
{
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn credentials_in_initial_response()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "");

        let line = mech.get_initial_response();

        assert_eq!(line.as_str(), "\0bob\0hunter2");
        assert_eq!(line.len(), 12);
    }

    #[test]
    fn credentials_including_authorization_identity()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "alex");

        let line = mech.get_initial_response();

        assert_eq!(line.as_str(), "alex\0bob\0hunter2");
        assert_eq!(line.len(), 16);
    }

    #[test]
    fn credentials_after_empty_server_message()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "");

        let line = mech.proceed("");

        assert_eq!(line.as_str(), "\0bob\0hunter2");
    }

    #[test]
    fn proceed_after_credentials_sent()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "");

        let _ = mech.proceed("");
        let line = mech.proceed("");

        assert_eq!(line.as_str(), "");
    }

    #[test]
    fn reset_allows_resend()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "");

        let _ = mech.proceed("");
        mech.reset();

        assert_eq!(mech.proceed("").as_str(), "\0bob\0hunter2");
    }

    #[test]
    fn mechanism_cannot_determine_success()
    {
        let mut mech = Plain::new();
        mech.set_credentials("hunter2", "bob", "");

        assert_eq!(mech.succeeded(), false);

        let _ = mech.proceed("");

        assert_eq!(mech.succeeded(), false);
        assert_eq!(mech.faulted(), false);
    }

    #[test]
    fn diagnostics_redact_password()
    {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_w = log.clone();

        let mut mech = Plain::new();
        let _sub =
            mech.subscribe_to_diagnostics(
                Rc::new(move |_name: &str, _level: usize, message: &str|
                    log_w.borrow_mut().push(message.to_string())
                ),
                0
            );

        mech.set_credentials("hunter2", "bob", "alex");
        let _ = mech.get_initial_response();

        assert_eq!(log.borrow().as_slice(), &["C: AUTH PLAIN alex\\0bob\\0*******".to_string()]);
    }
}
