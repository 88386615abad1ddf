/*-
 * Sasl-rs - a client side SASL authentification library
 * Copyright (C) 2021-2022  Aleksandr Morozov
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::sasl_diag::{DiagnosticDelegate, UnsubscribeHandle};

/// A common interface to all client side SASL (RFC 4422) mechanisms.
///
/// A mechanism is a small state machine which is driven by the caller:
/// credentials are set once per authentification attempt, then server
/// messages are fed one at a time while the mechanism produces the
/// client messages to transmit. All inputs and outputs are octet
/// strings; a caller which operates over a text transport (i.e SMTP)
/// is responsible for any base64 wrapping the outer protocol imposes.
///
/// The trait is object safe, so a protocol driver may hold the picked
/// mechanism as `Box<dyn Mechanism>`.
pub trait Mechanism
{
    /// Forms a new subscription to diagnostic messages published by the
    /// mechanism. Credential bearing fields are redacted before being
    /// published.
    ///
    /// # Arguments
    ///
    /// * `delegate` - a function to call to deliver messages to the
    ///                 subscriber.
    ///
    /// * `min_level` - the minimum level of message that this subscriber
    ///                 desires to receive.
    ///
    /// # Returns
    ///
    /// * [UnsubscribeHandle] which may be used to terminate the
    ///                 subscription. Terminating it twice is a no-op.
    fn subscribe_to_diagnostics(
        &mut self,
        delegate: DiagnosticDelegate,
        min_level: usize
    ) -> UnsubscribeHandle;

    /// Sets the identities and credentials to use in the
    /// authentification. Replaces any previously set credentials.
    ///
    /// # Arguments
    ///
    /// * `credentials` - the information the client uses to authenticate
    ///                 (i.e a password).
    ///
    /// * `authentication_identity` - the identity to associate with the
    ///                 credentials.
    ///
    /// * `authorization_identity` - the identity to "act as". If empty,
    ///                 the client requests to act as the identity the
    ///                 server associates with the credentials.
    fn set_credentials(
        &mut self,
        credentials: &str,
        authentication_identity: &str,
        authorization_identity: &str
    );

    /// Returns the initial response the client should send along with
    /// the authentification request, or an empty string if this
    /// mechanism does not send one.
    fn get_initial_response(&mut self) -> String;

    /// Consumes the next message received from the server and produces
    /// the next message to send back.
    ///
    /// # Arguments
    ///
    /// * `message` - the next message received from the server, already
    ///                 stripped of any transport encoding.
    ///
    /// # Returns
    ///
    /// * The next message to send to the server. If empty, the exchange
    ///                 is complete from the client's perspective.
    fn proceed(&mut self, message: &str) -> String;

    /// Returns true if the mechanism has positive evidence that the
    /// exchange authenticated the client. A false value is not negative
    /// evidence; it simply means the mechanism does not know.
    fn succeeded(&self) -> bool;

    /// Returns true if the mechanism has determined that the server gave
    /// an unexpected response or violated the protocol.
    fn faulted(&self) -> bool;

    /// Returns the mechanism to a state suitable for re-running with the
    /// same credentials, where supported.
    fn reset(&mut self);

    /// The SASL registry name of the mechanism, i.e "PLAIN" or
    /// "SCRAM-SHA-256".
    fn mechanism_name(&self) -> &'static str;
}
