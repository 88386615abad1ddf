use std::num::NonZeroU32;

use base64::Engine;
use base64::engine::general_purpose;

use crate::sasl_error::{SaslResult, SaslRuntimeError, SaslErrorCode};
use crate::{sasl_error, sasl_error_map};
use crate::scram_common::ScramCommon;

/// The recognized fields of the server-first-message. The syntax is
/// (RFC 5802):
///
/// server-first-message = [reserved-mext ","] nonce "," salt ","
///                       iteration-count ["," extensions]
/// nonce                = "r=" c-nonce [s-nonce]
///                      ;; Second part provided by server.
/// salt                 = "s=" base64
/// iteration-count      = "i=" posit-number
///
/// r=fyko+d2lbbFgONRv9qkxdawL3rfcNHYJY1ZVvWVs7j,s=QSXCR+Q6sek8bf92,i=4096
pub(crate) struct ServerFirst<'par>
{
    /// "r=" the client nonce continued by the server part
    pub server_nonce: &'par str,

    /// "s=" base64 decoded salt
    pub salt: Vec<u8>,

    /// "i=" iteration count, at least 1
    pub iterations: NonZeroU32,
}

/// A parser for the messages the server sends to a SCRAM client.
pub(crate) struct ScramDataParser;

impl ScramDataParser
{
    /// Parses the server-first-message.
    ///
    /// Every comma separated attribute must be at least 3 characters
    /// with `=` at offset 1. Attributes other than `r`, `s`, `i` are
    /// ignored for forward compatibility. The server nonce must start
    /// with `client_nonce`, otherwise the message is rejected.
    ///
    /// Absent attributes fall back to an empty nonce, an empty salt and
    /// a single iteration.
    ///
    /// # Arguments
    ///
    /// * `resp` - a raw response from server.
    ///
    /// * `client_nonce` - the nonce this client sent in its first
    ///                 message.
    ///
    /// # Returns
    ///
    /// * [SaslResult] with [ServerFirst] or an error describing why the
    ///                 message was rejected.
    pub(crate)
    fn server_first<'par>(resp: &'par str, client_nonce: &str) -> SaslResult<ServerFirst<'par>>
    {
        let mut server_nonce: &'par str = "";
        let mut salt: Vec<u8> = Vec::new();
        let mut iterations: u32 = 1;

        for piece in resp.split(',')
        {
            if piece.len() < 3
            {
                sasl_error!(SaslErrorCode::ProtocolViolation,
                            "attribute too short: '{}' in server message: '{}'",
                            ScramCommon::sanitize_str(piece),
                            ScramCommon::sanitize_str(resp));
            }

            if piece.as_bytes()[1] != b'='
            {
                sasl_error!(SaslErrorCode::ProtocolViolation,
                            "expected '=' at offset 1 of attribute: '{}'",
                            ScramCommon::sanitize_str(piece));
            }

            let value = &piece[2..];

            match piece.as_bytes()[0]
            {
                b'r' =>
                {
                    if value.starts_with(client_nonce) == false
                    {
                        sasl_error!(SaslErrorCode::ProtocolViolation,
                                    "server nonce is not prefixed by the client nonce: '{}'",
                                    ScramCommon::sanitize_str(value));
                    }

                    server_nonce = value;
                },
                b's' =>
                {
                    salt =
                        general_purpose::STANDARD.decode(value)
                            .map_err(|e|
                                sasl_error_map!(SaslErrorCode::MalformedScramMsg,
                                    "parameter s= conversion err, {}", e)
                            )?;
                },
                b'i' =>
                {
                    iterations =
                        u32::from_str_radix(value, 10)
                            .map_err(|e|
                                sasl_error_map!(SaslErrorCode::MalformedScramMsg,
                                    "parameter i= conversion err, {}", e)
                            )?;
                },
                // other attributes are ignored
                _ => (),
            }
        }

        let iterations = match NonZeroU32::new(iterations)
        {
            Some(r) => r,
            None => sasl_error!(SaslErrorCode::MalformedScramMsg,
                                "parameter i= must be at least 1"),
        };

        return
            Ok(
                ServerFirst
                {
                    server_nonce: server_nonce,
                    salt: salt,
                    iterations: iterations,
                }
            );
    }

    /// Internal function used to XOR 2 arrays
    pub(crate)
    fn xor_arrays(a: &[u8], b: &[u8]) -> SaslResult<Vec<u8>>
    {
        if a.len() != b.len()
        {
            sasl_error!(SaslErrorCode::InternalError,
                        "xor arrays size mismatch: a: '{}', b: '{}'", a.len(), b.len());
        }

        let mut ret = Vec::with_capacity(a.len());
        for (a, b) in a.into_iter().zip(b)
        {
            ret.push(a ^ b);
        }

        return Ok(ret);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn accepts_canonical_server_first()
    {
        let parsed =
            ScramDataParser::server_first(
                "r=fyko+d2lbbFgONRv9qkxdawL3rfcNHYJY1ZVvWVs7j,s=QSXCR+Q6sek8bf92,i=4096",
                "fyko+d2lbbFgONRv9qkxdawL"
            ).unwrap();

        assert_eq!(parsed.server_nonce, "fyko+d2lbbFgONRv9qkxdawL3rfcNHYJY1ZVvWVs7j");
        assert_eq!(parsed.salt, general_purpose::STANDARD.decode("QSXCR+Q6sek8bf92").unwrap());
        assert_eq!(parsed.iterations.get(), 4096);
    }

    #[test]
    fn ignores_unknown_attributes()
    {
        let parsed =
            ScramDataParser::server_first(
                "m=ext,r=abcPoggers,s=UEpTYWx0,i=4096,z=later",
                "abc"
            ).unwrap();

        assert_eq!(parsed.server_nonce, "abcPoggers");
        assert_eq!(parsed.iterations.get(), 4096);
    }

    #[test]
    fn rejects_short_attribute()
    {
        let res = ScramDataParser::server_first("x", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn rejects_missing_equals()
    {
        let res = ScramDataParser::server_first("r+abc,s=UEpTYWx0,i=4096", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn rejects_foreign_nonce()
    {
        let res = ScramDataParser::server_first("r=stranger,s=UEpTYWx0,i=4096", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn rejects_unparsable_iterations()
    {
        let res = ScramDataParser::server_first("r=abcd,s=UEpTYWx0,i=many", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn rejects_zero_iterations()
    {
        let res = ScramDataParser::server_first("r=abcd,s=UEpTYWx0,i=0", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn rejects_damaged_salt()
    {
        let res = ScramDataParser::server_first("r=abcd,s=!!!,i=4096", "abc");

        assert_eq!(res.is_err(), true);
    }

    #[test]
    fn xor_arrays_mixes_bytes()
    {
        let res = ScramDataParser::xor_arrays(&[0x0f, 0xf0, 0xaa], &[0xff, 0xf0, 0x55]).unwrap();

        assert_eq!(res, vec![0xf0, 0x00, 0xff]);

        assert_eq!(ScramDataParser::xor_arrays(&[1, 2], &[1]).is_err(), true);
    }
}
