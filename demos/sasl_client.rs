use std::num::NonZeroU32;
use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose;

use sasl_rs::{Mechanism, Plain, Scram};
use sasl_rs::{ScramHashing, ScramSha256RustNative};

/// A toy in-process SCRAM server, just enough to drive the client
/// mechanism through a complete exchange.
struct MockServer
{
    password: String,
    server_nonce_part: String,
    salt: Vec<u8>,
    iterations: u32,

    auth_message: String,
    salted_password: Vec<u8>,
}

impl MockServer
{
    fn new(password: &str) -> Self
    {
        return
            Self
            {
                password: password.to_string(),
                server_nonce_part: "3rfcNHYJY1ZVvWVs7j".to_string(),
                salt: Vec::from(&b"PJSalt"[..]),
                iterations: 4096,
                auth_message: String::new(),
                salted_password: Vec::new(),
            };
    }

    /// Consumes `n,,n=user,r=<cnonce>`, answers the challenge.
    fn challenge(&mut self, client_first: &str) -> String
    {
        let (_gs2, client_first_bare) = client_first.split_at(3);
        let (_, client_nonce) = client_first_bare.rsplit_once(",r=").unwrap();

        let server_nonce = [client_nonce, self.server_nonce_part.as_str()].concat();
        let encoded_salt = general_purpose::STANDARD.encode(&self.salt);

        let server_first =
            format!("r={},s={},i={}", server_nonce, encoded_salt, self.iterations);

        self.salted_password =
            ScramSha256RustNative::derive(
                self.password.as_bytes(),
                &self.salt,
                NonZeroU32::new(self.iterations).unwrap()
            ).unwrap();

        self.auth_message = [client_first_bare, ",", server_first.as_str(), ","].concat();

        return server_first;
    }

    /// Consumes `c=...,r=...,p=...`, checks the proof and answers the
    /// verifier.
    fn verify(&mut self, client_final: &str) -> String
    {
        let (client_final_without_proof, encoded_proof) =
            client_final.rsplit_once(",p=").unwrap();

        self.auth_message.push_str(client_final_without_proof);

        let client_key =
            ScramSha256RustNative::hmac(b"Client Key", &self.salted_password).unwrap();
        let stored_key = ScramSha256RustNative::hash(&client_key);

        let client_signature =
            ScramSha256RustNative::hmac(self.auth_message.as_bytes(), &stored_key).unwrap();

        let proof = general_purpose::STANDARD.decode(encoded_proof).unwrap();
        let recovered_client_key: Vec<u8> =
            proof
                .iter()
                .zip(&client_signature)
                .map(|(p, s)| p ^ s)
                .collect();

        if ScramSha256RustNative::hash(&recovered_client_key) != stored_key
        {
            panic!("mock server: the client proof did not check out");
        }

        let server_key =
            ScramSha256RustNative::hmac(b"Server Key", &self.salted_password).unwrap();
        let server_signature =
            ScramSha256RustNative::hmac(self.auth_message.as_bytes(), &server_key).unwrap();

        return format!("v={}", general_purpose::STANDARD.encode(server_signature));
    }
}

fn main()
{
    // PLAIN: the whole exchange is one record
    let mut plain = Plain::new();
    let _sub =
        plain.subscribe_to_diagnostics(
            Rc::new(|name: &str, level: usize, message: &str|
                println!("{}[{}] {}", name, level, message)
            ),
            0
        );

    plain.set_credentials("pencil", "user", "");

    let record = plain.get_initial_response();
    println!("PLAIN record: {:?}", record);

    // SCRAM-SHA-256: three turns against the mock server
    let mut server = MockServer::new("pencil");

    let mut scram = Scram::new();
    let _sub =
        scram.subscribe_to_diagnostics(
            Rc::new(|name: &str, level: usize, message: &str|
                println!("{}[{}] {}", name, level, message)
            ),
            0
        );

    scram.set_hash_function::<ScramSha256RustNative>();
    scram.set_credentials("pencil", "user", "");

    // drive the exchange without an initial response: the first proceed
    // (on the empty server greeting) emits the client first message
    let client_first = scram.proceed("");
    let server_first = server.challenge(&client_first);
    println!("S: {}", server_first);

    let client_final = scram.proceed(&server_first);
    let server_final = server.verify(&client_final);
    println!("S: {}", server_final);

    let done = scram.proceed(&server_final);
    assert!(done.is_empty());

    println!("authenticated: {}", scram.succeeded());
}
